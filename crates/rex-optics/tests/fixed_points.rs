use std::f64::consts::PI;

use rex_core::{NormalizedTrajectory, RexError, Trajectory};
use rex_optics::{find_fixed_points, DEFAULT_FIXED_POINT_THRESHOLD};

const HALF_SQRT3: f64 = 0.866_025_403_784_438_6;

/// 36 samples: three unit-amplitude vertices at 0°, 120° and 240° (turns 5, 17
/// and 29) and small noise everywhere else.
fn triangle() -> (Trajectory, NormalizedTrajectory) {
    let mut x_norm = Vec::new();
    let mut px_norm = Vec::new();
    for turn in 0..36 {
        let (x, px) = match turn {
            5 => (1.0, 0.0),
            17 => (-0.5, HALF_SQRT3),
            29 => (-0.5, -HALF_SQRT3),
            _ => {
                let angle = turn as f64 * 0.7;
                (1e-3 * angle.cos(), 1e-3 * angle.sin())
            }
        };
        x_norm.push(x);
        px_norm.push(px);
    }
    let x = x_norm.iter().map(|value| value * 0.01).collect();
    let px = px_norm.iter().map(|value| value * 0.001).collect();
    (
        Trajectory::from_samples(x, px),
        NormalizedTrajectory::from_samples(x_norm, px_norm),
    )
}

#[test]
fn finds_the_three_vertices_in_discovery_order() {
    let (physical, normalized) = triangle();
    let points =
        find_fixed_points(&physical, &normalized, DEFAULT_FIXED_POINT_THRESHOLD).unwrap();
    let turns: Vec<usize> = points.points.iter().map(|point| point.turn).collect();
    assert_eq!(turns, vec![5, 17, 29]);
    assert_eq!(points.x_norm(), [1.0, -0.5, -0.5]);
    assert_eq!(points.px_norm(), [0.0, HALF_SQRT3, -HALF_SQRT3]);
    assert_eq!(points.x(), [0.01, -0.005, -0.005]);
    assert!((points.points[1].phase() - 2.0 * PI / 3.0).abs() < 1e-9);
    assert!((points.points[2].phase() + 2.0 * PI / 3.0).abs() < 1e-9);
    for point in &points.points {
        assert!((point.amplitude() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn rotated_triangle_keeps_the_sectors() {
    let (physical, normalized) = triangle();
    let rotate = |x: f64, px: f64| {
        let (sin, cos) = 0.3f64.sin_cos();
        (x * cos - px * sin, x * sin + px * cos)
    };
    let (x_norm, px_norm): (Vec<f64>, Vec<f64>) = normalized
        .x_norm
        .iter()
        .zip(normalized.px_norm.iter())
        .map(|(&x, &px)| rotate(x, px))
        .unzip();
    let rotated = NormalizedTrajectory::from_samples(x_norm, px_norm);
    let points = find_fixed_points(&physical, &rotated, 0.2).unwrap();
    let mut turns: Vec<usize> = points.points.iter().map(|point| point.turn).collect();
    turns.sort_unstable();
    assert_eq!(turns, vec![5, 17, 29]);
}

#[test]
fn empty_sector_is_reported() {
    let (physical, normalized) = triangle();
    let mut x_norm = normalized.x_norm.clone();
    let mut px_norm = normalized.px_norm.clone();
    x_norm[17] = 1e-3;
    px_norm[17] = 0.0;
    let lopsided = NormalizedTrajectory::from_samples(x_norm, px_norm);
    let err = find_fixed_points(&physical, &lopsided, 0.2).unwrap_err();
    match err {
        RexError::NoFixedPoint(info) => {
            assert_eq!(info.code, "empty-fixed-point-sector");
            assert_eq!(info.context.get("sector").map(String::as_str), Some("+120"));
            assert!(info.hint.is_some());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn threshold_must_be_positive() {
    let (physical, normalized) = triangle();
    for threshold in [0.0, -0.2, f64::NAN] {
        let err = find_fixed_points(&physical, &normalized, threshold).unwrap_err();
        assert_eq!(err.info().code, "invalid-threshold");
    }
}

#[test]
fn empty_and_non_finite_records_are_rejected() {
    let empty_physical = Trajectory::from_samples(Vec::new(), Vec::new());
    let empty_normalized = NormalizedTrajectory::from_samples(Vec::new(), Vec::new());
    let err = find_fixed_points(&empty_physical, &empty_normalized, 0.2).unwrap_err();
    match err {
        RexError::InvalidInput(info) => assert_eq!(info.code, "empty-samples"),
        other => panic!("unexpected error {other:?}"),
    }

    for bad in [f64::NAN, f64::INFINITY] {
        let (mut physical, normalized) = triangle();
        physical.x[3] = bad;
        let err = find_fixed_points(&physical, &normalized, 0.2).unwrap_err();
        assert_eq!(err.info().code, "non-finite-sample");
        assert_eq!(err.info().context.get("array").map(String::as_str), Some("x"));

        let (physical, mut normalized) = triangle();
        normalized.x_norm[17] = bad;
        let err = find_fixed_points(&physical, &normalized, 0.2).unwrap_err();
        assert_eq!(err.info().code, "non-finite-sample");
    }
}

#[test]
fn lost_turns_are_ignored() {
    let (physical, mut normalized) = triangle();
    // a dead sample with a larger amplitude must not become the first point
    normalized.x_norm[0] = 2.0;
    normalized.alive[0] = false;
    let points = find_fixed_points(&physical, &normalized, 0.2).unwrap();
    assert_eq!(points.points[0].turn, 5);

    normalized.alive[29] = false;
    let err = find_fixed_points(&physical, &normalized, 0.2).unwrap_err();
    match err {
        RexError::NoFixedPoint(info) => {
            assert_eq!(info.code, "empty-fixed-point-sector");
            assert_eq!(info.context.get("sector").map(String::as_str), Some("-120"));
        }
        other => panic!("unexpected error {other:?}"),
    }

    normalized.alive = vec![false; normalized.x_norm.len()];
    let err = find_fixed_points(&physical, &normalized, 0.2).unwrap_err();
    assert_eq!(err.info().code, "no-alive-turns");
}
