use proptest::prelude::*;
use rex_core::{NormalizedTrajectory, RexError, Trajectory};
use rex_optics::sort_stable_boundary;

fn cloud() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..64)
}

fn records(points: &[(f64, f64)]) -> (Trajectory, NormalizedTrajectory) {
    let x_norm: Vec<f64> = points.iter().map(|point| point.0).collect();
    let px_norm: Vec<f64> = points.iter().map(|point| point.1).collect();
    let x = x_norm.iter().map(|value| value * 3.0).collect();
    let px = px_norm.iter().map(|value| value / 3.0).collect();
    (
        Trajectory::from_samples(x, px),
        NormalizedTrajectory::from_samples(x_norm, px_norm),
    )
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut values = values.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

proptest! {
    #[test]
    fn theta_is_non_decreasing(points in cloud()) {
        let (physical, normalized) = records(&points);
        let sorted = sort_stable_boundary(&physical, &normalized).unwrap();
        prop_assert_eq!(sorted.len(), points.len());
        prop_assert!(sorted.theta.windows(2).all(|pair| pair[0] <= pair[1]));
        for idx in 0..sorted.len() {
            prop_assert_eq!(sorted.theta[idx], sorted.px_norm[idx].atan2(sorted.x_norm[idx]));
        }
    }

    #[test]
    fn output_is_a_permutation_of_the_input(points in cloud()) {
        let (physical, normalized) = records(&points);
        let sorted = sort_stable_boundary(&physical, &normalized).unwrap();
        prop_assert_eq!(sorted_copy(&sorted.x), sorted_copy(&physical.x));
        prop_assert_eq!(sorted_copy(&sorted.px_norm), sorted_copy(&normalized.px_norm));
        for idx in 0..sorted.len() {
            // physical and normalized columns travel together
            prop_assert_eq!(sorted.x[idx], sorted.x_norm[idx] * 3.0);
            prop_assert_eq!(sorted.px[idx], sorted.px_norm[idx] / 3.0);
        }
    }

    #[test]
    fn sorting_twice_changes_nothing(points in cloud()) {
        let (physical, normalized) = records(&points);
        let once = sort_stable_boundary(&physical, &normalized).unwrap();
        let again = sort_stable_boundary(
            &Trajectory::from_samples(once.x.clone(), once.px.clone()),
            &NormalizedTrajectory::from_samples(once.x_norm.clone(), once.px_norm.clone()),
        )
        .unwrap();
        prop_assert_eq!(once, again);
    }
}

#[test]
fn quadrants_come_out_counter_clockwise_from_minus_pi() {
    let (physical, normalized) = records(&[(1.0, 0.1), (-1.0, -0.1), (0.1, 1.0), (0.1, -1.0)]);
    let sorted = sort_stable_boundary(&physical, &normalized).unwrap();
    assert_eq!(sorted.x_norm, vec![-1.0, 0.1, 1.0, 0.1]);
    assert_eq!(sorted.px_norm, vec![-0.1, -1.0, 0.1, 1.0]);
}

#[test]
fn mismatched_records_are_rejected() {
    let physical = Trajectory::from_samples(vec![0.1, 0.2], vec![0.0, 0.0]);
    let normalized = NormalizedTrajectory::from_samples(vec![0.1], vec![0.0]);
    let err = sort_stable_boundary(&physical, &normalized).unwrap_err();
    match err {
        RexError::InvalidInput(info) => assert_eq!(info.code, "record-length-mismatch"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn empty_records_are_rejected() {
    let physical = Trajectory::from_samples(Vec::new(), Vec::new());
    let normalized = NormalizedTrajectory::from_samples(Vec::new(), Vec::new());
    let err = sort_stable_boundary(&physical, &normalized).unwrap_err();
    match err {
        RexError::InvalidInput(info) => assert_eq!(info.code, "empty-samples"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn non_finite_samples_are_rejected() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let (physical, mut normalized) = records(&[(0.1, 0.2), (0.3, -0.1), (-0.2, 0.0)]);
        normalized.px_norm[1] = bad;
        let err = sort_stable_boundary(&physical, &normalized).unwrap_err();
        assert_eq!(err.info().code, "non-finite-sample");
        assert_eq!(err.info().context.get("array").map(String::as_str), Some("px_norm"));
        assert_eq!(err.info().context.get("index").map(String::as_str), Some("1"));
    }
}
