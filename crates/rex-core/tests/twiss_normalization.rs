use proptest::prelude::*;
use rex_core::{Trajectory, Twiss};

#[test]
fn unit_beta_is_identity() {
    let twiss = Twiss::default();
    let (x, px) = twiss.to_normalized(0.01, -0.002, 0.0);
    assert_eq!((x, px), (0.01, -0.002));
}

#[test]
fn normalize_carries_alive_flags() {
    let twiss = Twiss {
        beta: 4.0,
        ..Twiss::default()
    };
    let mut trajectory = Trajectory::from_samples(vec![0.02, 0.0], vec![0.001, 0.0]);
    trajectory.alive[1] = false;
    let norm = twiss.normalize(&trajectory).unwrap();
    assert_eq!(norm.alive, vec![true, false]);
    assert!((norm.x_norm[0] - 0.01).abs() < 1e-15);
    assert!((norm.px_norm[0] - 0.002).abs() < 1e-15);
}

#[test]
fn rejects_non_positive_beta() {
    let twiss = Twiss {
        beta: 0.0,
        ..Twiss::default()
    };
    let trajectory = Trajectory::from_samples(vec![0.0], vec![0.0]);
    let err = twiss.normalize(&trajectory).unwrap_err();
    assert_eq!(err.info().code, "invalid-beta");
}

proptest! {
    #[test]
    fn physical_roundtrip(
        beta in 0.5f64..50.0,
        alpha in -3.0f64..3.0,
        dx in -2.0f64..2.0,
        delta in -1e-3f64..1e-3,
        x in -0.05f64..0.05,
        px in -0.005f64..0.005,
    ) {
        let twiss = Twiss { beta, alpha, dx, ..Twiss::default() };
        let (xn, pxn) = twiss.to_normalized(x, px, delta);
        let (xb, pxb) = twiss.to_physical(xn, pxn, delta);
        prop_assert!((xb - x).abs() < 1e-12);
        prop_assert!((pxb - px).abs() < 1e-12);
    }
}
