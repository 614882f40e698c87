use rex_core::Line;
use rex_track::{HenonLine, LatticeSpec};

fn default_line() -> HenonLine {
    HenonLine::new(LatticeSpec::default()).expect("valid lattice")
}

#[test]
fn turn_zero_is_the_built_particle() {
    let line = default_line();
    let particles = line.build_particles(&[0.01], 0.0).unwrap();
    let record = line.track(&particles, 10, true).unwrap();
    let trajectory = record.first().unwrap();
    assert_eq!(trajectory.turns(), 10);
    assert_eq!(trajectory.x[0], 0.01);
    assert_eq!(trajectory.px[0], 0.0);
    assert!(trajectory.alive.iter().all(|&alive| alive));
}

#[test]
fn tracking_is_deterministic() {
    let line = default_line();
    let particles = line.build_particles(&[0.005, 0.012, 0.016], 0.0).unwrap();
    let a = line.track(&particles, 500, true).unwrap();
    let b = line.track(&particles, 500, true).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trajectories.len(), 3);
}

#[test]
fn small_amplitude_motion_stays_on_an_ellipse() {
    let line = default_line();
    let particles = line.build_particles(&[1e-4], 0.0).unwrap();
    let record = line.track(&particles, 300, true).unwrap();
    let twiss = line.twiss();
    let norm = twiss.normalize(record.first().unwrap()).unwrap();
    let r0 = norm.x_norm[0].hypot(norm.px_norm[0]);
    for (x, px) in norm.x_norm.iter().zip(norm.px_norm.iter()) {
        let r = x.hypot(*px);
        assert!((r - r0).abs() < 1e-2 * r0, "amplitude drifted: {r} vs {r0}");
    }
}

#[test]
fn large_amplitude_particle_is_lost_and_zeroed() {
    let line = default_line();
    let particles = line.build_particles(&[0.05], 0.0).unwrap();
    let record = line.track(&particles, 1000, true).unwrap();
    let trajectory = record.first().unwrap();
    let lost_at = trajectory.lost_at().expect("particle should be lost");
    assert!(lost_at > 0);
    assert!(trajectory.crosses(0.035));
    assert!(trajectory.x[lost_at..].iter().all(|&x| x == 0.0));
    assert!(trajectory.alive[lost_at..].iter().all(|&alive| !alive));
}

#[test]
fn particle_outside_aperture_is_recorded_once() {
    let line = default_line();
    let particles = line.build_particles(&[0.5], 0.0).unwrap();
    let record = line.track(&particles, 5, true).unwrap();
    let trajectory = record.first().unwrap();
    assert_eq!(trajectory.x[0], 0.5);
    assert_eq!(trajectory.lost_at(), Some(1));
}

#[test]
fn final_turn_only_without_monitor() {
    let line = default_line();
    let particles = line.build_particles(&[0.01], 0.0).unwrap();
    let full = line.track(&particles, 50, true).unwrap();
    let last = line.track(&particles, 49, false).unwrap();
    let last = last.first().unwrap();
    assert_eq!(last.turns(), 1);
    assert_eq!(last.x[0], full.first().unwrap().x[49]);
}

#[test]
fn chromaticity_changes_the_phase_advance() {
    let spec = LatticeSpec {
        chroma: -5.0,
        ..LatticeSpec::default()
    };
    let line = HenonLine::new(spec).unwrap();
    let on = line.build_particles(&[1e-3], 0.0).unwrap();
    let off = line.build_particles(&[1e-3], 1e-3).unwrap();
    let on = line.track(&on, 2, true).unwrap();
    let off = line.track(&off, 2, true).unwrap();
    assert_ne!(on.first().unwrap().x[1], off.first().unwrap().x[1]);
    assert_eq!(off.first().unwrap().delta, 1e-3);
}

#[test]
fn rejects_invalid_lattice() {
    let spec = LatticeSpec {
        beta: -1.0,
        ..LatticeSpec::default()
    };
    let err = HenonLine::new(spec).unwrap_err();
    assert_eq!(err.info().code, "invalid-beta");
}
