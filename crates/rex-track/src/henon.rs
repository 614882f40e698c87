use std::f64::consts::TAU;

use rex_core::errors::RexError;
use rex_core::{Line, Particles, TrackRecord, Trajectory, Twiss};
use tracing::debug;

use crate::lattice::LatticeSpec;

/// Thin sextupole kick followed by a linear Courant–Snyder rotation.
///
/// Turns are observed right before the sextupole, so turn 0 of every record is
/// the particle as built. The aperture is checked after each turn; a particle
/// built outside it is recorded once and lost on the next turn.
#[derive(Debug, Clone, PartialEq)]
pub struct HenonLine {
    spec: LatticeSpec,
}

/// Phase-space state of one particle while it is being tracked.
#[derive(Debug, Clone, Copy)]
struct MapState {
    x_norm: f64,
    px_norm: f64,
    delta: f64,
    alive: bool,
}

impl HenonLine {
    /// Creates an engine from a validated lattice description.
    pub fn new(spec: LatticeSpec) -> Result<Self, RexError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// Lattice parameters driving the map.
    pub fn spec(&self) -> &LatticeSpec {
        &self.spec
    }

    fn step(&self, state: &mut MapState) {
        let sqrt_beta = self.spec.beta.sqrt();
        let x_beta = state.x_norm * sqrt_beta;
        // px kick -(k2l/2) x^2 seen through the normalized momentum.
        state.px_norm -= 0.5 * self.spec.k2l * x_beta * x_beta * sqrt_beta;

        let mu = TAU * (self.spec.tune + self.spec.chroma * state.delta);
        let (sin_mu, cos_mu) = mu.sin_cos();
        let x = state.x_norm * cos_mu + state.px_norm * sin_mu;
        let px = -state.x_norm * sin_mu + state.px_norm * cos_mu;
        state.x_norm = x;
        state.px_norm = px;

        let (x_phys, _) = self.twiss().to_physical(x, px, state.delta);
        if !x_phys.is_finite() || !px.is_finite() || x_phys.abs() > self.spec.aperture {
            state.alive = false;
        }
    }

    fn observe(&self, state: &MapState, trajectory: &mut Trajectory) {
        if state.alive {
            let (x, px) = self
                .twiss()
                .to_physical(state.x_norm, state.px_norm, state.delta);
            trajectory.x.push(x);
            trajectory.px.push(px);
        } else {
            trajectory.x.push(0.0);
            trajectory.px.push(0.0);
        }
        trajectory.alive.push(state.alive);
    }

    fn track_one(
        &self,
        x: f64,
        px: f64,
        delta: f64,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Trajectory {
        let twiss = self.twiss();
        let (x_norm, px_norm) = twiss.to_normalized(x, px, delta);
        let mut state = MapState {
            x_norm,
            px_norm,
            delta,
            alive: true,
        };
        let capacity = if turn_by_turn { num_turns } else { 1 };
        let mut trajectory = Trajectory {
            delta,
            x: Vec::with_capacity(capacity),
            px: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
        };
        for _ in 0..num_turns {
            if turn_by_turn {
                self.observe(&state, &mut trajectory);
            }
            if state.alive {
                self.step(&mut state);
            }
        }
        if !turn_by_turn {
            self.observe(&state, &mut trajectory);
        }
        trajectory
    }
}

impl Default for HenonLine {
    fn default() -> Self {
        Self {
            spec: LatticeSpec::default(),
        }
    }
}

impl Line for HenonLine {
    fn name(&self) -> &str {
        "henon"
    }

    fn track(
        &self,
        particles: &Particles,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Result<TrackRecord, RexError> {
        particles.validate()?;
        let trajectories: Vec<Trajectory> = particles
            .x
            .iter()
            .zip(particles.px.iter())
            .zip(particles.delta.iter())
            .map(|((&x, &px), &delta)| self.track_one(x, px, delta, num_turns, turn_by_turn))
            .collect();
        let lost = trajectories
            .iter()
            .filter(|trajectory| trajectory.lost_at().is_some())
            .count();
        debug!(
            particles = particles.len(),
            num_turns,
            lost,
            "tracked particles through henon map"
        );
        Ok(TrackRecord { trajectories })
    }

    fn twiss(&self) -> Twiss {
        self.spec.twiss()
    }
}
