use rex_core::errors::{ErrorInfo, RexError};
use rex_core::{Line, Particles, TrackRecord, Trajectory, Twiss};

/// Engine with a known stability boundary, used to validate boundary searches.
///
/// A particle starting above `boundary` grows geometrically by `growth` per
/// turn until it leaves the `aperture`; a particle at or below it keeps its
/// initial coordinates forever.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLine {
    boundary: f64,
    growth: f64,
    aperture: f64,
}

impl ThresholdLine {
    /// Creates a threshold engine. `growth` must exceed one.
    pub fn new(boundary: f64, growth: f64) -> Result<Self, RexError> {
        if !boundary.is_finite() || !growth.is_finite() || growth <= 1.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new(
                    "invalid-threshold-line",
                    "boundary must be finite and growth greater than one",
                )
                .with_context("boundary", boundary)
                .with_context("growth", growth),
            ));
        }
        Ok(Self {
            boundary,
            growth,
            aperture: f64::MAX.sqrt(),
        })
    }

    /// Sets the aperture beyond which growing particles are flagged as lost.
    pub fn with_aperture(mut self, aperture: f64) -> Self {
        self.aperture = aperture;
        self
    }

    /// Position separating stable from unstable starting points.
    pub fn boundary(&self) -> f64 {
        self.boundary
    }

    fn track_one(
        &self,
        x0: f64,
        px0: f64,
        delta: f64,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Trajectory {
        let unstable = x0 > self.boundary;
        let mut trajectory = Trajectory {
            delta,
            x: Vec::new(),
            px: Vec::new(),
            alive: Vec::new(),
        };
        let (mut x, mut alive) = (x0, true);
        let record = |x: f64, alive: bool, trajectory: &mut Trajectory| {
            trajectory.x.push(if alive { x } else { 0.0 });
            trajectory.px.push(if alive { px0 } else { 0.0 });
            trajectory.alive.push(alive);
        };
        for _ in 0..num_turns {
            if turn_by_turn {
                record(x, alive, &mut trajectory);
            }
            if alive && unstable {
                x *= self.growth;
                alive = x.abs() <= self.aperture;
            }
        }
        if !turn_by_turn {
            record(x, alive, &mut trajectory);
        }
        trajectory
    }
}

impl Line for ThresholdLine {
    fn name(&self) -> &str {
        "threshold"
    }

    fn track(
        &self,
        particles: &Particles,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Result<TrackRecord, RexError> {
        particles.validate()?;
        let trajectories = particles
            .x
            .iter()
            .zip(particles.px.iter())
            .zip(particles.delta.iter())
            .map(|((&x, &px), &delta)| self.track_one(x, px, delta, num_turns, turn_by_turn))
            .collect();
        Ok(TrackRecord { trajectories })
    }

    fn twiss(&self) -> Twiss {
        Twiss::default()
    }
}
