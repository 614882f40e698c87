//! Turn-by-turn records produced by tracking engines.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RexError};

/// Initial coordinates of a bunch of particles handed to [`crate::Line::track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particles {
    /// Horizontal positions in metres.
    pub x: Vec<f64>,
    /// Horizontal momenta (px / p0).
    pub px: Vec<f64>,
    /// Relative momentum offsets.
    pub delta: Vec<f64>,
}

impl Particles {
    /// Builds particles at the given positions with zero momentum and a common offset.
    pub fn on_axis(x: &[f64], delta: f64) -> Self {
        Self {
            x: x.to_vec(),
            px: vec![0.0; x.len()],
            delta: vec![delta; x.len()],
        }
    }

    /// Number of particles in the bunch.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` when the bunch holds no particle.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Checks that every coordinate array has the same length and holds finite values.
    pub fn validate(&self) -> Result<(), RexError> {
        if self.px.len() != self.x.len() || self.delta.len() != self.x.len() {
            return Err(RexError::Tracking(
                ErrorInfo::new("ragged-particles", "coordinate arrays differ in length")
                    .with_context("x", self.x.len())
                    .with_context("px", self.px.len())
                    .with_context("delta", self.delta.len()),
            ));
        }
        let finite = self
            .x
            .iter()
            .chain(self.px.iter())
            .chain(self.delta.iter())
            .all(|value| value.is_finite());
        if !finite {
            return Err(RexError::Tracking(ErrorInfo::new(
                "non-finite-particles",
                "particle coordinates must be finite",
            )));
        }
        Ok(())
    }
}

/// Turn-by-turn record of a single tracked particle in physical coordinates.
///
/// Turn 0 holds the initial coordinates. Once a particle is lost, later turns
/// carry zero coordinates and `alive == false`, mirroring a monitor buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Relative momentum offset the particle was tracked with.
    #[serde(default)]
    pub delta: f64,
    /// Position per turn.
    pub x: Vec<f64>,
    /// Momentum per turn.
    pub px: Vec<f64>,
    /// Survival flag per turn.
    pub alive: Vec<bool>,
}

impl Trajectory {
    /// Builds a trajectory where every turn is alive.
    pub fn from_samples(x: Vec<f64>, px: Vec<f64>) -> Self {
        let alive = vec![true; x.len()];
        Self {
            delta: 0.0,
            x,
            px,
            alive,
        }
    }

    /// Number of recorded turns.
    pub fn turns(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if any recorded position exceeds `boundary`.
    pub fn crosses(&self, boundary: f64) -> bool {
        self.x.iter().any(|&x| x > boundary)
    }

    /// Index of the first turn at which the particle is no longer alive.
    pub fn lost_at(&self) -> Option<usize> {
        self.alive.iter().position(|alive| !alive)
    }
}

/// Recording of one tracking call: one [`Trajectory`] per particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Per-particle trajectories, in the order the particles were built.
    pub trajectories: Vec<Trajectory>,
}

impl TrackRecord {
    /// Returns the trajectory of the first particle.
    pub fn first(&self) -> Result<&Trajectory, RexError> {
        self.trajectories.first().ok_or_else(|| {
            RexError::Tracking(ErrorInfo::new(
                "empty-record",
                "tracking record holds no particle",
            ))
        })
    }

    /// Consumes the record and returns the trajectory of the first particle.
    pub fn into_first(self) -> Result<Trajectory, RexError> {
        self.trajectories.into_iter().next().ok_or_else(|| {
            RexError::Tracking(ErrorInfo::new(
                "empty-record",
                "tracking record holds no particle",
            ))
        })
    }
}

/// Turn-by-turn record of a particle in normalized phase-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrajectory {
    /// Normalized position per turn.
    pub x_norm: Vec<f64>,
    /// Normalized momentum per turn.
    pub px_norm: Vec<f64>,
    /// Survival flag per turn, carried over from the physical record.
    pub alive: Vec<bool>,
}

impl NormalizedTrajectory {
    /// Builds a normalized trajectory where every turn is alive.
    pub fn from_samples(x_norm: Vec<f64>, px_norm: Vec<f64>) -> Self {
        let alive = vec![true; x_norm.len()];
        Self {
            x_norm,
            px_norm,
            alive,
        }
    }
}

/// Normalized counterpart of a [`TrackRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Per-particle normalized trajectories.
    pub trajectories: Vec<NormalizedTrajectory>,
}

/// Closed search interval on the horizontal position axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchInterval {
    /// Lower (stable side) bound in metres.
    pub lo: f64,
    /// Upper (unstable side) bound in metres.
    pub hi: f64,
}

impl SearchInterval {
    /// Creates an interval from its bounds.
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    /// Returns `true` when `value` lies within the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Rejects non-finite or inverted bounds.
    pub fn validate(&self) -> Result<(), RexError> {
        if !self.lo.is_finite() || !self.hi.is_finite() || self.lo > self.hi {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-interval", "search interval must satisfy lo <= hi")
                    .with_context("lo", self.lo)
                    .with_context("hi", self.hi),
            ));
        }
        Ok(())
    }
}

impl Default for SearchInterval {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl From<[f64; 2]> for SearchInterval {
    fn from(bounds: [f64; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}
