//! Courant–Snyder optics at the observation point and the associated normalization.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RexError};
use crate::records::{NormalizedRecord, NormalizedTrajectory, TrackRecord, Trajectory};

/// Horizontal optics functions at the point where turns are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twiss {
    /// Beta function in metres.
    pub beta: f64,
    /// Alpha function.
    #[serde(default)]
    pub alpha: f64,
    /// Closed orbit position.
    #[serde(default)]
    pub x_co: f64,
    /// Closed orbit momentum.
    #[serde(default)]
    pub px_co: f64,
    /// Dispersion in metres.
    #[serde(default)]
    pub dx: f64,
    /// Dispersion derivative.
    #[serde(default)]
    pub dpx: f64,
}

impl Default for Twiss {
    fn default() -> Self {
        Self {
            beta: 1.0,
            alpha: 0.0,
            x_co: 0.0,
            px_co: 0.0,
            dx: 0.0,
            dpx: 0.0,
        }
    }
}

impl Twiss {
    fn check(&self) -> Result<(), RexError> {
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-beta", "beta function must be positive and finite")
                    .with_context("beta", self.beta),
            ));
        }
        Ok(())
    }

    /// Maps a physical `(x, px)` pair with momentum offset `delta` to normalized coordinates.
    pub fn to_normalized(&self, x: f64, px: f64, delta: f64) -> (f64, f64) {
        let sqrt_beta = self.beta.sqrt();
        let xb = x - self.x_co - self.dx * delta;
        let pxb = px - self.px_co - self.dpx * delta;
        (xb / sqrt_beta, (self.alpha * xb + self.beta * pxb) / sqrt_beta)
    }

    /// Inverse of [`Twiss::to_normalized`].
    pub fn to_physical(&self, x_norm: f64, px_norm: f64, delta: f64) -> (f64, f64) {
        let sqrt_beta = self.beta.sqrt();
        let xb = x_norm * sqrt_beta;
        let pxb = (px_norm - self.alpha * x_norm) / sqrt_beta;
        (
            xb + self.x_co + self.dx * delta,
            pxb + self.px_co + self.dpx * delta,
        )
    }

    /// Normalizes a single trajectory using its own momentum offset; alive flags are copied.
    pub fn normalize(&self, trajectory: &Trajectory) -> Result<NormalizedTrajectory, RexError> {
        self.check()?;
        if trajectory.px.len() != trajectory.x.len() {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("ragged-trajectory", "x and px differ in length")
                    .with_context("x", trajectory.x.len())
                    .with_context("px", trajectory.px.len()),
            ));
        }
        let (x_norm, px_norm) = trajectory
            .x
            .iter()
            .zip(trajectory.px.iter())
            .map(|(&x, &px)| self.to_normalized(x, px, trajectory.delta))
            .unzip();
        Ok(NormalizedTrajectory {
            x_norm,
            px_norm,
            alive: trajectory.alive.clone(),
        })
    }

    /// Normalizes every trajectory of a record.
    pub fn normalize_record(&self, record: &TrackRecord) -> Result<NormalizedRecord, RexError> {
        let trajectories = record
            .trajectories
            .iter()
            .map(|trajectory| self.normalize(trajectory))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NormalizedRecord { trajectories })
    }
}
