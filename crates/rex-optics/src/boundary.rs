use rex_core::errors::{ensure_finite, ErrorInfo, RexError};
use rex_core::{NormalizedTrajectory, Trajectory};
use serde::{Deserialize, Serialize};

/// Boundary samples of the stable area ordered by normalized phase angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedBoundary {
    /// Physical positions.
    pub x: Vec<f64>,
    /// Physical momenta.
    pub px: Vec<f64>,
    /// Normalized positions.
    pub x_norm: Vec<f64>,
    /// Normalized momenta.
    pub px_norm: Vec<f64>,
    /// Phase angle `atan2(px_norm, x_norm)` in radians, non-decreasing.
    pub theta: Vec<f64>,
}

impl SortedBoundary {
    /// Number of boundary samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` when no sample is present.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

pub(crate) fn check_pair(
    physical: &Trajectory,
    normalized: &NormalizedTrajectory,
) -> Result<(), RexError> {
    let len = physical.x.len();
    if physical.px.len() != len
        || normalized.x_norm.len() != len
        || normalized.px_norm.len() != len
        || normalized.alive.len() != len
    {
        return Err(RexError::InvalidInput(
            ErrorInfo::new(
                "record-length-mismatch",
                "physical and normalized records must cover the same turns",
            )
            .with_context("x", len)
            .with_context("px", physical.px.len())
            .with_context("x_norm", normalized.x_norm.len())
            .with_context("px_norm", normalized.px_norm.len())
            .with_context("alive", normalized.alive.len()),
        ));
    }
    ensure_finite("x", &physical.x)?;
    ensure_finite("px", &physical.px)?;
    ensure_finite("x_norm", &normalized.x_norm)?;
    ensure_finite("px_norm", &normalized.px_norm)?;
    Ok(())
}

/// Orders the turn-by-turn samples of a stable-boundary particle by increasing
/// normalized phase angle, turning the point cloud into a traversable polygon.
///
/// The sort is stable, so sorting an already sorted boundary returns it unchanged.
pub fn sort_stable_boundary(
    physical: &Trajectory,
    normalized: &NormalizedTrajectory,
) -> Result<SortedBoundary, RexError> {
    check_pair(physical, normalized)?;

    let theta: Vec<f64> = normalized
        .x_norm
        .iter()
        .zip(normalized.px_norm.iter())
        .map(|(&x, &px)| px.atan2(x))
        .collect();
    let mut order: Vec<usize> = (0..theta.len()).collect();
    order.sort_by(|&a, &b| theta[a].total_cmp(&theta[b]));

    let pick = |values: &[f64]| order.iter().map(|&idx| values[idx]).collect::<Vec<_>>();
    Ok(SortedBoundary {
        x: pick(&physical.x),
        px: pick(&physical.px),
        x_norm: pick(&normalized.x_norm),
        px_norm: pick(&normalized.px_norm),
        theta: pick(&theta),
    })
}
