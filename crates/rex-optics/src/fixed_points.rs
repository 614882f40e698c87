use std::f64::consts::TAU;

use num_complex::Complex64;
use rex_core::errors::{ErrorInfo, RexError};
use rex_core::{NormalizedTrajectory, Trajectory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::check_pair;
use crate::numeric::argmax_where;

/// Default search radius, relative to the amplitude of the first fixed point.
pub const DEFAULT_FIXED_POINT_THRESHOLD: f64 = 0.2;

/// One resonance fixed point in physical and normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    /// Turn of the sample selected as the fixed point.
    pub turn: usize,
    /// Physical position.
    pub x: f64,
    /// Physical momentum.
    pub px: f64,
    /// Normalized position.
    pub x_norm: f64,
    /// Normalized momentum.
    pub px_norm: f64,
}

impl FixedPoint {
    /// Distance from the origin in normalized phase space.
    pub fn amplitude(&self) -> f64 {
        self.x_norm.hypot(self.px_norm)
    }

    /// Phase angle in normalized phase space, in radians.
    pub fn phase(&self) -> f64 {
        self.px_norm.atan2(self.x_norm)
    }
}

/// The three fixed points of a third-order resonance, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPoints {
    /// Largest-amplitude sample, then the +120° and -120° sector maxima.
    pub points: [FixedPoint; 3],
}

impl FixedPoints {
    /// Physical positions of the three points.
    pub fn x(&self) -> [f64; 3] {
        self.points.map(|point| point.x)
    }

    /// Physical momenta of the three points.
    pub fn px(&self) -> [f64; 3] {
        self.points.map(|point| point.px)
    }

    /// Normalized positions of the three points.
    pub fn x_norm(&self) -> [f64; 3] {
        self.points.map(|point| point.x_norm)
    }

    /// Normalized momenta of the three points.
    pub fn px_norm(&self) -> [f64; 3] {
        self.points.map(|point| point.px_norm)
    }
}

/// Locates the three fixed points on the boundary of the stable triangle.
///
/// The first is the sample of largest normalized amplitude. The other two are
/// the largest-amplitude samples within `threshold * |z1|` of `z1` rotated by
/// +120° and -120°. Turns recorded after a loss are ignored. An empty sector
/// is reported as [`RexError::NoFixedPoint`].
pub fn find_fixed_points(
    physical: &Trajectory,
    normalized: &NormalizedTrajectory,
    threshold: f64,
) -> Result<FixedPoints, RexError> {
    check_pair(physical, normalized)?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("invalid-threshold", "threshold must be positive and finite")
                .with_context("threshold", threshold),
        ));
    }

    let z: Vec<Complex64> = normalized
        .x_norm
        .iter()
        .zip(normalized.px_norm.iter())
        .map(|(&x, &px)| Complex64::new(x, px))
        .collect();
    let amplitude: Vec<f64> = z.iter().map(|value| value.norm()).collect();

    let alive = &normalized.alive;
    let first = argmax_where(&amplitude, |idx| alive[idx]).ok_or_else(|| {
        RexError::NoFixedPoint(
            ErrorInfo::new("no-alive-turns", "boundary record holds no surviving turn")
                .with_context("turns", alive.len()),
        )
    })?;
    let z_first = z[first];
    let radius = threshold * amplitude[first];

    let sector_max = |angle: f64, sector: &str| -> Result<usize, RexError> {
        let target = z_first * Complex64::from_polar(1.0, angle);
        let in_sector = |idx: usize| alive[idx] && (z[idx] - target).norm() < radius;
        argmax_where(&amplitude, in_sector).ok_or_else(|| {
            RexError::NoFixedPoint(
                ErrorInfo::new(
                    "empty-fixed-point-sector",
                    "no boundary sample lies inside the rotated search disk",
                )
                .with_context("sector", sector)
                .with_context("radius", radius)
                .with_context("first_turn", first)
                .with_hint("increase the threshold or record more turns"),
            )
        })
    };
    let second = sector_max(TAU / 3.0, "+120")?;
    let third = sector_max(-TAU / 3.0, "-120")?;

    let point = |turn: usize| FixedPoint {
        turn,
        x: physical.x[turn],
        px: physical.px[turn],
        x_norm: normalized.x_norm[turn],
        px_norm: normalized.px_norm[turn],
    };
    let points = [point(first), point(second), point(third)];
    debug!(
        turns = ?[first, second, third],
        amplitude = amplitude[first],
        "fixed points located"
    );
    Ok(FixedPoints { points })
}
