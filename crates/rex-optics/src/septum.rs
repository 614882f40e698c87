use rex_core::errors::{ensure_finite, ErrorInfo, RexError};
use rex_core::Trajectory;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::numeric::{argmin_distance_where, fit_line, polyval};

/// Turns between the septum crossing and each of the two samples the line is fitted through.
///
/// Three turns bring a particle near the third-order resonance back onto the
/// same separatrix arm.
pub const DEFAULT_FIT_OFFSET: usize = 3;

fn default_offset() -> usize {
    DEFAULT_FIT_OFFSET
}

/// Selects the samples the separatrix line is fitted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeptumFitPolicy {
    /// Turn offset on either side of the closest passage.
    #[serde(default = "default_offset")]
    pub offset: usize,
}

impl Default for SeptumFitPolicy {
    fn default() -> Self {
        Self {
            offset: DEFAULT_FIT_OFFSET,
        }
    }
}

/// Local straight-line description of the separatrix at the septum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatrixFit {
    /// Slope dpx/dx of the separatrix arm at the septum.
    pub slope: f64,
    /// Momentum of the separatrix at the septum position.
    pub px_at_septum: f64,
    /// Turn at which the particle passed closest to the septum.
    pub closest_turn: usize,
    /// Fitted line coefficients, `[slope, intercept]`.
    pub poly: [f64; 2],
}

fn lost_label(lost_at: Option<usize>) -> String {
    lost_at.map_or_else(|| "none".to_string(), |turn| turn.to_string())
}

/// Fits the separatrix arm where it crosses the septum at `x_boundary`.
///
/// The turn closest to the septum is located, a line is fitted through the
/// passages `offset` turns before and after it, and the line is evaluated at
/// the septum. Only surviving turns take part: the crossing is searched among
/// them and both passages must still be alive, otherwise
/// [`RexError::InsufficientSamples`] is returned.
pub fn separatrix_at_septum(
    separatrix: &Trajectory,
    x_boundary: f64,
    policy: &SeptumFitPolicy,
) -> Result<SeparatrixFit, RexError> {
    let turns = separatrix.turns();
    if separatrix.px.len() != turns || separatrix.alive.len() != turns {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("ragged-trajectory", "x, px and alive differ in length")
                .with_context("x", turns)
                .with_context("px", separatrix.px.len())
                .with_context("alive", separatrix.alive.len()),
        ));
    }
    ensure_finite("x", &separatrix.x)?;
    ensure_finite("px", &separatrix.px)?;
    if !x_boundary.is_finite() {
        return Err(RexError::invalid(
            "non-finite-boundary",
            "septum position must be finite",
        ));
    }

    let alive = &separatrix.alive;
    let closest = argmin_distance_where(&separatrix.x, x_boundary, |turn| alive[turn])
        .ok_or_else(|| {
            RexError::InsufficientSamples(
                ErrorInfo::new("no-alive-turns", "separatrix record holds no surviving turn")
                    .with_context("turns", turns),
            )
        })?;
    let offset = policy.offset;
    if offset == 0 {
        return Err(RexError::invalid(
            "zero-offset",
            "the fit needs two distinct passages around the crossing",
        ));
    }
    // a neighbour recorded after loss holds zeroed coordinates
    let reachable = closest >= offset
        && closest + offset < turns
        && alive[closest - offset]
        && alive[closest + offset];
    if !reachable {
        return Err(RexError::InsufficientSamples(
            ErrorInfo::new(
                "septum-neighbours-missing",
                "not enough recorded turns around the septum crossing",
            )
            .with_context("closest_turn", closest)
            .with_context("offset", offset)
            .with_context("turns", turns)
            .with_context("lost_at", lost_label(separatrix.lost_at()))
            .with_hint("track more turns or start the separatrix particle further inside"),
        ));
    }

    let after = closest + offset;
    let before = closest - offset;
    let poly = fit_line(
        &[separatrix.x[after], separatrix.x[before]],
        &[separatrix.px[after], separatrix.px[before]],
    )?;
    let px_at_septum = polyval(&poly, x_boundary);
    debug!(
        closest_turn = closest,
        slope = poly[0],
        px_at_septum,
        "separatrix fitted at septum"
    );

    Ok(SeparatrixFit {
        slope: poly[0],
        px_at_septum,
        closest_turn: closest,
        poly,
    })
}
