use rex_core::errors::{ErrorInfo, RexError};
use rex_core::{Line, SearchInterval};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn search_error(code: &str, message: impl Into<String>) -> RexError {
    RexError::InvalidInput(ErrorInfo::new(code, message.into()))
}

fn default_num_turns() -> usize {
    1000
}

fn default_x_boundary() -> f64 {
    3.5e-2
}

fn default_abs_precision() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    200
}

/// Parameters of the stability boundary bisection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOpts {
    /// Turns tracked per test particle.
    #[serde(default = "default_num_turns")]
    pub num_turns: usize,
    /// Momentum offset of the test particles.
    #[serde(default)]
    pub delta: f64,
    /// Position a particle must exceed to be classified as unstable (the septum).
    #[serde(default = "default_x_boundary")]
    pub x_boundary: f64,
    /// Stop once the interval is at most this wide, in metres.
    #[serde(default = "default_abs_precision")]
    pub abs_precision: f64,
    /// Bisection steps allowed before giving up.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            num_turns: default_num_turns(),
            delta: 0.0,
            x_boundary: default_x_boundary(),
            abs_precision: default_abs_precision(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SearchOpts {
    fn validate(&self) -> Result<(), RexError> {
        if self.num_turns == 0 {
            return Err(search_error(
                "zero-turns",
                "test particles must be tracked for at least one turn",
            ));
        }
        if !self.abs_precision.is_finite() || self.abs_precision <= 0.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-precision", "precision must be positive and finite")
                    .with_context("abs_precision", self.abs_precision),
            ));
        }
        if !self.x_boundary.is_finite() || !self.delta.is_finite() {
            return Err(search_error(
                "non-finite-search",
                "boundary and momentum offset must be finite",
            ));
        }
        Ok(())
    }
}

/// Tracks one particle at `x` and reports whether it ever passes the boundary.
fn is_unstable(line: &dyn Line, x: f64, opts: &SearchOpts) -> Result<bool, RexError> {
    let particles = line.build_particles(&[x], opts.delta)?;
    let record = line.track(&particles, opts.num_turns, true)?;
    Ok(record.first()?.crosses(opts.x_boundary))
}

/// Bisects `x_search` until the stable/unstable transition is bracketed within
/// `abs_precision`.
///
/// Every step tracks a particle from the interval midpoint. If its recorded
/// position ever exceeds `x_boundary` the midpoint becomes the new upper bound,
/// otherwise the new lower bound. The returned interval therefore has a stable
/// starting point at `lo` and an unstable one at `hi`, provided the initial
/// interval bracketed the transition.
pub fn closest_stable_unstable(
    line: &dyn Line,
    x_search: SearchInterval,
    opts: &SearchOpts,
) -> Result<SearchInterval, RexError> {
    opts.validate()?;
    x_search.validate()?;

    let mut interval = x_search;
    let mut iterations = 0usize;
    while interval.width() > opts.abs_precision {
        if iterations == opts.max_iterations {
            return Err(RexError::NonConvergence(
                ErrorInfo::new(
                    "bisection-iteration-cap",
                    "boundary search did not reach the requested precision",
                )
                .with_context("iterations", iterations)
                .with_context("lo", interval.lo)
                .with_context("hi", interval.hi)
                .with_context("abs_precision", opts.abs_precision)
                .with_hint("raise max_iterations or loosen abs_precision"),
            ));
        }
        let x_test = interval.midpoint();
        let unstable = is_unstable(line, x_test, opts)?;
        interval = if unstable {
            SearchInterval::new(interval.lo, x_test)
        } else {
            SearchInterval::new(x_test, interval.hi)
        };
        iterations += 1;
        debug!(
            iteration = iterations,
            x_test,
            unstable,
            width = interval.width(),
            "bisection step"
        );
    }

    info!(
        lo = interval.lo,
        hi = interval.hi,
        iterations,
        engine = line.name(),
        "stability boundary bracketed"
    );
    Ok(interval)
}
