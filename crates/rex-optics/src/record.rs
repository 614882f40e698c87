use rex_core::errors::{ErrorInfo, RexError};
use rex_core::{Line, SearchInterval, Trajectory};
use tracing::debug;

fn track_from(
    line: &dyn Line,
    x: f64,
    num_turns: usize,
    delta: f64,
) -> Result<Trajectory, RexError> {
    if num_turns == 0 {
        return Err(RexError::InvalidInput(ErrorInfo::new(
            "zero-turns",
            "a trajectory needs at least one recorded turn",
        )));
    }
    let particles = line.build_particles(&[x], delta)?;
    let record = line.track(&particles, num_turns, true)?;
    let trajectory = record.into_first()?;
    debug!(
        x,
        delta,
        turns = trajectory.turns(),
        lost_at = ?trajectory.lost_at(),
        "recorded edge trajectory"
    );
    Ok(trajectory)
}

/// Tracks a particle from the outer (unstable) edge of a narrowed search
/// interval and returns its turn-by-turn record, which follows the separatrix.
pub fn record_separatrix(
    line: &dyn Line,
    x_search: SearchInterval,
    num_turns: usize,
    delta: f64,
) -> Result<Trajectory, RexError> {
    x_search.validate()?;
    track_from(line, x_search.hi, num_turns, delta)
}

/// Tracks a particle from the inner (stable) edge of a narrowed search interval
/// and returns its turn-by-turn record, which traces the stable triangle.
pub fn find_boundary_stable(
    line: &dyn Line,
    x_search: SearchInterval,
    num_turns: usize,
    delta: f64,
) -> Result<Trajectory, RexError> {
    x_search.validate()?;
    track_from(line, x_search.lo, num_turns, delta)
}
