use rex_core::errors::RexError;
use rex_core::{NormalizedRecord, NormalizedTrajectory, TrackRecord, Trajectory};

use crate::boundary::SortedBoundary;
use crate::fixed_points::FixedPoints;
use crate::septum::SeparatrixFit;

/// Everything a phase-space figure draws, borrowed from analysis results.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSpaceView<'a> {
    /// Optional background beam in physical coordinates.
    pub beam: Option<&'a TrackRecord>,
    /// Normalized counterpart of `beam`.
    pub beam_norm: Option<&'a NormalizedRecord>,
    /// Separatrix particle in physical coordinates.
    pub separatrix: &'a Trajectory,
    /// Separatrix particle in normalized coordinates.
    pub separatrix_norm: &'a NormalizedTrajectory,
    /// Separatrix line fitted at the septum.
    pub septum: &'a SeparatrixFit,
    /// Angularly sorted stable boundary.
    pub boundary: &'a SortedBoundary,
    /// Resonance fixed points.
    pub fixed_points: &'a FixedPoints,
    /// Septum position in metres.
    pub x_boundary: f64,
}

/// Consumer of analysis results, typically a figure renderer.
pub trait PhaseSpaceSink {
    /// Renders or records the view.
    fn render(&mut self, view: &PhaseSpaceView<'_>) -> Result<(), RexError>;
}

/// Splits the alive samples into `strands` interleaved sequences
/// (`k, k + strands, k + 2 * strands, ...`), one per separatrix arm.
pub fn alive_strands(values: &[f64], alive: &[bool], strands: usize) -> Vec<Vec<f64>> {
    let kept: Vec<f64> = values
        .iter()
        .zip(alive.iter())
        .filter(|(_, alive)| **alive)
        .map(|(&value, _)| value)
        .collect();
    (0..strands)
        .map(|start| kept.iter().skip(start).step_by(strands.max(1)).copied().collect())
        .collect()
}
