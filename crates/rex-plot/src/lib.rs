#![deny(missing_docs)]
#![doc = "Deterministic SVG rendering of separatrix analyses: physical and normalized phase-space panels behind the `rex_optics::PhaseSpaceSink` interface."]

/// Figure configuration and the two-panel phase-space renderer.
pub mod figures;
/// Axis-range projection and SVG primitives for one panel.
pub mod panel;

pub use figures::{render_phase_space_svg, FigureConfig, SvgPhaseSpace};
pub use panel::{AxisRange, Panel};
