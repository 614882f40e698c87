#![deny(missing_docs)]
#![doc = "Synthetic tracking engines implementing the `rex_core::Line` contract: a thin-sextupole Hénon map near the third-order resonance and a threshold engine with a known stability boundary."]

/// Hénon-type one-turn map engine.
pub mod henon;
/// Lattice description and file loading.
pub mod lattice;
/// Engine with a known stability boundary.
pub mod threshold;

pub use henon::HenonLine;
pub use lattice::LatticeSpec;
pub use threshold::ThresholdLine;
