#![deny(missing_docs)]
#![doc = "Separatrix analysis near a third-order resonance: stability boundary bisection, separatrix recording, septum fit, stable boundary sorting and fixed-point localization, driven through the `rex_core::Line` tracking contract."]

/// Background beam generation.
pub mod beam;
/// Angular ordering of stable boundary samples.
pub mod boundary;
/// Resonance fixed-point localization.
pub mod fixed_points;
/// Canonical hashing helpers.
pub mod hash;
/// Small numeric kernels (line fit, polynomial evaluation, arg-extrema).
pub mod numeric;
/// Edge particle recorders.
pub mod record;
/// Aggregated analysis pipeline and report.
pub mod report;
/// Stability boundary bisection.
pub mod search;
/// Separatrix fit at the septum.
pub mod septum;
/// Canonical JSON serde helpers.
pub mod serde;
/// Rendering interface consumed by figure backends.
pub mod view;

pub use beam::{track_beam, BeamSpec};
pub use boundary::{sort_stable_boundary, SortedBoundary};
pub use fixed_points::{find_fixed_points, FixedPoint, FixedPoints, DEFAULT_FIXED_POINT_THRESHOLD};
pub use hash::stable_hash_string;
pub use record::{find_boundary_stable, record_separatrix};
pub use report::{analyze, AnalysisConfig, AnalysisReport};
pub use search::{closest_stable_unstable, SearchOpts};
pub use septum::{separatrix_at_septum, SeparatrixFit, SeptumFitPolicy, DEFAULT_FIT_OFFSET};
pub use crate::serde::{from_json_slice, from_yaml_slice, to_canonical_json_bytes};
pub use view::{alive_strands, PhaseSpaceSink, PhaseSpaceView};
