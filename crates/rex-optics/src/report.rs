use std::collections::BTreeMap;
use std::path::Path;

use rex_core::errors::{ErrorInfo, RexError};
use rex_core::provenance::{RunProvenance, SchemaVersion};
use rex_core::{
    Line, NormalizedRecord, NormalizedTrajectory, SearchInterval, TrackRecord, Trajectory, Twiss,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::beam::{track_beam, BeamSpec};
use crate::boundary::{sort_stable_boundary, SortedBoundary};
use crate::fixed_points::{find_fixed_points, FixedPoints, DEFAULT_FIXED_POINT_THRESHOLD};
use crate::hash::stable_hash_string;
use crate::record::{find_boundary_stable, record_separatrix};
use crate::search::{closest_stable_unstable, SearchOpts};
use crate::septum::{separatrix_at_septum, SeparatrixFit, SeptumFitPolicy};
use crate::serde::{from_json_slice, from_yaml_slice};
use crate::view::PhaseSpaceView;

fn default_threshold() -> f64 {
    DEFAULT_FIXED_POINT_THRESHOLD
}

/// Full configuration of a separatrix analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Initial bisection interval.
    #[serde(default)]
    pub x_search: SearchInterval,
    /// Bisection and tracking parameters.
    #[serde(default)]
    pub search: SearchOpts,
    /// Sample selection of the septum fit.
    #[serde(default)]
    pub septum: SeptumFitPolicy,
    /// Relative radius of the fixed-point search sectors.
    #[serde(default = "default_threshold")]
    pub fixed_point_threshold: f64,
    /// Optional background beam for the figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<BeamSpec>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            x_search: SearchInterval::default(),
            search: SearchOpts::default(),
            septum: SeptumFitPolicy::default(),
            fixed_point_threshold: default_threshold(),
            beam: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads a configuration from a YAML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, RexError> {
        let bytes = std::fs::read(path).map_err(|err| {
            RexError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => from_json_slice(&bytes),
            _ => from_yaml_slice(&bytes),
        }
    }
}

/// Everything produced by [`analyze`], self-sufficient for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version of the report payload.
    pub schema_version: SchemaVersion,
    /// Provenance of the run.
    pub provenance: RunProvenance,
    /// Configuration the run used.
    pub config: AnalysisConfig,
    /// Optics used for normalization.
    pub twiss: Twiss,
    /// Bracketed stability boundary.
    pub interval: SearchInterval,
    /// Separatrix particle (outer edge).
    pub separatrix: Trajectory,
    /// Normalized separatrix particle.
    pub separatrix_norm: NormalizedTrajectory,
    /// Septum fit of the separatrix.
    pub septum: SeparatrixFit,
    /// Stable boundary particle (inner edge).
    pub stable: Trajectory,
    /// Normalized stable boundary particle.
    pub stable_norm: NormalizedTrajectory,
    /// Angularly sorted stable boundary.
    pub boundary: SortedBoundary,
    /// Resonance fixed points.
    pub fixed_points: FixedPoints,
    /// Optional background beam.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<TrackRecord>,
    /// Normalized background beam.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_norm: Option<NormalizedRecord>,
    /// Stable hash over the analysis results.
    pub analysis_hash: String,
}

impl AnalysisReport {
    /// Borrows the report as a phase-space view for rendering.
    pub fn view(&self) -> PhaseSpaceView<'_> {
        PhaseSpaceView {
            beam: self.beam.as_ref(),
            beam_norm: self.beam_norm.as_ref(),
            separatrix: &self.separatrix,
            separatrix_norm: &self.separatrix_norm,
            septum: &self.septum,
            boundary: &self.boundary,
            fixed_points: &self.fixed_points,
            x_boundary: self.config.search.x_boundary,
        }
    }
}

/// Runs the complete separatrix analysis against a tracking engine.
///
/// Stages: boundary bisection, separatrix recording and septum fit, stable
/// boundary recording, normalization, angular sort and fixed-point search.
pub fn analyze(line: &dyn Line, config: &AnalysisConfig) -> Result<AnalysisReport, RexError> {
    let search = &config.search;
    let interval = closest_stable_unstable(line, config.x_search, search)?;

    let twiss = line.twiss();
    let separatrix = record_separatrix(line, interval, search.num_turns, search.delta)?;
    let septum = separatrix_at_septum(&separatrix, search.x_boundary, &config.septum)?;
    info!(
        slope = septum.slope,
        px_at_septum = septum.px_at_septum,
        closest_turn = septum.closest_turn,
        "separatrix at septum"
    );
    let separatrix_norm = twiss.normalize(&separatrix)?;

    let stable = find_boundary_stable(line, interval, search.num_turns, search.delta)?;
    let stable_norm = twiss.normalize(&stable)?;
    let boundary = sort_stable_boundary(&stable, &stable_norm)?;
    let fixed_points = find_fixed_points(&stable, &stable_norm, config.fixed_point_threshold)?;
    info!(
        amplitude = fixed_points.points[0].amplitude(),
        boundary_samples = boundary.len(),
        "stable triangle analysed"
    );

    let (beam, beam_norm) = match &config.beam {
        Some(spec) => {
            let (record, normalized) = track_beam(line, spec, search.delta)?;
            (Some(record), Some(normalized))
        }
        None => (None, None),
    };

    let analysis_hash = stable_hash_string(&(
        &config,
        &twiss,
        &interval,
        &septum,
        &boundary,
        &fixed_points,
        &separatrix,
        &stable,
    ))?;
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        "rex-optics".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    let provenance = RunProvenance {
        config_hash: stable_hash_string(config)?,
        engine: line.name().to_string(),
        seed: config.beam.as_ref().map(|beam| beam.seed).unwrap_or(0),
        tool_versions,
    };

    Ok(AnalysisReport {
        schema_version: SchemaVersion::default(),
        provenance,
        config: config.clone(),
        twiss,
        interval,
        separatrix,
        separatrix_norm,
        septum,
        stable,
        stable_norm,
        boundary,
        fixed_points,
        beam,
        beam_norm,
        analysis_hash,
    })
}
