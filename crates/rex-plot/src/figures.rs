use std::fmt::Write;
use std::path::Path;

use rex_core::errors::{ErrorInfo, RexError};
use rex_optics::numeric::polyval;
use rex_optics::{alive_strands, PhaseSpaceSink, PhaseSpaceView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::panel::{AxisRange, Panel};

const BEAM_COLOUR: &str = "#1f77b4";
const SEPARATRIX_COLOUR: &str = "#ff7f0e";
const BOUNDARY_COLOUR: &str = "#2ca02c";
const FIXED_POINT_COLOUR: &str = "#000000";
const SEPARATRIX_STRANDS: usize = 3;

fn default_panel_size() -> u32 {
    420
}

fn default_margin() -> u32 {
    60
}

fn default_physical_x() -> AxisRange {
    AxisRange::symmetric(5e-2)
}

fn default_physical_px() -> AxisRange {
    AxisRange::symmetric(5e-3)
}

fn default_normalized() -> AxisRange {
    AxisRange::symmetric(15e-3)
}

fn default_fit_half_width() -> f64 {
    1e-2
}

fn figure_error(code: &str, message: impl Into<String>) -> RexError {
    RexError::InvalidInput(ErrorInfo::new(code, message.into()))
}

/// Canvas geometry and axis ranges of the phase-space figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Side length of each square panel in pixels.
    #[serde(default = "default_panel_size")]
    pub panel_size: u32,
    /// Space around and between the panels in pixels.
    #[serde(default = "default_margin")]
    pub margin: u32,
    /// Horizontal range of the physical panel.
    #[serde(default = "default_physical_x")]
    pub physical_x: AxisRange,
    /// Vertical range of the physical panel.
    #[serde(default = "default_physical_px")]
    pub physical_px: AxisRange,
    /// Range of both axes of the normalized panel.
    #[serde(default = "default_normalized")]
    pub normalized: AxisRange,
    /// Half width of the septum fit segment around the septum position.
    #[serde(default = "default_fit_half_width")]
    pub fit_half_width: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            panel_size: default_panel_size(),
            margin: default_margin(),
            physical_x: default_physical_x(),
            physical_px: default_physical_px(),
            normalized: default_normalized(),
            fit_half_width: default_fit_half_width(),
        }
    }
}

impl FigureConfig {
    fn validate(&self) -> Result<(), RexError> {
        if self.panel_size == 0 {
            return Err(figure_error("empty-canvas", "panels need a positive size"));
        }
        for (name, range) in [
            ("physical_x", self.physical_x),
            ("physical_px", self.physical_px),
            ("normalized", self.normalized),
        ] {
            if !range.is_valid() {
                return Err(RexError::InvalidInput(
                    ErrorInfo::new("invalid-axis-range", "axis range must satisfy min < max")
                        .with_context("axis", name)
                        .with_context("min", range.min)
                        .with_context("max", range.max),
                ));
            }
        }
        if !self.fit_half_width.is_finite() || self.fit_half_width <= 0.0 {
            return Err(figure_error(
                "invalid-fit-width",
                "septum fit segment needs a positive half width",
            ));
        }
        Ok(())
    }

    fn canvas(&self) -> (f64, f64) {
        let size = f64::from(self.panel_size);
        let margin = f64::from(self.margin);
        (2.0 * size + 3.0 * margin, size + 2.0 * margin)
    }

    fn panels(&self) -> (Panel, Panel) {
        let size = f64::from(self.panel_size);
        let margin = f64::from(self.margin);
        let physical = Panel {
            left: margin,
            top: margin,
            width: size,
            height: size,
            x_range: self.physical_x,
            y_range: self.physical_px,
        };
        let normalized = Panel {
            left: 2.0 * margin + size,
            top: margin,
            width: size,
            height: size,
            x_range: self.normalized,
            y_range: self.normalized,
        }
        .with_equal_aspect();
        (physical, normalized)
    }
}

/// Renders the two-panel phase-space figure of an analysis as an SVG document.
///
/// The output depends only on the view and the configuration.
pub fn render_phase_space_svg(
    view: &PhaseSpaceView<'_>,
    config: &FigureConfig,
) -> Result<String, RexError> {
    config.validate()?;
    let (width, height) = config.canvas();
    let (physical, normalized) = config.panels();

    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' viewBox='0 0 {width:.0} {height:.0}'>"
    );
    out.push_str("<rect width='100%' height='100%' fill='#ffffff' />");
    physical.frame(&mut out, "Physical phase space", "x [m]", "px [rad]");
    normalized.frame(&mut out, "Normalized phase space", "x_norm", "px_norm");

    let mut beam_samples = 0;
    out.push_str("<g class='beam'>");
    if let Some(beam) = view.beam {
        for trajectory in &beam.trajectories {
            let x = alive_only(&trajectory.x, &trajectory.alive);
            let px = alive_only(&trajectory.px, &trajectory.alive);
            beam_samples += physical.dots(&mut out, &x, &px, BEAM_COLOUR);
        }
    }
    if let Some(beam_norm) = view.beam_norm {
        for trajectory in &beam_norm.trajectories {
            let x = alive_only(&trajectory.x_norm, &trajectory.alive);
            let px = alive_only(&trajectory.px_norm, &trajectory.alive);
            normalized.dots(&mut out, &x, &px, BEAM_COLOUR);
        }
    }
    out.push_str("</g>");

    out.push_str("<g class='septum'>");
    physical.vertical_line(&mut out, view.x_boundary, "#000000");
    out.push_str("</g>");

    out.push_str("<g class='separatrix'>");
    let separatrix = view.separatrix;
    let strands_x = alive_strands(&separatrix.x, &separatrix.alive, SEPARATRIX_STRANDS);
    let strands_px = alive_strands(&separatrix.px, &separatrix.alive, SEPARATRIX_STRANDS);
    for (x, px) in strands_x.iter().zip(strands_px.iter()) {
        physical.polyline(&mut out, x, px, SEPARATRIX_COLOUR, 2.5, false);
    }
    let separatrix_norm = view.separatrix_norm;
    let strands_x = alive_strands(
        &separatrix_norm.x_norm,
        &separatrix_norm.alive,
        SEPARATRIX_STRANDS,
    );
    let strands_px = alive_strands(
        &separatrix_norm.px_norm,
        &separatrix_norm.alive,
        SEPARATRIX_STRANDS,
    );
    for (x, px) in strands_x.iter().zip(strands_px.iter()) {
        normalized.polyline(&mut out, x, px, SEPARATRIX_COLOUR, 2.5, false);
    }
    out.push_str("</g>");

    out.push_str("<g class='septum-fit'>");
    let fit_x: Vec<f64> = (0..=20)
        .map(|step| view.x_boundary - config.fit_half_width + config.fit_half_width * step as f64 / 10.0)
        .collect();
    let fit_px: Vec<f64> = fit_x.iter().map(|&x| polyval(&view.septum.poly, x)).collect();
    physical.polyline(&mut out, &fit_x, &fit_px, "#000000", 1.5, true);
    out.push_str("</g>");

    out.push_str("<g class='stable-boundary'>");
    let boundary = view.boundary;
    physical.polygon(&mut out, &boundary.x, &boundary.px, BOUNDARY_COLOUR);
    normalized.polygon(&mut out, &boundary.x_norm, &boundary.px_norm, BOUNDARY_COLOUR);
    out.push_str("</g>");

    out.push_str("<g class='fixed-points'>");
    for point in &view.fixed_points.points {
        physical.star(&mut out, point.x, point.px, 7.0, FIXED_POINT_COLOUR);
        normalized.star(&mut out, point.x_norm, point.px_norm, 7.0, FIXED_POINT_COLOUR);
    }
    out.push_str("</g>");
    out.push_str("</svg>");

    debug!(
        bytes = out.len(),
        beam_samples,
        "phase-space figure rendered"
    );
    Ok(out)
}

fn alive_only(values: &[f64], alive: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(alive.iter())
        .filter(|(_, alive)| **alive)
        .map(|(&value, _)| value)
        .collect()
}

/// [`PhaseSpaceSink`] keeping the last rendered SVG document in memory.
#[derive(Debug, Clone, Default)]
pub struct SvgPhaseSpace {
    config: FigureConfig,
    document: Option<String>,
}

impl SvgPhaseSpace {
    /// Creates a renderer with the given figure configuration.
    pub fn new(config: FigureConfig) -> Self {
        Self {
            config,
            document: None,
        }
    }

    /// Configuration used for rendering.
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Last rendered document, if any.
    pub fn svg(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Consumes the renderer and returns the last rendered document.
    pub fn into_svg(self) -> Option<String> {
        self.document
    }

    /// Writes the last rendered document to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), RexError> {
        let document = self.document.as_deref().ok_or_else(|| {
            figure_error("nothing-rendered", "render a view before writing the figure")
        })?;
        std::fs::write(path, document.as_bytes()).map_err(|err| {
            RexError::Serde(
                ErrorInfo::new("svg-write", err.to_string()).with_context("path", path.display()),
            )
        })
    }
}

impl PhaseSpaceSink for SvgPhaseSpace {
    fn render(&mut self, view: &PhaseSpaceView<'_>) -> Result<(), RexError> {
        self.document = Some(render_phase_space_svg(view, &self.config)?);
        Ok(())
    }
}
