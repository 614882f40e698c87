use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use rex_optics::{from_json_slice, from_yaml_slice, AnalysisReport, PhaseSpaceSink};
use rex_plot::{FigureConfig, SvgPhaseSpace};
use tracing::info;

#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Report written by `rex-sim analyze`.
    #[arg(long)]
    pub report: PathBuf,
    /// Destination SVG file.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional YAML or JSON figure configuration.
    #[arg(long)]
    pub figure: Option<PathBuf>,
}

pub(crate) fn load_figure_config(path: Option<&Path>) -> Result<FigureConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(FigureConfig::default());
    };
    let bytes = fs::read(path)?;
    let config: FigureConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_slice(&bytes)?,
        _ => from_yaml_slice(&bytes)?,
    };
    Ok(config)
}

pub fn run(args: &PlotArgs) -> Result<(), Box<dyn Error>> {
    let report: AnalysisReport = from_json_slice(&fs::read(&args.report)?)?;
    let mut sink = SvgPhaseSpace::new(load_figure_config(args.figure.as_deref())?);
    sink.render(&report.view())?;
    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    sink.write_to(&args.out)?;
    info!(figure = %args.out.display(), "figure written");
    Ok(())
}
