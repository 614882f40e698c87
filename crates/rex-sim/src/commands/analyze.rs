use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use rex_optics::{analyze, PhaseSpaceSink};
use rex_plot::SvgPhaseSpace;
use tracing::info;

use super::{load_config, load_line, write_json};
use crate::commands::plot::load_figure_config;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// YAML or JSON lattice description; the default lattice when omitted.
    #[arg(long)]
    pub lattice: Option<PathBuf>,
    /// YAML or JSON analysis configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Optional YAML or JSON figure configuration.
    #[arg(long)]
    pub figure: Option<PathBuf>,
    /// Output directory for `analysis_report.json` and `phase_space.svg`.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let line = load_line(args.lattice.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let report = analyze(&line, &config)?;

    let report_path = args.out.join("analysis_report.json");
    write_json(&report_path, &report)?;

    let mut sink = SvgPhaseSpace::new(load_figure_config(args.figure.as_deref())?);
    sink.render(&report.view())?;
    let figure_path = args.out.join("phase_space.svg");
    sink.write_to(&figure_path)?;

    info!(
        report = %report_path.display(),
        figure = %figure_path.display(),
        hash = %report.analysis_hash,
        "analysis written"
    );
    Ok(())
}
