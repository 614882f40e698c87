use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    analyze::{self, AnalyzeArgs},
    plot::{self, PlotArgs},
    search::{self, SearchArgs},
    version::{self, VersionArgs},
};
use logging::{init_logging, LogConfig, LogFormat, LogLevel};
use tracing::error;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "rex-sim", about = "Separatrix analysis for third-order resonant extraction")]
struct Cli {
    /// Minimum level of emitted log events; `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Formatting of log events written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bracket the stability boundary and print the interval as JSON.
    Search(SearchArgs),
    /// Run the full separatrix analysis and write the report and figure.
    Analyze(AnalyzeArgs),
    /// Render the phase-space figure of an existing report.
    Plot(PlotArgs),
    /// Print crate and schema versions.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig::new(cli.log_level, cli.log_format));
    let result = match &cli.command {
        Command::Search(args) => search::run(args),
        Command::Analyze(args) => analyze::run(args),
        Command::Plot(args) => plot::run(args),
        Command::Version(args) => version::run(args),
    };
    if let Err(err) = &result {
        error!(error = %err, "command failed");
    }
    result
}
