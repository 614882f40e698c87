use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rex_core::SearchInterval;
use rex_optics::closest_stable_unstable;

use super::{load_config, load_line, print_json};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// YAML or JSON lattice description; the default lattice when omitted.
    #[arg(long)]
    pub lattice: Option<PathBuf>,
    /// YAML or JSON analysis configuration providing the search settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Lower bound of the initial interval, overriding the configuration.
    #[arg(long)]
    pub lo: Option<f64>,
    /// Upper bound of the initial interval, overriding the configuration.
    #[arg(long)]
    pub hi: Option<f64>,
    /// Turns tracked per test particle.
    #[arg(long)]
    pub num_turns: Option<usize>,
    /// Required width of the bracketing interval.
    #[arg(long)]
    pub precision: Option<f64>,
    /// Relative momentum offset of the test particles.
    #[arg(long)]
    pub delta: Option<f64>,
}

pub fn run(args: &SearchArgs) -> Result<(), Box<dyn Error>> {
    let line = load_line(args.lattice.as_deref())?;
    let mut config = load_config(args.config.as_deref())?;
    let interval = SearchInterval::new(
        args.lo.unwrap_or(config.x_search.lo),
        args.hi.unwrap_or(config.x_search.hi),
    );
    if let Some(num_turns) = args.num_turns {
        config.search.num_turns = num_turns;
    }
    if let Some(precision) = args.precision {
        config.search.abs_precision = precision;
    }
    if let Some(delta) = args.delta {
        config.search.delta = delta;
    }
    let bracket = closest_stable_unstable(&line, interval, &config.search)?;
    print_json(&bracket)
}
