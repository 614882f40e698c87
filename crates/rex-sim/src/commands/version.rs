use std::error::Error;

use clap::Args;
use rex_core::SchemaVersion;
use serde::Serialize;

use super::print_json;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print only the binary version instead of the JSON summary.
    #[arg(long)]
    pub short: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    rex_sim: &'static str,
    report_schema: SchemaVersion,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if args.short {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    print_json(&VersionInfo {
        rex_sim: env!("CARGO_PKG_VERSION"),
        report_schema: SchemaVersion::default(),
    })
}
