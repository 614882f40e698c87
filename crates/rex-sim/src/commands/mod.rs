use std::error::Error;
use std::fs;
use std::path::Path;

use rex_optics::{to_canonical_json_bytes, AnalysisConfig};
use rex_track::{HenonLine, LatticeSpec};
use serde::Serialize;

pub mod analyze;
pub mod plot;
pub mod search;
pub mod version;

/// Builds the Hénon engine from a lattice file, or from the default lattice.
pub(crate) fn load_line(path: Option<&Path>) -> Result<HenonLine, Box<dyn Error>> {
    let spec = match path {
        Some(path) => LatticeSpec::load(path)?,
        None => LatticeSpec::default(),
    };
    Ok(HenonLine::new(spec)?)
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(AnalysisConfig::load(path)?),
        None => Ok(AnalysisConfig::default()),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let bytes = to_canonical_json_bytes(value)?;
    println!("{}", String::from_utf8(bytes)?);
    Ok(())
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    fs::write(path, to_canonical_json_bytes(value)?)?;
    Ok(())
}
