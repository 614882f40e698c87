use std::path::Path;

use rex_core::errors::{ErrorInfo, RexError};
use rex_core::Twiss;
use serde::{Deserialize, Serialize};

fn lattice_error(code: &str, message: impl Into<String>) -> RexError {
    RexError::InvalidInput(ErrorInfo::new(code, message.into()))
}

fn default_tune() -> f64 {
    0.33
}

fn default_k2l() -> f64 {
    1.0
}

fn default_beta() -> f64 {
    10.0
}

fn default_aperture() -> f64 {
    0.1
}

/// Parameters of the thin-sextupole one-turn map driving a third-order resonance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeSpec {
    /// Fractional horizontal tune of the on-momentum particle.
    #[serde(default = "default_tune")]
    pub tune: f64,
    /// Linear chromaticity, tune shift per unit momentum offset.
    #[serde(default)]
    pub chroma: f64,
    /// Integrated sextupole strength in m^-2.
    #[serde(default = "default_k2l")]
    pub k2l: f64,
    /// Beta function at the observation point in metres.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Alpha function at the observation point.
    #[serde(default)]
    pub alpha: f64,
    /// Horizontal dispersion at the observation point in metres.
    #[serde(default)]
    pub dx: f64,
    /// Half aperture beyond which a particle is lost, in metres.
    #[serde(default = "default_aperture")]
    pub aperture: f64,
}

impl Default for LatticeSpec {
    fn default() -> Self {
        Self {
            tune: default_tune(),
            chroma: 0.0,
            k2l: default_k2l(),
            beta: default_beta(),
            alpha: 0.0,
            dx: 0.0,
            aperture: default_aperture(),
        }
    }
}

impl LatticeSpec {
    /// Validates the numeric ranges of the lattice parameters.
    pub fn validate(&self) -> Result<(), RexError> {
        let all_finite = [
            self.tune,
            self.chroma,
            self.k2l,
            self.beta,
            self.alpha,
            self.dx,
            self.aperture,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !all_finite {
            return Err(lattice_error(
                "non-finite-lattice",
                "lattice parameters must be finite",
            ));
        }
        if self.beta <= 0.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-beta", "beta function must be positive")
                    .with_context("beta", self.beta),
            ));
        }
        if self.aperture <= 0.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-aperture", "aperture must be positive")
                    .with_context("aperture", self.aperture),
            ));
        }
        Ok(())
    }

    /// Optics at the observation point implied by the lattice parameters.
    pub fn twiss(&self) -> Twiss {
        Twiss {
            beta: self.beta,
            alpha: self.alpha,
            dx: self.dx,
            ..Twiss::default()
        }
    }

    /// Loads a lattice description from a YAML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, RexError> {
        let bytes = std::fs::read(path).map_err(|err| {
            RexError::Serde(
                ErrorInfo::new("lattice-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        let spec: LatticeSpec = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_slice(&bytes)
                .map_err(|err| RexError::Serde(ErrorInfo::new("lattice-json", err.to_string())))?,
            _ => serde_yaml::from_slice(&bytes)
                .map_err(|err| RexError::Serde(ErrorInfo::new("lattice-yaml", err.to_string())))?,
        };
        spec.validate()?;
        Ok(spec)
    }
}
