//! Structured error types shared across REX crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`RexError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (turn indices, lengths, bounds, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the REX analysis routines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RexError {
    /// The boundary bisection ran out of iterations before reaching its precision.
    #[error("non-convergence: {0}")]
    NonConvergence(ErrorInfo),
    /// Not enough recorded turns around the septum crossing to fit the separatrix.
    #[error("insufficient samples: {0}")]
    InsufficientSamples(ErrorInfo),
    /// A rotated fixed-point search sector contained no sample.
    #[error("no fixed point: {0}")]
    NoFixedPoint(ErrorInfo),
    /// Malformed numeric input (empty, non-finite or mismatched arrays, bad parameters).
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// Failures raised by a tracking engine.
    #[error("tracking error: {0}")]
    Tracking(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl RexError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RexError::NonConvergence(info)
            | RexError::InsufficientSamples(info)
            | RexError::NoFixedPoint(info)
            | RexError::InvalidInput(info)
            | RexError::Tracking(info)
            | RexError::Serde(info) => info,
        }
    }

    /// Shorthand for an [`RexError::InvalidInput`] with the given code and message.
    pub fn invalid(code: &str, message: impl Into<String>) -> Self {
        RexError::InvalidInput(ErrorInfo::new(code, message))
    }
}

/// Rejects empty or non-finite sample arrays with a descriptive [`RexError::InvalidInput`].
pub fn ensure_finite(name: &str, values: &[f64]) -> Result<(), RexError> {
    if values.is_empty() {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("empty-samples", format!("`{name}` contains no samples"))
                .with_context("array", name),
        ));
    }
    if let Some(idx) = values.iter().position(|value| !value.is_finite()) {
        return Err(RexError::InvalidInput(
            ErrorInfo::new("non-finite-sample", format!("`{name}` contains a non-finite value"))
                .with_context("array", name)
                .with_context("index", idx),
        ));
    }
    Ok(())
}
