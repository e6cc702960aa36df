//! Structured error types for analysis, data loading and configuration.
//!
//! Undefined indicator values are never errors: they travel through the
//! pipeline as `NaN` / `None`. Analysis fails only on a series too short for
//! a stage's window, or on a zero-length window.

use thiserror::Error;

/// Errors raised by the analysis stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("insufficient data for {stage}: need {required} bars, have {actual}")]
    InsufficientData {
        stage: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{name} window must be >= 1")]
    ZeroWindow { name: &'static str },
}

impl AnalysisError {
    pub(crate) fn insufficient(stage: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            stage,
            required,
            actual,
        }
    }
}

/// Errors from reading or writing bar data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unparseable timestamp '{value}'")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: non-finite value in column '{column}'")]
    NonFinite { row: usize, column: &'static str },

    #[error("invalid interval '{0}' (expected e.g. \"1 hour\", \"15 minutes\", \"15m\")")]
    InvalidInterval(String),

    #[error("input contains no bars")]
    Empty,
}

/// Errors from loading or validating an `AnalysisConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
