//! Error types for reparto
//!
//! Assignment itself is best-effort: storage failures degrade to an
//! ephemeral assignment and are logged, never surfaced as errors. The
//! error paths here are experiment lookup and configuration validation.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Reparto error types
#[derive(Error, Debug)]
pub enum Error {
    /// Experiment name not present in the registry
    #[error("unknown experiment: {0}\nRegister the experiment before requesting an assignment")]
    UnknownExperiment(String),

    /// Experiment or registry configuration rejected at validation
    #[error("invalid experiment config: {0}")]
    InvalidConfig(String),

    /// Variant weight is negative, NaN, or infinite
    #[error("invalid weight {weight} for variant '{variant}'\nWeights must be finite and non-negative")]
    InvalidWeight {
        /// Offending variant name
        variant: String,
        /// Rejected weight value
        weight: f64,
    },

    /// Assignment store backend failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Config or persisted-record (de)serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
