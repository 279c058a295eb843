//! Error types for HealthDash

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthError {
    // Source errors (recovered by the fallback generator)
    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Source at {path} is malformed: {reason}")]
    SourceMalformed { path: PathBuf, reason: String },

    // Reference data errors
    #[error("Invalid reference table: {reason}")]
    ReferenceInvalid { reason: String },

    #[error("Invalid metric catalog entry '{metric}': {reason}")]
    CatalogInvalid { metric: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HealthError {
    /// Whether the error comes from the primary source and should trigger the fallback path
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            HealthError::SourceUnavailable { .. } | HealthError::SourceMalformed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HealthError>;
