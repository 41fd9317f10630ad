//! Result and error types for chainverify.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed cause attached to a [`VerificationError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result of a single verification in a chain.
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Result type for snapshot and plan operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// The single failure kind raised by every verification.
///
/// Carries a human-readable message and, for delegated verifications, the
/// error that triggered it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VerificationError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl VerificationError {
    /// Create a verification failure with a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a verification failure that wraps an underlying cause
    #[must_use]
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The failure message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying cause, if any
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

/// Errors from loading snapshots and plans.
#[derive(Debug, Error)]
pub enum ChainError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Plan file has an extension we cannot parse
    #[error("Unknown plan format: {path} (expected .yaml, .yml or .json)")]
    UnknownPlanFormat {
        /// Offending path
        path: String,
    },

    /// A verification failed
    #[error(transparent)]
    Verification(#[from] VerificationError),
}
