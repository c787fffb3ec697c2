//! Error types for the guest-feedback-rust library.
//!
//! This module provides custom error types using `thiserror` for better error
//! handling and more specific error messages throughout the application.
//!
//! Upstream unavailability (the keyword source or the inference service) is
//! deliberately not represented here: those failures are absorbed into safe
//! defaults at the call site and never surfaced to the submitter.

use thiserror::Error;

/// Errors that can occur in the guest-feedback-rust application.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// A required submission field is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Write to the feedback store failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `FeedbackError`
pub type Result<T> = std::result::Result<T, FeedbackError>;

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Other(err.to_string())
    }
}

impl FeedbackError {
    /// True when the error rejects the submission before classification.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, FeedbackError::Validation(_))
    }
}
