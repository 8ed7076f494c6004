//! Error types for building the completion client.
//!
//! Failures of an individual call are not errors: they come back as
//! [`CompletionOutcome`](friendbot_core::CompletionOutcome) variants.

use thiserror::Error;

/// Errors that can occur when constructing a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration value cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
