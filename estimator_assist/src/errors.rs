//! # Error Types
//!
//! Failures of the generative backends and the image cache. These never
//! escape [`crate::ChatAssistant::send`] or [`crate::ImageGenerator::generate`];
//! both log and degrade instead.

use estimator_core::EstimateError;
use thiserror::Error;

/// Result type alias for estimator_assist operations
pub type AssistResult<T> = Result<T, AssistError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistError {
    /// The configured API key environment variable is unset or empty
    #[error("Missing API key: environment variable {var} is not set")]
    MissingApiKey { var: String },

    /// Transport-level failure (connect, timeout, body decode)
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Backend reported quota exhaustion
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend answered but produced no usable content
    #[error("Empty response from model {model}")]
    EmptyResponse { model: String },

    /// Reading or writing the product image cache failed
    #[error("Image cache error: {0}")]
    Cache(#[from] EstimateError),
}

impl AssistError {
    pub fn http(message: impl Into<String>) -> Self {
        AssistError::Http {
            message: message.into(),
        }
    }

    /// Whether this failure means the quota is exhausted.
    ///
    /// Matches an explicit 429 as well as messages carrying `429`, `Quota`,
    /// or `RESOURCE_EXHAUSTED`.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            AssistError::RateLimited { .. } => true,
            AssistError::Api { status: 429, .. } => true,
            AssistError::Api { message, .. } | AssistError::Http { message } => {
                message_signals_quota(message)
            }
            _ => false,
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AssistError::MissingApiKey { .. } => "MISSING_API_KEY",
            AssistError::Http { .. } => "HTTP_ERROR",
            AssistError::RateLimited { .. } => "RATE_LIMITED",
            AssistError::Api { .. } => "API_ERROR",
            AssistError::EmptyResponse { .. } => "EMPTY_RESPONSE",
            AssistError::Cache(_) => "CACHE_ERROR",
        }
    }
}

fn message_signals_quota(message: &str) -> bool {
    ["429", "Quota", "RESOURCE_EXHAUSTED"]
        .iter()
        .any(|marker| message.contains(marker))
}
