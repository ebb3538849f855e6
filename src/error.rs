//! Error types for conformance harness operations.
//!
//! The harness distinguishes four failure classes:
//! - Configuration problems (missing base URL, malformed values)
//! - Transport failures (connection refused, timeouts)
//! - API-level failures (non-2xx status from the mock)
//! - Conformance failures (response parsed but violates the documented shape)
//!
//! Test assertions remain ordinary panics; [`ConformanceError::ShapeMismatch`]
//! exists so shape verification can be composed as `Result`-returning checks
//! and reported with a JSON-pointer context.
//!
//! # Result Type
//!
//! Use [`ConformanceResult<T>`] as a convenient alias for
//! `Result<T, ConformanceError>`:
//!
//! ```rust
//! use llm_conformance::ConformanceResult;
//!
//! fn read_base_url(value: &str) -> ConformanceResult<String> {
//!     Ok(value.trim_end_matches('/').to_string())
//! }
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

/// High-level categorization of errors for reporting decisions.
///
/// Use [`ConformanceError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller's configuration is wrong (missing env var, bad URL).
    Client,

    /// The HTTP request never produced a response.
    Transport,

    /// The mock answered with an error status.
    Api,

    /// The mock answered, but the response violates the documented contract.
    Conformance,
}

/// Convenient result type for conformance operations.
pub type ConformanceResult<T> = std::result::Result<T, ConformanceError>;

/// Errors that can occur while driving a surface client or verifying a
/// response shape.
#[derive(Error, Debug)]
pub enum ConformanceError {
    /// Harness configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The HTTP request to the mock endpoint failed outright.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// Description of the failure.
        message: String,
        /// The underlying transport error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The mock endpoint answered with a non-success status.
    ///
    /// The mock accepts any model name and any placeholder credential, so
    /// this indicates a malformed request or a misrouted base URL rather
    /// than a rejected input.
    #[error("API error: status {status}: {body}")]
    ApiError {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, verbatim, for diagnosis.
        body: String,
    },

    /// The response body could not be decoded as the expected document.
    #[error("Response parsing failed: {message}")]
    ResponseParsingError {
        /// Details about the parsing failure.
        message: String,
    },

    /// The response decoded but does not match the documented shape.
    #[error("Shape mismatch at {context}: {message}")]
    ShapeMismatch {
        /// Where in the document the mismatch was found (JSON pointer or
        /// field path).
        context: String,
        /// What was expected versus what was found.
        message: String,
    },
}

impl ConformanceError {
    /// Create a configuration error, logging it.
    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(error = %message, "Configuration error");
        Self::ConfigurationError { message }
    }

    /// Create a request failure error, logging it.
    pub fn request_failed(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(error = %message, "Request failed");
        Self::RequestFailed { message, source }
    }

    /// Create an API error from a status code and body, logging it.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        log_warn!(status, body = %body, "API error response");
        Self::ApiError { status, body }
    }

    /// Create a response parsing error, logging it.
    pub fn response_parsing_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(error = %message, "Response parsing failed");
        Self::ResponseParsingError { message }
    }

    /// Create a shape mismatch error, logging it.
    pub fn shape_mismatch(context: impl Into<String>, message: impl Into<String>) -> Self {
        let context = context.into();
        let message = message.into();
        log_warn!(context = %context, mismatch = %message, "Shape mismatch");
        Self::ShapeMismatch { context, message }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::RequestFailed { .. } => ErrorCategory::Transport,
            Self::ApiError { .. } => ErrorCategory::Api,
            Self::ResponseParsingError { .. } | Self::ShapeMismatch { .. } => {
                ErrorCategory::Conformance
            }
        }
    }
}
