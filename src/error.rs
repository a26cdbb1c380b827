//! Error types for client configuration.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) or one of its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use drest::{Host, ConfigError};
//!
//! let result = Host::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyHost)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Host cannot be empty.
    #[error("Host cannot be empty. Please provide the host name of a Dynamic REST API.")]
    EmptyHost,

    /// Host is not a bare host name.
    #[error("Invalid host '{host}'. Expected a host name with optional port (e.g., 'api.example.com' or 'localhost:8000'), without scheme or path.")]
    InvalidHost {
        /// The invalid host that was provided.
        host: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected a single path segment (e.g., 'v1').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Scheme is not supported.
    #[error("Unsupported scheme '{scheme}'. Expected 'http' or 'https'.")]
    InvalidScheme {
        /// The scheme that was provided.
        scheme: String,
    },

    /// Auth endpoint is invalid.
    #[error("Invalid auth endpoint '{endpoint}'. Expected a non-empty path (e.g., '/accounts/login/').")]
    InvalidAuthEndpoint {
        /// The endpoint that was provided.
        endpoint: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP transport: {reason}")]
    Transport {
        /// The reason reported by the transport.
        reason: String,
    },
}
