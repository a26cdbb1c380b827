//! HTTP-specific error types for the Dynamic REST client.
//!
//! This module contains the error kinds produced when a request is mapped to
//! a result, plus request validation failures.
//!
//! # Status Mapping
//!
//! Every response is mapped with a fixed table:
//!
//! | Status            | Error                               |
//! |-------------------|-------------------------------------|
//! | 401               | [`HttpError::AuthenticationFailed`] |
//! | 404               | [`HttpError::DoesNotExist`]         |
//! | any other `>=400` | [`HttpError::BadRequest`]           |
//! | `<400`            | success, body decoded as JSON       |
//!
//! Transport failures (connection refused, timeouts) surface unchanged as
//! [`HttpError::Network`].
//!
//! # Example
//!
//! ```rust,ignore
//! use drest::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(body) => println!("Success: {body}"),
//!     Err(HttpError::AuthenticationFailed { message }) => println!("Login required: {message}"),
//!     Err(HttpError::DoesNotExist { url }) => println!("Nothing at {url}"),
//!     Err(HttpError::BadRequest { code, body }) => println!("API error {code}: {body}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Message used when an authentication failure carries no response body.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Error returned when a request fails validation before it is sent.
///
/// # Example
///
/// ```rust
/// use drest::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is empty.
    #[error("Cannot send a request without a path.")]
    EmptyPath,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Login failed, or the API answered 401.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// The response body, or [`UNKNOWN_ERROR`] if none was obtained.
        message: String,
    },

    /// The API answered 404.
    #[error("Resource does not exist: {url}")]
    DoesNotExist {
        /// The URL that was requested.
        url: String,
    },

    /// The API answered with any other status `>= 400`.
    #[error("Bad request ({code}): {body}")]
    BadRequest {
        /// The HTTP status code.
        code: u16,
        /// The raw response body, kept for diagnostics.
        body: String,
    },

    /// A successful response carried a body that is not JSON.
    #[error("Invalid JSON in response from {url}: {message}")]
    InvalidJson {
        /// The URL that was requested.
        url: String,
        /// The decoder's error message.
        message: String,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationFailed { .. } => Some(401),
            Self::DoesNotExist { .. } => Some(404),
            Self::BadRequest { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_includes_message() {
        let error = HttpError::AuthenticationFailed {
            message: UNKNOWN_ERROR.to_string(),
        };
        assert_eq!(error.to_string(), "Authentication failed: Unknown error");
    }

    #[test]
    fn test_bad_request_includes_code_and_body() {
        let error = HttpError::BadRequest {
            code: 500,
            body: r#"{"detail":"boom"}"#.to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_does_not_exist_status() {
        let error = HttpError::DoesNotExist {
            url: "https://api.example.com/users/1/".to_string(),
        };
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("/users/1/"));
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "patch".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use patch without specifying data.");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let http_error: &dyn std::error::Error = &HttpError::BadRequest {
            code: 400,
            body: "test".to_string(),
        };
        let _ = http_error;

        let invalid_error: &dyn std::error::Error = &InvalidHttpRequestError::EmptyPath;
        let _ = invalid_error;
    }
}
