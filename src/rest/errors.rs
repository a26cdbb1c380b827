//! Resource-specific error types for query and record operations.
//!
//! This module contains [`ResourceError`], which wraps the request-layer
//! [`HttpError`] unchanged and adds failures that only exist once a response
//! has to be interpreted as records.
//!
//! # Example
//!
//! ```rust,ignore
//! use drest::clients::HttpError;
//! use drest::rest::ResourceError;
//!
//! match client.resource("users").get("123").await {
//!     Ok(user) => println!("Found: {:?}", user.get("name")),
//!     Err(ResourceError::Http(HttpError::DoesNotExist { url })) => {
//!         println!("Nothing at {url}");
//!     }
//!     Err(e) if e.is_bad_request() => {
//!         for (field, messages) in e.field_errors() {
//!             println!("{field}: {messages:?}");
//!         }
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::collections::HashMap;

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for resource, query and record operations.
///
/// # Example
///
/// ```rust
/// use drest::rest::ResourceError;
///
/// let error = ResourceError::MissingIdentity {
///     resource: "users".to_string(),
///     operation: "delete",
/// };
/// assert!(error.to_string().contains("users"));
/// assert!(error.to_string().contains("delete"));
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An error from the request layer, passed through unchanged.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body did not contain the expected envelope.
    #[error("Unexpected response for {resource}: {reason}")]
    UnexpectedResponse {
        /// The resource name.
        resource: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// The operation needs a record identity, but the record has none.
    #[error("Cannot {operation} a {resource} record that has no id")]
    MissingIdentity {
        /// The resource name.
        resource: String,
        /// The operation being attempted (e.g., "reload", "delete").
        operation: &'static str,
    },
}

impl ResourceError {
    pub(crate) fn unexpected(resource: &str, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the server answered 404.
    #[must_use]
    pub const fn is_does_not_exist(&self) -> bool {
        matches!(self, Self::Http(HttpError::DoesNotExist { .. }))
    }

    /// Returns `true` if the server rejected the credentials or login failed.
    #[must_use]
    pub const fn is_authentication_failed(&self) -> bool {
        matches!(self, Self::Http(HttpError::AuthenticationFailed { .. }))
    }

    /// Returns `true` if the server answered any other status `>= 400`.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Http(HttpError::BadRequest { .. }))
    }

    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns per-field messages from a rejected write.
    ///
    /// Dynamic REST reports validation failures as a JSON object mapping
    /// field names to lists of messages; non-field messages come back under
    /// `non_field_errors` or `detail`. Returns an empty map for any other
    /// error or an unparseable body.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drest::clients::HttpError;
    /// use drest::rest::ResourceError;
    ///
    /// let error = ResourceError::Http(HttpError::BadRequest {
    ///     code: 400,
    ///     body: r#"{"name": ["This field is required."]}"#.to_string(),
    /// });
    /// let errors = error.field_errors();
    /// assert_eq!(errors["name"], vec!["This field is required.".to_string()]);
    /// ```
    #[must_use]
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        match self {
            Self::Http(HttpError::BadRequest { body, .. }) => serde_json::from_str(body)
                .map(|value| parse_field_errors(&value))
                .unwrap_or_default(),
            _ => HashMap::new(),
        }
    }
}

fn parse_field_errors(body: &serde_json::Value) -> HashMap<String, Vec<String>> {
    let mut result = HashMap::new();

    if let serde_json::Value::Object(map) = body {
        for (field, messages) in map {
            let msgs: Vec<String> = match messages {
                serde_json::Value::Array(arr) => arr
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), ToString::to_string))
                    .collect(),
                serde_json::Value::String(s) => vec![s.clone()],
                _ => vec![messages.to_string()],
            };
            result.insert(field.clone(), msgs);
        }
    }

    result
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
