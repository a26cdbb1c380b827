//! HTTP response types for the Dynamic REST client.
//!
//! This module provides [`HttpResponse`], a raw response captured from the
//! transport, and the status-code mapping that turns it into a decoded JSON
//! body or an [`HttpError`].

use std::collections::HashMap;

use crate::clients::errors::{HttpError, UNKNOWN_ERROR};

/// A raw HTTP response from the API.
///
/// Header names are lower-cased; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers.
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded response body.
    pub text: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, text: String) -> Self {
        Self {
            code,
            headers,
            text,
        }
    }

    /// Returns `true` if the status code is below 400.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code < 400
    }

    /// Returns all values of the `Set-Cookie` header.
    #[must_use]
    pub fn set_cookies(&self) -> &[String] {
        self.headers.get("set-cookie").map_or(&[], Vec::as_slice)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the body, or [`UNKNOWN_ERROR`] when it is blank.
    #[must_use]
    pub fn body_or_unknown(&self) -> String {
        if self.text.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            self.text.clone()
        }
    }

    /// Maps the status code and decodes the body.
    ///
    /// - 401 → [`HttpError::AuthenticationFailed`]
    /// - 404 → [`HttpError::DoesNotExist`]
    /// - any other `>= 400` → [`HttpError::BadRequest`]
    /// - otherwise the JSON-decoded body; an empty body decodes to `{}`
    ///
    /// # Errors
    ///
    /// Returns the mapped [`HttpError`], or [`HttpError::InvalidJson`] when a
    /// successful body cannot be decoded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drest::clients::{HttpError, HttpResponse};
    /// use std::collections::HashMap;
    ///
    /// let response = HttpResponse::new(404, HashMap::new(), String::new());
    /// let result = response.into_json("https://api.example.com/users/9/");
    /// assert!(matches!(result, Err(HttpError::DoesNotExist { .. })));
    /// ```
    pub fn into_json(self, url: &str) -> Result<serde_json::Value, HttpError> {
        match self.code {
            401 => {
                tracing::warn!("Request to {} was rejected as unauthenticated", url);
                Err(HttpError::AuthenticationFailed {
                    message: self.body_or_unknown(),
                })
            }
            404 => Err(HttpError::DoesNotExist {
                url: url.to_string(),
            }),
            code if code >= 400 => Err(HttpError::BadRequest {
                code,
                body: self.text,
            }),
            _ if self.text.trim().is_empty() => Ok(serde_json::json!({})),
            _ => serde_json::from_str(&self.text).map_err(|e| HttpError::InvalidJson {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://api.example.com/v1/users/";

    fn response(code: u16, text: &str) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), text.to_string())
    }

    #[test]
    fn test_is_ok_below_400() {
        assert!(response(200, "").is_ok());
        assert!(response(204, "").is_ok());
        assert!(response(302, "").is_ok());
        assert!(!response(400, "").is_ok());
        assert!(!response(500, "").is_ok());
    }

    #[test]
    fn test_401_maps_to_authentication_failed() {
        let result = response(401, r#"{"detail":"nope"}"#).into_json(URL);
        match result {
            Err(HttpError::AuthenticationFailed { message }) => {
                assert!(message.contains("nope"));
            }
            other => panic!("Expected AuthenticationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_401_without_body_reports_unknown_error() {
        let result = response(401, "").into_json(URL);
        assert!(matches!(
            result,
            Err(HttpError::AuthenticationFailed { message }) if message == UNKNOWN_ERROR
        ));
    }

    #[test]
    fn test_404_maps_to_does_not_exist() {
        let result = response(404, "missing").into_json(URL);
        assert!(matches!(result, Err(HttpError::DoesNotExist { url }) if url == URL));
    }

    #[test]
    fn test_other_client_and_server_errors_map_to_bad_request() {
        for code in [400, 403, 409, 422, 500, 503] {
            let result = response(code, "err").into_json(URL);
            assert!(
                matches!(result, Err(HttpError::BadRequest { code: c, ref body }) if c == code && body == "err"),
                "Expected BadRequest for {code}"
            );
        }
    }

    #[test]
    fn test_success_decodes_json() {
        let body = response(200, r#"{"users": []}"#).into_json(URL).unwrap();
        assert_eq!(body, json!({"users": []}));
    }

    #[test]
    fn test_empty_body_decodes_to_empty_object() {
        let body = response(204, "").into_json(URL).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_non_json_success_body_is_an_error() {
        let result = response(200, "<html>").into_json(URL);
        assert!(matches!(result, Err(HttpError::InvalidJson { .. })));
    }

    #[test]
    fn test_set_cookies_and_request_id() {
        let mut headers = HashMap::new();
        headers.insert(
            "set-cookie".to_string(),
            vec!["a=1".to_string(), "sessionid=x".to_string()],
        );
        headers.insert("x-request-id".to_string(), vec!["req-1".to_string()]);

        let response = HttpResponse::new(200, headers, String::new());
        assert_eq!(response.set_cookies().len(), 2);
        assert_eq!(response.request_id(), Some("req-1"));
    }
}
