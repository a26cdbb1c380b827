//! API version prefix.
//!
//! This module provides the [`ApiVersion`] type, the optional path segment
//! inserted in front of every resource path (e.g. `/v1/users/`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An API version path prefix.
///
/// Dynamic REST APIs are frequently mounted under a version segment. The
/// version is stored without surrounding slashes and rendered as a prefix
/// (`/v1`) when URLs are built.
///
/// # Example
///
/// ```rust
/// use drest::ApiVersion;
///
/// let version: ApiVersion = "/v2/".parse().unwrap();
/// assert_eq!(version.as_ref(), "v2");
/// assert_eq!(version.as_prefix(), "/v2");
/// assert_eq!(format!("{version}"), "v2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Creates a new validated version.
    ///
    /// Leading and trailing slashes are stripped. Nested segments such as
    /// `api/v1` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the version is empty
    /// after trimming, or contains whitespace, `?` or `#`.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into();
        let trimmed = version.trim().trim_matches('/');

        if trimmed.is_empty()
            || trimmed.contains(['?', '#'])
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidApiVersion { version });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the version as a URL path prefix, with a leading slash.
    #[must_use]
    pub fn as_prefix(&self) -> String {
        format!("/{}", self.0)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_strips_slashes() {
        let version = ApiVersion::new("/v1/").unwrap();
        assert_eq!(version.as_ref(), "v1");
        assert_eq!(version.as_prefix(), "/v1");
    }

    #[test]
    fn test_version_accepts_nested_segments() {
        let version = ApiVersion::new("api/v1").unwrap();
        assert_eq!(version.as_prefix(), "/api/v1");
    }

    #[test]
    fn test_version_rejects_invalid() {
        assert!(matches!(
            ApiVersion::new(""),
            Err(ConfigError::InvalidApiVersion { .. })
        ));
        assert!(ApiVersion::new("/").is_err());
        assert!(ApiVersion::new("v 1").is_err());
        assert!(ApiVersion::new("v1?x=1").is_err());
    }

    #[test]
    fn test_version_parses_from_str() {
        let version: ApiVersion = "v3".parse().unwrap();
        assert_eq!(version.to_string(), "v3");
    }
}
