//! Configuration types for the Dynamic REST client.
//!
//! This module provides the configuration used to construct a
//! [`DrestClient`](crate::DrestClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`Host`]: A validated API host (with optional port)
//! - [`ApiVersion`]: The optional version path prefix
//! - [`Scheme`]: `http` or `https`
//! - [`AuthToken`], [`SessionId`], [`Password`]: Secret newtypes with masked debug output
//!
//! # Example
//!
//! ```rust
//! use drest::{ClientConfig, Host, ApiVersion};
//! use drest::auth::Authentication;
//!
//! let config = ClientConfig::builder()
//!     .host(Host::new("api.example.com").unwrap())
//!     .version(ApiVersion::new("v1").unwrap())
//!     .authentication(Authentication::token("Token secret"))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;
mod version;

pub use newtypes::{AuthToken, Host, Password, Scheme, SessionId};
pub use version::ApiVersion;

use std::time::Duration;

use crate::auth::Authentication;
use crate::error::ConfigError;

/// Default path of the login endpoint.
pub const DEFAULT_AUTH_ENDPOINT: &str = "/accounts/login/";

/// Configuration for a Dynamic REST client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use drest::{ClientConfig, Host, Scheme};
///
/// let config = ClientConfig::builder()
///     .host(Host::new("localhost:8000").unwrap())
///     .scheme(Scheme::Http)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.scheme(), Scheme::Http);
/// assert!(config.version().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    host: Host,
    version: Option<ApiVersion>,
    scheme: Scheme,
    authentication: Option<Authentication>,
    auth_endpoint: String,
    timeout: Option<Duration>,
    page_size: Option<u32>,
    user_agent_prefix: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API host.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the API version prefix, if configured.
    #[must_use]
    pub const fn version(&self) -> Option<&ApiVersion> {
        self.version.as_ref()
    }

    /// Returns the URL scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the construction-time credentials, if any.
    #[must_use]
    pub const fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    /// Returns the login endpoint path.
    #[must_use]
    pub fn auth_endpoint(&self) -> &str {
        &self.auth_endpoint
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the default page size requested by listings, if configured.
    #[must_use]
    pub const fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the caller-supplied transport, if any.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `host` is the only required field.
///
/// # Defaults
///
/// - `scheme`: [`Scheme::Https`]
/// - `version`: `None` (no prefix)
/// - `authentication`: `None` (anonymous)
/// - `auth_endpoint`: [`DEFAULT_AUTH_ENDPOINT`]
/// - `timeout`: `None` (transport default)
/// - `page_size`: `None` (server default)
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    host: Option<Host>,
    version: Option<ApiVersion>,
    scheme: Option<Scheme>,
    authentication: Option<Authentication>,
    auth_endpoint: Option<String>,
    timeout: Option<Duration>,
    page_size: Option<u32>,
    user_agent_prefix: Option<String>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API host (required).
    #[must_use]
    pub fn host(mut self, host: Host) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the API version prefix.
    #[must_use]
    pub fn version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the URL scheme.
    #[must_use]
    pub const fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Sets the credentials used by the client.
    #[must_use]
    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Sets the login endpoint path.
    #[must_use]
    pub fn auth_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the timeout applied to every request.
    ///
    /// Ignored when a custom transport is supplied via
    /// [`http_client`](Self::http_client); configure the timeout on that
    /// client instead.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the page size requested by listings.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Supplies the transport used for API requests.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `host` is not set, or
    /// [`ConfigError::InvalidAuthEndpoint`] if the auth endpoint is blank.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let host = self
            .host
            .ok_or(ConfigError::MissingRequiredField { field: "host" })?;

        let auth_endpoint = match self.auth_endpoint {
            Some(endpoint) => normalize_endpoint(&endpoint)?,
            None => DEFAULT_AUTH_ENDPOINT.to_string(),
        };

        Ok(ClientConfig {
            host,
            version: self.version,
            scheme: self.scheme.unwrap_or_default(),
            authentication: self.authentication,
            auth_endpoint,
            timeout: self.timeout,
            page_size: self.page_size,
            user_agent_prefix: self.user_agent_prefix,
            http_client: self.http_client,
        })
    }
}

fn normalize_endpoint(endpoint: &str) -> Result<String, ConfigError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() || trimmed == "/" || trimmed.contains("://") {
        return Err(ConfigError::InvalidAuthEndpoint {
            endpoint: endpoint.to_string(),
        });
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_host() {
        let result = ClientConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "host" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder()
            .host(Host::new("api.example.com").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.scheme(), Scheme::Https);
        assert!(config.version().is_none());
        assert!(config.authentication().is_none());
        assert_eq!(config.auth_endpoint(), DEFAULT_AUTH_ENDPOINT);
        assert!(config.timeout().is_none());
        assert!(config.page_size().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.http_client().is_none());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ClientConfig::builder()
            .host(Host::new("localhost:8000").unwrap())
            .version(ApiVersion::new("v2").unwrap())
            .scheme(Scheme::Http)
            .authentication(Authentication::token("T"))
            .auth_endpoint("api/login")
            .timeout(Duration::from_secs(5))
            .page_size(50)
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.version().map(AsRef::as_ref), Some("v2"));
        assert_eq!(config.scheme(), Scheme::Http);
        assert!(config.authentication().is_some());
        assert_eq!(config.auth_endpoint(), "/api/login");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.page_size(), Some(50));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_builder_rejects_blank_auth_endpoint() {
        let result = ClientConfig::builder()
            .host(Host::new("api.example.com").unwrap())
            .auth_endpoint("  ")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidAuthEndpoint { .. })
        ));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}
