//! Top-level client for a Dynamic REST API.
//!
//! This module provides the [`DrestClient`] type, which ties the
//! [`HttpClient`] to a [`ResourceRegistry`].

use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthState, AuthStatus};
use crate::clients::drest::ResourceRegistry;
use crate::clients::{HttpClient, HttpError, HttpRequest};
use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::rest::Resource;

/// Client for a Dynamic REST API.
///
/// Resources are looked up by name with [`resource`](Self::resource); the
/// returned handle builds queries and records. Authentication state and
/// transport are shared by every handle obtained from the same client.
///
/// # Thread Safety
///
/// `DrestClient` is `Send + Sync`, making it safe to share across async
/// tasks. Requests are never issued concurrently by the client itself.
///
/// # Example
///
/// ```rust
/// use drest::{ApiVersion, ClientConfig, DrestClient, Host};
/// use drest::auth::Authentication;
/// use std::sync::Arc;
///
/// let config = ClientConfig::builder()
///     .host(Host::new("my.api.io").unwrap())
///     .version(ApiVersion::new("v1").unwrap())
///     .authentication(Authentication::token("secret"))
///     .build()
///     .unwrap();
/// let client = DrestClient::new(config).unwrap();
///
/// let users = client.resource("Users");
/// assert_eq!(users.name(), "users");
/// assert!(Arc::ptr_eq(&users, &client.resource("users")));
/// assert_eq!(client.to_string(), "my.api.io/v1/");
/// ```
#[derive(Debug)]
pub struct DrestClient {
    http: Arc<HttpClient>,
    resources: ResourceRegistry,
}

// Verify DrestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DrestClient>();
};

impl DrestClient {
    /// Creates a new client from the given configuration.
    ///
    /// No request is made; login (if configured) happens on the first
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP transport cannot be
    /// created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = HttpClient::new(&config)?;
        Ok(Self {
            http: Arc::new(http),
            resources: ResourceRegistry::new(),
        })
    }

    /// Returns the handle for the resource called `name`.
    ///
    /// The name is lower-cased; every lookup of the same name returns the
    /// same handle.
    #[must_use]
    pub fn resource(&self, name: &str) -> Arc<Resource> {
        self.resources.get_or_create(name, &self.http)
    }

    /// Returns the resource registry.
    #[must_use]
    pub const fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Returns a snapshot of the authentication state.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.http.auth_state()
    }

    /// Returns the current authentication status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.http.status()
    }

    /// Authenticates with a token sent as `Authorization`.
    pub fn use_token(&self, value: impl Into<String>) {
        self.http.use_token(value);
    }

    /// Authenticates with a session id sent as a `sessionid` cookie.
    pub fn use_session_id(&self, value: impl Into<String>) {
        self.http.use_session_id(value);
    }

    /// Ensures the client is authenticated.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::authenticate`].
    pub async fn authenticate(&self, raise_on_failure: bool) -> Result<bool, HttpError> {
        self.http.authenticate(raise_on_failure).await
    }

    /// Builds an absolute URL for `path` with an optional prefix.
    #[must_use]
    pub fn build_url(&self, path: &str, prefix: Option<&str>) -> String {
        self.http.build_url(path, prefix)
    }

    /// Sends a raw request below the version prefix.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn request(&self, request: HttpRequest) -> Result<serde_json::Value, HttpError> {
        self.http.request(request).await
    }
}

impl fmt::Display for DrestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http.version() {
            Some(version) => write!(f, "{}/{}/", self.http.host(), version),
            None => write!(f, "{}", self.http.host()),
        }
    }
}
