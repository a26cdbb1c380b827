//! HTTP client for Dynamic REST API communication.
//!
//! This module provides the [`HttpClient`] type: it owns the connection
//! parameters, the authentication state and the request/error-mapping
//! primitive every higher-level operation goes through.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::auth::session::session_id_from_set_cookie;
use crate::auth::{AuthState, AuthStatus, LoginCredentials};
use crate::clients::errors::{HttpError, UNKNOWN_ERROR};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiVersion, ClientConfig, Host, Scheme};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to a Dynamic REST API.
///
/// The client handles:
/// - URL construction from scheme, host and version prefix
/// - Default headers (`Content-Type`, `Accept`, `User-Agent`)
/// - The active credential header (`Authorization` or `Cookie`)
/// - Logging in with a login and password when no credential is active
/// - Mapping response status codes to [`HttpError`] kinds
///
/// Requests are never retried and never issued concurrently by the client
/// itself: each call performs exactly one exchange (plus a login exchange
/// when one is needed).
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. The authentication state sits behind a
/// lock, so credential changes made through one handle are observed by every
/// request issued afterwards.
///
/// # Example
///
/// ```rust
/// use drest::{ClientConfig, Host};
/// use drest::clients::HttpClient;
///
/// let config = ClientConfig::builder()
///     .host(Host::new("api.example.com").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config).unwrap();
///
/// assert_eq!(client.build_url("users", Some("v1")), "https://api.example.com/v1/users");
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The transport used for API requests.
    client: reqwest::Client,
    /// The transport used for logging in; never follows redirects.
    login_client: reqwest::Client,
    scheme: Scheme,
    host: Host,
    version: Option<ApiVersion>,
    auth_endpoint: String,
    login: Option<LoginCredentials>,
    page_size: Option<u32>,
    /// Headers sent with every request, excluding the credential header.
    base_headers: HashMap<String, String>,
    state: RwLock<AuthState>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// If the configuration carries a token or session id it is installed
    /// and the client starts [`AuthStatus::Authenticated`]; otherwise it
    /// starts [`AuthStatus::Unauthenticated`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the underlying reqwest client
    /// cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Dynamic REST Client v{SDK_VERSION} | Rust {rust_version}");

        let mut base_headers = HashMap::new();
        base_headers.insert("Content-Type".to_string(), "application/json".to_string());
        base_headers.insert("Accept".to_string(), "application/json".to_string());
        base_headers.insert("User-Agent".to_string(), user_agent);

        let client = match config.http_client() {
            Some(client) => client.clone(),
            None => Self::build_transport(config, reqwest::redirect::Policy::default())?,
        };
        let login_client = Self::build_transport(config, reqwest::redirect::Policy::none())?;

        let authentication = config.authentication();
        let state = AuthState::from_authentication(authentication);
        tracing::debug!(
            "Client for {} starting {:?}",
            config.host(),
            state.status()
        );

        Ok(Self {
            client,
            login_client,
            scheme: config.scheme(),
            host: config.host().clone(),
            version: config.version().cloned(),
            auth_endpoint: config.auth_endpoint().to_string(),
            login: authentication.and_then(|a| a.login_credentials().cloned()),
            page_size: config.page_size(),
            base_headers,
            state: RwLock::new(state),
        })
    }

    fn build_transport(
        config: &ClientConfig,
        redirect: reqwest::redirect::Policy,
    ) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(redirect);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| ConfigError::Transport {
            reason: e.to_string(),
        })
    }

    /// Returns the base URI (e.g., `https://api.example.com`).
    #[must_use]
    pub fn base_uri(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the version prefix, if configured.
    #[must_use]
    pub const fn version(&self) -> Option<&ApiVersion> {
        self.version.as_ref()
    }

    /// Returns the default page size for listings, if configured.
    #[must_use]
    pub const fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Returns a snapshot of the authentication state.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current authentication status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }

    /// Returns the headers sent with every request, including the active
    /// credential header.
    #[must_use]
    pub fn default_headers(&self) -> HashMap<String, String> {
        let mut headers = self.base_headers.clone();
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(credential) = state.credential() {
            let (name, value) = credential.header();
            headers.insert(name.to_string(), value);
        }
        headers
    }

    /// Replaces the active credential with a token sent as `Authorization`.
    ///
    /// An empty value clears the credential and leaves the client
    /// unauthenticated.
    pub fn use_token(&self, value: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .use_token(value);
    }

    /// Replaces the active credential with a session id sent as
    /// `Cookie: sessionid=<value>`.
    ///
    /// An empty value clears the credential and leaves the client
    /// unauthenticated.
    pub fn use_session_id(&self, value: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .use_session_id(value);
    }

    /// Builds an absolute URL for `path`.
    ///
    /// `path` and `prefix` are both given a leading slash if they lack one;
    /// the prefix is inserted in front of the path.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use drest::{ClientConfig, Host};
    /// # use drest::clients::HttpClient;
    /// # let config = ClientConfig::builder().host(Host::new("api.example.com").unwrap()).build().unwrap();
    /// # let client = HttpClient::new(&config).unwrap();
    /// assert_eq!(client.build_url("/users/", None), "https://api.example.com/users/");
    /// assert_eq!(client.build_url("users/", Some("/v2")), "https://api.example.com/v2/users/");
    /// ```
    #[must_use]
    pub fn build_url(&self, path: &str, prefix: Option<&str>) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let path = match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) if prefix.starts_with('/') => format!("{prefix}{path}"),
            Some(prefix) => format!("/{prefix}{path}"),
            None => path,
        };

        format!("{}{}", self.base_uri(), path)
    }

    /// Ensures the client is authenticated, logging in if necessary.
    ///
    /// - Already authenticated: returns `Ok(true)` without a request.
    /// - No credential and no login configured: the client is anonymous;
    ///   returns `Ok(false)` without a request.
    /// - Otherwise posts `login`/`password` to the auth endpoint (without the
    ///   version prefix, without following redirects) and installs the
    ///   returned `sessionid` cookie.
    ///
    /// # Errors
    ///
    /// When the login fails the status becomes [`AuthStatus::Failed`]. With
    /// `raise_on_failure` the call then fails with
    /// [`HttpError::AuthenticationFailed`] carrying the response body, or
    /// [`UNKNOWN_ERROR`] if no response was obtained; without it the call
    /// returns `Ok(false)`.
    pub async fn authenticate(&self, raise_on_failure: bool) -> Result<bool, HttpError> {
        if self.status() == AuthStatus::Authenticated {
            return Ok(true);
        }

        let Some(login) = &self.login else {
            return Ok(false);
        };

        let url = self.build_url(&self.auth_endpoint, None);
        tracing::debug!("Logging in as {} at {}", login.login, url);

        let form = [
            ("login", login.login.as_str()),
            ("password", login.password.as_ref()),
        ];
        let result = match self
            .login_client
            .post(&url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
        {
            Ok(res) => Self::capture(res).await,
            Err(e) => Err(HttpError::Network(e)),
        };

        let message = match result {
            Ok(response) => {
                let session_id = response
                    .is_ok()
                    .then(|| session_id_from_set_cookie(response.set_cookies()))
                    .flatten();
                if let Some(session_id) = session_id {
                    self.use_session_id(session_id);
                    tracing::debug!("Logged in as {}", login.login);
                    return Ok(true);
                }
                response.body_or_unknown()
            }
            Err(e) => {
                tracing::warn!("Login request to {} failed: {}", url, e);
                UNKNOWN_ERROR.to_string()
            }
        };

        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .mark_failed();
        tracing::warn!("Authentication as {} failed", login.login);

        if raise_on_failure {
            return Err(HttpError::AuthenticationFailed { message });
        }
        Ok(false)
    }

    /// Sends a request to the API and decodes the response.
    ///
    /// This method:
    /// - Validates the request
    /// - Authenticates first (see [`authenticate`](Self::authenticate))
    /// - Prefixes the path with the configured version
    /// - Maps the status code (see [`HttpResponse::into_json`])
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if validation or authentication fails, the
    /// transport fails, or the API answers with a status `>= 400`.
    pub async fn request(&self, request: HttpRequest) -> Result<serde_json::Value, HttpError> {
        request.verify()?;
        self.authenticate(true).await?;

        let url = self.build_url(&request.path, self.version.as_ref().map(AsRef::as_ref));

        let mut headers = self.default_headers();
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!("{} {}", request.http_method, url);
        let res = req_builder.send().await?;
        let response = Self::capture(res).await?;

        if let Some(request_id) = response.request_id() {
            tracing::debug!("{} {} answered {} ({})", request.http_method, url, response.code, request_id);
        }

        response.into_json(&url)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(query)
            .build()?;
        self.request(request).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Patch, path)
            .body(body)
            .build()?;
        self.request(request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.request(request).await
    }

    /// Reads status, headers and body from a transport response.
    ///
    /// A body that cannot be read in full is a [`HttpError::Network`].
    async fn capture(res: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let text = res.text().await?;
        Ok(HttpResponse::new(code, headers, text))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::config::{AuthToken, SessionId};
    use crate::auth::Credential;

    fn create_client(authentication: Option<Authentication>) -> HttpClient {
        let mut builder = ClientConfig::builder().host(Host::new("api.example.com").unwrap());
        if let Some(auth) = authentication {
            builder = builder.authentication(auth);
        }
        HttpClient::new(&builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_default_headers_are_json() {
        let client = create_client(None);
        let headers = client.default_headers();

        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("Accept"), Some(&"application/json".to_string()));
        assert!(headers.get("Authorization").is_none());
        assert!(headers.get("Cookie").is_none());
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = create_client(None);
        let headers = client.default_headers();
        let user_agent = headers.get("User-Agent").unwrap();
        assert!(user_agent.contains("Dynamic REST Client v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_construction_with_token_is_authenticated() {
        let client = create_client(Some(Authentication::token("T")));

        assert_eq!(client.status(), AuthStatus::Authenticated);
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"T".to_string())
        );
    }

    #[test]
    fn test_construction_without_credentials_is_unauthenticated() {
        let client = create_client(None);
        assert_eq!(client.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_use_session_id_replaces_token_header() {
        let client = create_client(Some(Authentication::token("T")));
        client.use_session_id("S");

        let headers = client.default_headers();
        assert!(headers.get("Authorization").is_none());
        assert_eq!(headers.get("Cookie"), Some(&"sessionid=S".to_string()));
        assert_eq!(
            client.auth_state().credential(),
            Some(&Credential::SessionId(SessionId::new("S")))
        );
    }

    #[test]
    fn test_use_token_with_empty_value_unauthenticates() {
        let client = create_client(Some(Authentication::session_id("S")));
        client.use_token("");

        assert_eq!(client.status(), AuthStatus::Unauthenticated);
        assert!(client.default_headers().get("Cookie").is_none());
        assert!(client.default_headers().get("Authorization").is_none());
    }

    #[test]
    fn test_use_token_installs_authorization() {
        let client = create_client(None);
        client.use_token("Token abc");

        assert_eq!(client.status(), AuthStatus::Authenticated);
        assert_eq!(
            client.auth_state().credential(),
            Some(&Credential::Token(AuthToken::new("Token abc")))
        );
    }

    #[test]
    fn test_build_url_normalizes_path_and_prefix() {
        let client = create_client(None);

        assert_eq!(client.build_url("users", None), "https://api.example.com/users");
        assert_eq!(client.build_url("/users/", None), "https://api.example.com/users/");
        assert_eq!(
            client.build_url("users/", Some("v1")),
            "https://api.example.com/v1/users/"
        );
        assert_eq!(
            client.build_url("/users/", Some("/v1")),
            "https://api.example.com/v1/users/"
        );
        assert_eq!(client.build_url("/users/", Some("")), "https://api.example.com/users/");
    }

    #[test]
    fn test_base_uri_uses_scheme() {
        let config = ClientConfig::builder()
            .host(Host::new("localhost:8000").unwrap())
            .scheme(Scheme::Http)
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        assert_eq!(client.base_uri(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_authenticate_is_noop_when_authenticated() {
        let client = create_client(Some(Authentication::token("T")));
        assert!(client.authenticate(true).await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_anonymous_without_login() {
        let client = create_client(None);
        assert!(!client.authenticate(true).await.unwrap());
        assert_eq!(client.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
