//! Integration tests for the client: authentication, URL construction and
//! status-code mapping against a mock server.

use drest::auth::Authentication;
use drest::clients::{HttpError, HttpMethod, HttpRequest};
use drest::{ApiVersion, AuthStatus, ClientConfig, DrestClient, Host, Scheme};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at the mock server.
fn create_client(
    server: &MockServer,
    version: Option<&str>,
    authentication: Option<Authentication>,
) -> DrestClient {
    let host = server.address().to_string();
    let mut builder = ClientConfig::builder()
        .host(Host::new(host).unwrap())
        .scheme(Scheme::Http);
    if let Some(version) = version {
        builder = builder.version(ApiVersion::new(version).unwrap());
    }
    if let Some(authentication) = authentication {
        builder = builder.authentication(authentication);
    }
    DrestClient::new(builder.build().unwrap()).unwrap()
}

// ============================================================================
// Resource Registry
// ============================================================================

#[tokio::test]
async fn test_resource_lookup_returns_identical_handle_for_any_case() {
    let server = MockServer::start().await;
    let client = create_client(&server, None, None);

    let a = client.resource("Users");
    let b = client.resource("users");

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.name(), "users");
}

// ============================================================================
// Token and Session Authentication
// ============================================================================

#[tokio::test]
async fn test_token_client_sends_authorization_without_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .and(header("Authorization", "T"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "name": "john"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::token("T")));
    assert_eq!(client.status(), AuthStatus::Authenticated);

    let user = assert_ok!(client.resource("users").get(1).await);
    assert_eq!(user.get("name"), Some(&json!("john")));
}

#[tokio::test]
async fn test_session_id_client_sends_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .and(header("Cookie", "sessionid=S"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::token("T")));
    client.use_session_id("S");

    assert_ok!(client.resource("users").get(1).await);
    assert!(client
        .http_client()
        .default_headers()
        .get("Authorization")
        .is_none());
}

#[tokio::test]
async fn test_anonymous_client_sends_requests_without_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"publics": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, None, None);
    let records = assert_ok!(client.resource("public").all().collect().await);

    assert!(records.is_empty());
    assert_eq!(client.status(), AuthStatus::Unauthenticated);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_installs_session_cookie_and_skips_version_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .and(body_string_contains("login=john"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "sessionid=abc123; HttpOnly; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/users/1/"))
        .and(header("Cookie", "sessionid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_client(
        &server,
        Some("v1"),
        Some(Authentication::login("john", "s3cret")),
    );
    assert_eq!(client.status(), AuthStatus::Unauthenticated);

    let users = client.resource("users");
    assert_ok!(users.get(1).await);
    assert_eq!(client.status(), AuthStatus::Authenticated);

    // The session is reused; no second login.
    assert_ok!(users.get(1).await);
}

#[tokio::test]
async fn test_login_does_not_follow_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/dashboard/")
                .insert_header("Set-Cookie", "sessionid=xyz; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::login("john", "pw")));

    assert!(assert_ok!(client.authenticate(true).await));
    assert_eq!(
        client.http_client().default_headers().get("Cookie"),
        Some(&"sessionid=xyz".to_string())
    );
}

#[tokio::test]
async fn test_failed_login_raises_with_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid credentials"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::login("john", "bad")));
    let error = assert_err!(client.resource("users").get(1).await);

    assert!(error.is_authentication_failed());
    assert!(error.to_string().contains("Invalid credentials"));
    assert_eq!(client.status(), AuthStatus::Failed);
}

#[tokio::test]
async fn test_login_without_session_cookie_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::login("john", "pw")));
    let result = client.authenticate(true).await;

    assert!(matches!(
        result,
        Err(HttpError::AuthenticationFailed { message }) if message == "Unknown error"
    ));
    assert_eq!(client.status(), AuthStatus::Failed);
}

#[tokio::test]
async fn test_failed_login_without_raise_returns_false() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/login/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::login("john", "pw")));

    assert!(!assert_ok!(client.authenticate(false).await));
    assert_eq!(client.status(), AuthStatus::Failed);
}

#[tokio::test]
async fn test_custom_auth_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "sessionid=s"))
        .expect(1)
        .mount(&server)
        .await;

    let host = server.address().to_string();
    let config = ClientConfig::builder()
        .host(Host::new(host).unwrap())
        .scheme(Scheme::Http)
        .version(ApiVersion::new("v2").unwrap())
        .auth_endpoint("api/login/")
        .authentication(Authentication::login("john", "pw"))
        .build()
        .unwrap();
    let client = DrestClient::new(config).unwrap();

    assert!(assert_ok!(client.authenticate(true).await));
}

// ============================================================================
// Status Mapping
// ============================================================================

#[tokio::test]
async fn test_get_maps_404_to_does_not_exist() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/9/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = create_client(&server, None, None);
    let error = assert_err!(client.resource("users").get(9).await);

    assert!(error.is_does_not_exist());
}

#[tokio::test]
async fn test_get_maps_401_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"detail":"expired"}"#))
        .mount(&server)
        .await;

    let client = create_client(&server, None, Some(Authentication::token("old")));
    let error = assert_err!(client.resource("users").get(1).await);

    assert!(error.is_authentication_failed());
    assert!(error.to_string().contains("expired"));
}

#[tokio::test]
async fn test_get_maps_500_to_bad_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = create_client(&server, None, None);
    let error = assert_err!(client.resource("users").get(1).await);

    assert!(error.is_bad_request());
    assert_eq!(error.status(), Some(500));
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = create_client(&server, None, None);
    let error = assert_err!(client.resource("users").get(1).await);

    assert!(matches!(
        error,
        drest::ResourceError::Http(HttpError::InvalidJson { .. })
    ));
}

// ============================================================================
// Raw Requests and Version Prefix
// ============================================================================

#[tokio::test]
async fn test_raw_request_uses_version_prefix_and_decodes_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/users/1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, Some("/v3/"), None);
    let request = HttpRequest::builder(HttpMethod::Delete, "users/1/")
        .build()
        .unwrap();

    let body = assert_ok!(client.request(request).await);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_build_url_matches_server_address() {
    let server = MockServer::start().await;
    let client = create_client(&server, Some("v1"), None);

    assert_eq!(
        client.build_url("users", Some("v1")),
        format!("http://{}/v1/users", server.address())
    );
}
