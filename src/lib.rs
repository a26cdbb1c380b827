//! # Dynamic REST Client
//!
//! A Rust client for REST APIs that follow the Dynamic REST conventions:
//! resource-oriented endpoints, token or session authentication, sparse
//! fieldsets, filter and sort query parameters, and paged listings.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Token, session id and login/password authentication via [`auth`]
//! - An async HTTP client with a fixed status-to-error mapping
//! - Resource lookup by name through [`DrestClient::resource`]
//! - Immutable, chainable queries ([`rest::QueryBuilder`])
//! - Lazy, restartable, auto-paging listings ([`rest::ResultSet`])
//! - Records with dirty tracking and partial updates ([`rest::Record`])
//!
//! ## Quick Start
//!
//! ```rust
//! use drest::{ApiVersion, ClientConfig, DrestClient, Host};
//! use drest::auth::Authentication;
//!
//! let config = ClientConfig::builder()
//!     .host(Host::new("my.api.io").unwrap())
//!     .version(ApiVersion::new("v1").unwrap())
//!     .authentication(Authentication::token("secret"))
//!     .build()
//!     .unwrap();
//!
//! let client = DrestClient::new(config).unwrap();
//! let users = client.resource("users");
//! ```
//!
//! ## Querying
//!
//! ```rust,ignore
//! let users = client.resource("users");
//!
//! // GET /v1/users/123/
//! let user = users.get(123).await?;
//!
//! // GET /v1/users/?filter{name.icontains}=john&exclude[]=birthday&sort[]=-name
//! let mut cursor = users
//!     .filter([("name__icontains", "john")])
//!     .excluding(["birthday"])
//!     .order_by(["-name"])
//!     .all()
//!     .iter();
//! while let Some(user) = cursor.next().await {
//!     println!("{:?}", user?.get("name"));
//! }
//!
//! // Records keyed by a field; later duplicates win
//! let users_by_name = users.map("name").await?;
//! ```
//!
//! ## Saving
//!
//! ```rust,ignore
//! let mut user = users.first().await?.expect("a user");
//! user.set("name", "john");
//! user.save().await?; // PATCH {"name": "john"}
//!
//! let created = users.create([("name", "jane")]).await?; // POST
//! assert!(created.id().is_some());
//! ```
//!
//! ## Authentication
//!
//! A token is sent as `Authorization: <token>`; a session id as
//! `Cookie: sessionid=<value>`. With [`auth::Authentication::login`] the
//! client logs in on its first request and installs the session cookie it
//! receives. A client configured with no credentials is anonymous.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **No hidden concurrency**: Requests are issued one at a time and pages
//!   are fetched only when needed

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::{AuthState, AuthStatus, Authentication};
pub use config::{
    ApiVersion, AuthToken, ClientConfig, ClientConfigBuilder, Host, Password, Scheme, SessionId,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    DrestClient, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, ResourceRegistry,
};

// Re-export resource types
pub use rest::{
    FieldSelection, NextPage, Page, QueryBuilder, QuerySpec, Record, Resource, ResourceError,
    ResultSet,
};
