//! HTTP client types for Dynamic REST API communication.
//!
//! This module provides the request layer: URL construction, default and
//! credential headers, login, and the mapping of status codes to errors.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`DrestClient`]: The entry point, owning an [`HttpClient`] and a [`ResourceRegistry`]
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A raw response captured from the transport
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`HttpError`]: Error kinds produced by the status mapping
//!
//! # Example
//!
//! ```rust,ignore
//! use drest::{ClientConfig, Host};
//! use drest::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = ClientConfig::builder()
//!     .host(Host::new("my.api.io").unwrap())
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/users/")
//!     .query_param("filter{name.icontains}", "john")
//!     .build()?;
//!
//! let body = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! There is none. Each request is a single exchange; transient failures are
//! reported to the caller.

pub mod drest;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use drest::{DrestClient, ResourceRegistry};
pub use errors::{HttpError, InvalidHttpRequestError, UNKNOWN_ERROR};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
