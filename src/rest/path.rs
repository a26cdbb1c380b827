//! Path building for Dynamic REST resources.
//!
//! Every resource exposes two URL shapes:
//! - a collection path `/{name}/`, used to list and create
//! - a detail path `/{name}/{id}/`, used to fetch, update and delete
//!
//! Both are relative to the client's version prefix.
//!
//! # Example
//!
//! ```rust
//! use drest::rest::{ResourceOperation, resource_path};
//!
//! assert_eq!(resource_path("users", ResourceOperation::All, None), Some("/users/".to_string()));
//! assert_eq!(
//!     resource_path("users", ResourceOperation::Find, Some("42")),
//!     Some("/users/42/".to_string())
//! );
//! assert_eq!(resource_path("users", ResourceOperation::Delete, None), None);
//! ```

use crate::clients::HttpMethod;

/// Operations that can be performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch a single record by id (GET `/{name}/{id}/`).
    Find,
    /// List records (GET `/{name}/`).
    All,
    /// Create a record (POST `/{name}/`).
    Create,
    /// Partially update a record (PATCH `/{name}/{id}/`).
    Update,
    /// Delete a record (DELETE `/{name}/{id}/`).
    Delete,
}

impl ResourceOperation {
    /// Returns the HTTP method for this operation.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        match self {
            Self::Find | Self::All => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Patch,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::All => "all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` if the operation addresses a single record by id.
    #[must_use]
    pub const fn requires_id(&self) -> bool {
        matches!(self, Self::Find | Self::Update | Self::Delete)
    }
}

/// Returns the collection path for a resource.
#[must_use]
pub fn list_path(name: &str) -> String {
    format!("/{name}/")
}

/// Returns the detail path for a record, percent-encoding the id.
#[must_use]
pub fn detail_path(name: &str, id: &str) -> String {
    format!("/{name}/{}/", urlencoding::encode(id))
}

/// Resolves the path for `operation`.
///
/// Returns `None` when an id is required but missing. An id passed to a
/// collection operation is ignored.
#[must_use]
pub fn resource_path(name: &str, operation: ResourceOperation, id: Option<&str>) -> Option<String> {
    if operation.requires_id() {
        id.map(|id| detail_path(name, id))
    } else {
        Some(list_path(name))
    }
}

/// Renders a JSON identity as a path segment.
///
/// Strings are used verbatim, other scalars through their JSON form.
#[must_use]
pub fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
