//! Resources, queries and records for a Dynamic REST API.
//!
//! This module provides the layer above the HTTP client:
//!
//! - **[`Resource`]**: a named collection bound to a client
//! - **[`QueryBuilder`]**: immutable, chainable filters, field selection and
//!   ordering over one resource
//! - **[`ResultSet`]**: a lazy, restartable, paged listing
//! - **[`Record`]**: one object with dirty tracking, `save`, `reload` and
//!   `delete`
//! - **[`ResourceError`]**: errors for these operations
//!
//! # Example
//!
//! ```rust,ignore
//! use drest::{ClientConfig, DrestClient, Host};
//! use drest::auth::Authentication;
//!
//! let client = DrestClient::new(
//!     ClientConfig::builder()
//!         .host(Host::new("my.api.io").unwrap())
//!         .authentication(Authentication::token("secret"))
//!         .build()?,
//! )?;
//!
//! let users = client.resource("users");
//!
//! // Single record
//! let user = users.get("123").await?;
//!
//! // Auto-paging listing with filters and a sparse fieldset
//! let johns = users
//!     .filter([("name__icontains", "john")])
//!     .excluding(["birthday"])
//!     .including(["events.*"])
//!     .all();
//! let mut cursor = johns.iter();
//! while let Some(user) = cursor.next().await {
//!     println!("{:?}", user?.get("name"));
//! }
//!
//! // Records keyed by a field
//! let by_name = users.map("name").await?;
//!
//! // Updates send only what changed
//! let mut user = users.first().await?.expect("at least one user");
//! user.set("name", "john");
//! user.save().await?;
//!
//! // Creation
//! let user = users.create([("name", "john")]).await?;
//! ```

mod errors;
mod path;
mod query;
mod record;
mod resource;
mod response;
mod result_set;
mod tracking;

pub use errors::ResourceError;
pub use path::{detail_path, id_to_string, list_path, resource_path, ResourceOperation};
pub use query::{FieldSelection, QueryBuilder, QuerySpec};
pub use record::{Record, ID_FIELD};
pub use resource::Resource;
pub use response::{single_record, singular, NextPage, Page, META_KEY};
pub use result_set::{PageCursor, RecordCursor, ResultSet};
pub use tracking::TrackedAttributes;
