//! Materialized resource instances.
//!
//! A [`Record`] is one object returned by the API, bound to its resource and
//! client. Field assignment is tracked so that [`Record::save`] sends only
//! what changed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut user = client.resource("users").get(123).await?;
//! user.set("name", "john");
//! user.save().await?; // PATCH /users/123/ {"name": "john"}
//!
//! let mut fresh = client.resource("users").new_record(serde_json::Map::new());
//! fresh.set("name", "jane");
//! fresh.save().await?; // POST /users/ {"name": "jane"}
//! assert!(fresh.id().is_some());
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpClient;
use crate::rest::path::{id_to_string, resource_path, ResourceOperation};
use crate::rest::response::single_record;
use crate::rest::{ResourceError, TrackedAttributes};

/// Name of the primary key attribute.
pub const ID_FIELD: &str = "id";

/// One materialized resource instance.
///
/// The library keeps no reference to a record once it has been returned;
/// two records for the same id are independent copies.
#[derive(Debug, Clone)]
pub struct Record {
    resource: String,
    http: Arc<HttpClient>,
    id: Option<Value>,
    attributes: TrackedAttributes,
    /// Field selection used when re-fetching.
    fields_query: Vec<(String, String)>,
}

// Verify Record is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Record>();
};

impl Record {
    /// Creates an unsaved record. Every attribute is dirty.
    pub(crate) fn new(resource: &str, http: Arc<HttpClient>, attributes: Map<String, Value>) -> Self {
        Self {
            resource: resource.to_string(),
            http,
            id: identity_of(&attributes),
            attributes: TrackedAttributes::new(attributes),
            fields_query: Vec::new(),
        }
    }

    /// Creates a record from a server representation.
    pub(crate) fn from_existing(
        resource: &str,
        http: Arc<HttpClient>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            resource: resource.to_string(),
            http,
            id: identity_of(&attributes),
            attributes: TrackedAttributes::from_existing(attributes),
            fields_query: Vec::new(),
        }
    }

    pub(crate) fn set_fields_query(&mut self, fields_query: Vec<(String, String)>) {
        self.fields_query = fields_query;
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource
    }

    /// Returns the primary key, or `None` if the record was never saved.
    #[must_use]
    pub const fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// Returns `true` if the record has no identity yet.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Assigns `field` and marks it dirty.
    ///
    /// Assigning `id` also changes the identity that `save`, `reload` and
    /// `delete` address; a `null` id makes the record new again.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        if field == ID_FIELD {
            self.id = Some(value.clone()).filter(|id| !id.is_null());
        }
        self.attributes.set(field, value);
    }

    /// Returns all attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        self.attributes.attributes()
    }

    /// Returns `true` if any field was assigned since load or the last save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.attributes.is_dirty()
    }

    /// Returns the names of the fields assigned since load or the last save.
    #[must_use]
    pub const fn dirty_fields(&self) -> &BTreeSet<String> {
        self.attributes.dirty_fields()
    }

    /// Consumes the record and returns its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes.into_inner()
    }

    /// Persists the record.
    ///
    /// - With an identity: PATCHes only the dirty fields. Nothing is sent
    ///   when no field is dirty.
    /// - Without an identity: POSTs every attribute and takes the identity
    ///   from the response.
    ///
    /// Server-returned attributes are merged in and the dirty set is cleared.
    /// On error the record is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns request errors unchanged, or
    /// [`ResourceError::UnexpectedResponse`] if a create response carries no
    /// id.
    pub async fn save(&mut self) -> Result<(), ResourceError> {
        let Some(id) = self.id.as_ref().map(id_to_string) else {
            return self.create().await;
        };

        if !self.attributes.is_dirty() {
            tracing::debug!("Nothing to save for {} {}", self.resource, id);
            return Ok(());
        }

        let path = self.path(ResourceOperation::Update, Some(&id))?;
        let body = self
            .http
            .patch(&path, self.attributes.changed_fields())
            .await?;

        match single_record(&self.resource, &body) {
            Ok(attributes) => self.attributes.merge_clean(attributes),
            Err(_) => self.attributes.mark_clean(),
        }
        Ok(())
    }

    async fn create(&mut self) -> Result<(), ResourceError> {
        let path = self.path(ResourceOperation::Create, None)?;
        let body = self
            .http
            .post(&path, Value::Object(self.attributes.attributes().clone()))
            .await?;

        let attributes = single_record(&self.resource, &body)?;
        let id = identity_of(&attributes).ok_or_else(|| {
            ResourceError::unexpected(&self.resource, "created record has no id")
        })?;

        self.id = Some(id);
        self.attributes.merge_clean(attributes);
        Ok(())
    }

    /// Re-fetches the record, discarding unsaved assignments.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] for an unsaved record, or
    /// any request or envelope error.
    pub async fn reload(&mut self) -> Result<(), ResourceError> {
        let id = self.require_id(ResourceOperation::Find)?;
        let path = self.path(ResourceOperation::Find, Some(&id))?;
        let body = self.http.get(&path, self.fields_query.clone()).await?;

        let attributes = single_record(&self.resource, &body)?;
        self.id = identity_of(&attributes).or_else(|| self.id.take());
        self.attributes.replace_clean(attributes);
        Ok(())
    }

    /// Deletes the record on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingIdentity`] for an unsaved record, or
    /// any request error.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        let id = self.require_id(ResourceOperation::Delete)?;
        let path = self.path(ResourceOperation::Delete, Some(&id))?;
        self.http.delete(&path).await?;
        Ok(())
    }

    fn require_id(&self, operation: ResourceOperation) -> Result<String, ResourceError> {
        self.id
            .as_ref()
            .map(id_to_string)
            .ok_or_else(|| ResourceError::MissingIdentity {
                resource: self.resource.clone(),
                operation: operation.as_str(),
            })
    }

    fn path(&self, operation: ResourceOperation, id: Option<&str>) -> Result<String, ResourceError> {
        resource_path(&self.resource, operation, id).ok_or_else(|| {
            ResourceError::MissingIdentity {
                resource: self.resource.clone(),
                operation: operation.as_str(),
            }
        })
    }
}

fn identity_of(attributes: &Map<String, Value>) -> Option<Value> {
    attributes.get(ID_FIELD).filter(|id| !id.is_null()).cloned()
}
