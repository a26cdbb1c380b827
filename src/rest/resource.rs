//! Resource handles.
//!
//! A [`Resource`] is a named collection on the API bound to a client. It is
//! a factory for [`QueryBuilder`]s and forwards every chain and terminal
//! operation to a fresh, unfiltered query.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpClient;
use crate::rest::{QueryBuilder, Record, ResourceError, ResultSet};

/// A handle to one resource of the API.
///
/// Obtained from [`DrestClient::resource`](crate::DrestClient::resource);
/// the client caches one handle per lower-cased name.
///
/// # Example
///
/// ```rust,ignore
/// let users = client.resource("users");
///
/// let john = users.get(123).await?;
/// let active = users.filter([("is_active", true)]).order_by(["-date_joined"]).all();
/// let by_name = users.map("name").await?;
/// let jane = users.create([("name", "jane")]).await?;
/// ```
#[derive(Debug)]
pub struct Resource {
    name: String,
    http: Arc<HttpClient>,
}

impl Resource {
    pub(crate) fn new(name: impl Into<String>, http: Arc<HttpClient>) -> Self {
        Self {
            name: name.into(),
            http,
        }
    }

    /// Returns the lower-cased resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an unfiltered query.
    #[must_use]
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.name.clone(), Arc::clone(&self.http))
    }

    /// See [`QueryBuilder::filter`].
    #[must_use]
    pub fn filter<I, K, V>(&self, lookups: I) -> QueryBuilder
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.query().filter(lookups)
    }

    /// See [`QueryBuilder::exclude`].
    #[must_use]
    pub fn exclude<I, K, V>(&self, lookups: I) -> QueryBuilder
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.query().exclude(lookups)
    }

    /// See [`QueryBuilder::including`].
    #[must_use]
    pub fn including<I, S>(&self, fields: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query().including(fields)
    }

    /// See [`QueryBuilder::excluding`].
    #[must_use]
    pub fn excluding<I, S>(&self, fields: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query().excluding(fields)
    }

    /// See [`QueryBuilder::order_by`].
    #[must_use]
    pub fn order_by<I, S>(&self, fields: I) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query().order_by(fields)
    }

    /// Fetches one record by primary key.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::get`].
    pub async fn get(&self, id: impl Into<Value>) -> Result<Record, ResourceError> {
        self.query().get(id).await
    }

    /// Returns a lazy result set over every record.
    #[must_use]
    pub fn all(&self) -> ResultSet {
        self.query().all()
    }

    /// Returns the first record, if any.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::first`].
    pub async fn first(&self) -> Result<Option<Record>, ResourceError> {
        self.query().first().await
    }

    /// Materializes every record keyed by `key_field`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::map`].
    pub async fn map(&self, key_field: &str) -> Result<HashMap<String, Record>, ResourceError> {
        self.query().map(key_field).await
    }

    /// Creates a record on the server.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::create`].
    pub async fn create<I, K, V>(&self, fields: I) -> Result<Record, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.query().create(fields).await
    }

    /// Builds an unsaved record; call [`Record::save`] to create it.
    #[must_use]
    pub fn new_record(&self, attributes: Map<String, Value>) -> Record {
        self.query().new_record(attributes)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
