//! Chainable, immutable queries against a resource.
//!
//! A [`QueryBuilder`] carries a [`QuerySpec`] and a handle to the client.
//! Chain calls never modify the receiver; each returns a new builder, so a
//! partially built query can be branched freely:
//!
//! ```rust,ignore
//! let users = client.resource("users");
//! let active = users.filter([("is_active", true)]);
//! let johns = active.filter([("name__icontains", "john")]);
//! let admins = active.filter([("groups__name", "admin")]);
//! // `active` still has exactly one filter.
//! ```
//!
//! # Query Encoding
//!
//! | Call                          | Query parameters                      |
//! |-------------------------------|---------------------------------------|
//! | `filter([("a__b", v)])`       | `filter{a.b}=v`                       |
//! | `exclude([("a__b", v)])`      | `filter{-a.b}=v`                      |
//! | `including(["p"])`            | `exclude[]=*`, `include[]=p`          |
//! | `excluding(["p"])`            | `exclude[]=p`                         |
//! | `order_by(["-f"])`            | `sort[]=-f`                           |
//! | `per_page(n)`                 | `per_page=n`                          |
//!
//! Array values repeat the key; `null` values are omitted.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpClient;
use crate::rest::path::{detail_path, id_to_string};
use crate::rest::response::single_record;
use crate::rest::{Record, ResourceError, ResultSet};

/// Which fields the server should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    /// The server's default fieldset.
    #[default]
    All,
    /// Exactly these dotted paths; `rel.*` expands a relation fully.
    Only(BTreeSet<String>),
    /// The default fieldset minus these dotted paths.
    Except(BTreeSet<String>),
}

/// The immutable description of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    filters: BTreeMap<String, Value>,
    excludes: BTreeMap<String, Value>,
    fields: FieldSelection,
    ordering: Vec<String>,
    extras: Vec<(String, String)>,
    per_page: Option<u32>,
}

impl QuerySpec {
    /// Returns the filter lookups, AND-combined.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    /// Returns the exclusion lookups.
    #[must_use]
    pub const fn excludes(&self) -> &BTreeMap<String, Value> {
        &self.excludes
    }

    /// Returns the field selection.
    #[must_use]
    pub const fn fields(&self) -> &FieldSelection {
        &self.fields
    }

    /// Returns the ordering.
    #[must_use]
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Returns the requested page size, if set.
    #[must_use]
    pub const fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Encodes filters, field selection and extras.
    ///
    /// This is the part of the query that applies to a single-record fetch.
    #[must_use]
    pub fn to_detail_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        for (lookup, value) in &self.filters {
            push_value(&mut query, &filter_key(lookup, false), value);
        }
        for (lookup, value) in &self.excludes {
            push_value(&mut query, &filter_key(lookup, true), value);
        }
        query.extend(self.fields_query());
        query.extend(self.extras.iter().cloned());
        query
    }

    /// Encodes the full listing query.
    ///
    /// `default_per_page` is used when no page size was set on the query.
    #[must_use]
    pub fn to_query(&self, default_per_page: Option<u32>) -> Vec<(String, String)> {
        let mut query = self.to_detail_query();
        for field in &self.ordering {
            query.push(("sort[]".to_string(), field.clone()));
        }
        if let Some(per_page) = self.per_page.or(default_per_page) {
            query.push(("per_page".to_string(), per_page.to_string()));
        }
        query
    }

    /// Encodes only the field selection.
    #[must_use]
    pub fn fields_query(&self) -> Vec<(String, String)> {
        match &self.fields {
            FieldSelection::All => Vec::new(),
            FieldSelection::Only(paths) => std::iter::once(("exclude[]".to_string(), "*".to_string()))
                .chain(paths.iter().map(|p| ("include[]".to_string(), p.clone())))
                .collect(),
            FieldSelection::Except(paths) => paths
                .iter()
                .map(|p| ("exclude[]".to_string(), p.clone()))
                .collect(),
        }
    }
}

/// Converts a Django-style lookup into a Dynamic REST filter key.
fn filter_key(lookup: &str, negate: bool) -> String {
    let path = lookup.replace("__", ".");
    if negate {
        format!("filter{{-{path}}}")
    } else {
        format!("filter{{{path}}}")
    }
}

fn push_value(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(values) => {
            for value in values {
                push_value(query, key, value);
            }
        }
        Value::String(s) => query.push((key.to_string(), s.clone())),
        other => query.push((key.to_string(), other.to_string())),
    }
}

/// A chainable query against one resource.
///
/// Chain methods (`filter`, `exclude`, `including`, `excluding`, `order_by`,
/// `extra`, `per_page`) return a new builder. Terminal methods (`get`, `all`,
/// `first`, `map`, `create`) issue requests.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    resource: String,
    http: Arc<HttpClient>,
    spec: QuerySpec,
}

impl QueryBuilder {
    pub(crate) fn new(resource: impl Into<String>, http: Arc<HttpClient>) -> Self {
        Self {
            resource: resource.into(),
            http,
            spec: QuerySpec::default(),
        }
    }

    fn with_spec(&self, update: impl FnOnce(&mut QuerySpec)) -> Self {
        let mut spec = self.spec.clone();
        update(&mut spec);
        Self {
            resource: self.resource.clone(),
            http: Arc::clone(&self.http),
            spec,
        }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the query description.
    #[must_use]
    pub const fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Adds filter lookups; repeated lookups overwrite earlier values.
    #[must_use]
    pub fn filter<I, K, V>(&self, lookups: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let lookups: Vec<(String, Value)> = collect_lookups(lookups);
        self.with_spec(|spec| spec.filters.extend(lookups))
    }

    /// Adds exclusion lookups.
    #[must_use]
    pub fn exclude<I, K, V>(&self, lookups: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let lookups: Vec<(String, Value)> = collect_lookups(lookups);
        self.with_spec(|spec| spec.excludes.extend(lookups))
    }

    /// Selects exactly these fields, replacing any prior selection.
    #[must_use]
    pub fn including<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.with_spec(|spec| spec.fields = FieldSelection::Only(fields))
    }

    /// Drops these fields from the default fieldset, replacing any prior
    /// selection.
    #[must_use]
    pub fn excluding<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.with_spec(|spec| spec.fields = FieldSelection::Except(fields))
    }

    /// Sets the ordering; `-` prefixes a descending field.
    #[must_use]
    pub fn order_by<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ordering = fields.into_iter().map(Into::into).collect();
        self.with_spec(|spec| spec.ordering = ordering)
    }

    /// Appends raw query parameters.
    #[must_use]
    pub fn extra<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_spec(|spec| spec.extras.extend(params))
    }

    /// Sets the page size requested by listings.
    #[must_use]
    pub fn per_page(&self, per_page: u32) -> Self {
        self.with_spec(|spec| spec.per_page = Some(per_page))
    }

    /// Fetches one record by primary key.
    ///
    /// Filters and field selection apply; ordering and paging do not.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::DoesNotExist`](crate::clients::HttpError::DoesNotExist)
    /// (wrapped) on 404, any other request error unchanged, or
    /// [`ResourceError::UnexpectedResponse`] if the body has no record.
    pub async fn get(&self, id: impl Into<Value>) -> Result<Record, ResourceError> {
        let id = id_to_string(&id.into());
        let path = detail_path(&self.resource, &id);
        let body = self.http.get(&path, self.spec.to_detail_query()).await?;
        let attributes = single_record(&self.resource, &body)?;
        Ok(self.record(attributes))
    }

    /// Returns a lazy result set over every matching record.
    #[must_use]
    pub fn all(&self) -> ResultSet {
        ResultSet::new(
            self.resource.clone(),
            Arc::clone(&self.http),
            self.spec.to_query(self.http.page_size()),
            self.spec.fields_query(),
        )
    }

    /// Returns the first matching record, reading only the first page.
    ///
    /// # Errors
    ///
    /// Returns any request or envelope error from the first page.
    pub async fn first(&self) -> Result<Option<Record>, ResourceError> {
        self.all().first().await
    }

    /// Materializes every matching record, keyed by `key_field`.
    ///
    /// When two records share a key the later one wins. Records without
    /// `key_field` are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while paging.
    pub async fn map(&self, key_field: &str) -> Result<HashMap<String, Record>, ResourceError> {
        let mut result = HashMap::new();
        let mut cursor = self.all().iter();
        while let Some(record) = cursor.next().await {
            let record = record?;
            let key = record
                .get(key_field)
                .filter(|v| !v.is_null())
                .map(id_to_string);
            match key {
                Some(key) => {
                    result.insert(key, record);
                }
                None => {
                    tracing::debug!(
                        "Skipping {} record without \"{}\" while mapping",
                        self.resource,
                        key_field
                    );
                }
            }
        }
        Ok(result)
    }

    /// Creates a record on the server and returns it with its identity.
    ///
    /// # Errors
    ///
    /// Returns any request error unchanged, or
    /// [`ResourceError::UnexpectedResponse`] if the response carries no id.
    pub async fn create<I, K, V>(&self, fields: I) -> Result<Record, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes: Map<String, Value> = collect_lookups(fields).into_iter().collect();
        let mut record = Record::new(&self.resource, Arc::clone(&self.http), attributes);
        record.set_fields_query(self.spec.fields_query());
        record.save().await?;
        Ok(record)
    }

    /// Builds an unsaved record bound to this resource.
    #[must_use]
    pub fn new_record(&self, attributes: Map<String, Value>) -> Record {
        Record::new(&self.resource, Arc::clone(&self.http), attributes)
    }

    fn record(&self, attributes: Map<String, Value>) -> Record {
        let mut record = Record::from_existing(&self.resource, Arc::clone(&self.http), attributes);
        record.set_fields_query(self.spec.fields_query());
        record
    }
}

fn collect_lookups<I, K, V>(lookups: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    lookups
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
