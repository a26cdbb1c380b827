//! Envelope parsing for Dynamic REST responses.
//!
//! Dynamic REST wraps every payload in an envelope keyed by resource name:
//!
//! ```json
//! {"users": [{"id": 1}, {"id": 2}], "meta": {"page": 1, "total_pages": 3}}
//! {"user": {"id": 1, "name": "john"}}
//! ```
//!
//! This module extracts items from list envelopes into a [`Page`] (with the
//! cursor of the following page) and single records from detail envelopes.
//!
//! # Pagination
//!
//! The next page is determined, in order, by:
//! 1. `meta.page < meta.total_pages` → page number `meta.page + 1`
//! 2. a `next` string in `meta` or at the top level, whose `cursor` or `page`
//!    query parameter (or the raw string when it is not a link) identifies
//!    the next page
//! 3. otherwise the listing is exhausted

use serde_json::{Map, Value};

use crate::rest::ResourceError;

/// Key of the metadata object in list envelopes.
pub const META_KEY: &str = "meta";

/// Identifies the page following the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// A page number, sent as `page=N`.
    Number(u64),
    /// An opaque cursor, sent as `cursor=C`.
    Cursor(String),
}

impl NextPage {
    /// Returns the query parameter requesting this page.
    #[must_use]
    pub fn query_param(&self) -> (String, String) {
        match self {
            Self::Number(n) => ("page".to_string(), n.to_string()),
            Self::Cursor(c) => ("cursor".to_string(), c.clone()),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Raw record objects, in server order.
    pub items: Vec<Map<String, Value>>,
    /// The page after this one, or `None` if this is the last.
    pub next: Option<NextPage>,
    /// `meta.total_results`, if the server reported it.
    pub total_results: Option<u64>,
}

impl Page {
    /// Parses a list envelope for `resource`.
    ///
    /// Items are read from the key named after the resource, falling back to
    /// the first array-valued key other than `meta`. A bare JSON array is
    /// accepted as a single, final page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedResponse`] if no item array is
    /// found or an item is not a JSON object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drest::rest::{NextPage, Page};
    /// use serde_json::json;
    ///
    /// let body = json!({
    ///     "users": [{"id": 1}, {"id": 2}],
    ///     "meta": {"page": 1, "per_page": 2, "total_pages": 2, "total_results": 3}
    /// });
    /// let page = Page::from_body("users", &body).unwrap();
    /// assert_eq!(page.items.len(), 2);
    /// assert_eq!(page.next, Some(NextPage::Number(2)));
    /// assert_eq!(page.total_results, Some(3));
    /// ```
    pub fn from_body(resource: &str, body: &Value) -> Result<Self, ResourceError> {
        let (items, envelope) = match body {
            Value::Array(items) => (items, None),
            Value::Object(envelope) => {
                let items = envelope
                    .get(resource)
                    .and_then(Value::as_array)
                    .or_else(|| {
                        envelope
                            .iter()
                            .filter(|(key, _)| key.as_str() != META_KEY)
                            .find_map(|(_, value)| value.as_array())
                    })
                    .ok_or_else(|| {
                        ResourceError::unexpected(
                            resource,
                            format!("missing \"{resource}\" list in response"),
                        )
                    })?;
                (items, Some(envelope))
            }
            _ => {
                return Err(ResourceError::unexpected(
                    resource,
                    "list response is not a JSON object",
                ))
            }
        };

        let items = items
            .iter()
            .map(|item| {
                item.as_object().cloned().ok_or_else(|| {
                    ResourceError::unexpected(resource, "list item is not a JSON object")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let meta = envelope.and_then(|e| e.get(META_KEY));
        let next = envelope.and_then(|e| next_page(meta, e));
        let total_results = meta
            .and_then(|m| m.get("total_results"))
            .and_then(Value::as_u64);

        Ok(Self {
            items,
            next,
            total_results,
        })
    }

    /// Returns `true` if this is the last page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Extracts a single record from a detail envelope for `resource`.
///
/// The record is read from the singular key (`users` → `user`). Otherwise a
/// flat object carrying an `id` is the record itself, and an envelope without
/// an `id` falls back to its only object-valued key other than `meta`.
///
/// # Errors
///
/// Returns [`ResourceError::UnexpectedResponse`] if no record is found.
///
/// # Example
///
/// ```rust
/// use drest::rest::single_record;
/// use serde_json::json;
///
/// let body = json!({"user": {"id": 1, "name": "john"}});
/// let record = single_record("users", &body).unwrap();
/// assert_eq!(record["name"], json!("john"));
/// ```
pub fn single_record(resource: &str, body: &Value) -> Result<Map<String, Value>, ResourceError> {
    let envelope = body.as_object().ok_or_else(|| {
        ResourceError::unexpected(resource, "record response is not a JSON object")
    })?;

    if let Some(record) = envelope.get(singular(resource)).and_then(Value::as_object) {
        return Ok(record.clone());
    }

    if envelope.contains_key("id") {
        return Ok(envelope.clone());
    }

    let mut objects = envelope
        .iter()
        .filter(|(key, _)| key.as_str() != META_KEY)
        .filter_map(|(_, value)| value.as_object());
    if let (Some(record), None) = (objects.next(), objects.next()) {
        return Ok(record.clone());
    }

    Err(ResourceError::unexpected(
        resource,
        format!("missing \"{}\" record in response", singular(resource)),
    ))
}

/// Returns the singular envelope key for a resource name.
#[must_use]
pub fn singular(resource: &str) -> &str {
    resource.strip_suffix('s').unwrap_or(resource)
}

fn next_page(meta: Option<&Value>, envelope: &Map<String, Value>) -> Option<NextPage> {
    if let Some(meta) = meta {
        let page = meta.get("page").and_then(Value::as_u64);
        let total_pages = meta.get("total_pages").and_then(Value::as_u64);
        if let (Some(page), Some(total_pages)) = (page, total_pages) {
            return (page < total_pages).then_some(NextPage::Number(page + 1));
        }
    }

    let link = meta
        .and_then(|m| m.get("next"))
        .or_else(|| envelope.get("next"))
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())?;

    parse_next_link(link)
}

/// Interprets a `next` link or token.
fn parse_next_link(link: &str) -> Option<NextPage> {
    let Some(query_start) = link.find('?') else {
        if link.contains("://") || link.starts_with('/') {
            tracing::debug!("Ignoring next link without page parameters: {}", link);
            return None;
        }
        return Some(NextPage::Cursor(link.to_string()));
    };

    let query = &link[query_start + 1..];
    let mut page = None;
    for param in query.split('&') {
        let mut parts = param.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            let value = urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned());
            match key {
                "cursor" => return Some(NextPage::Cursor(value)),
                "page" => page = value.parse().ok().map(NextPage::Number),
                _ => {}
            }
        }
    }
    page
}
