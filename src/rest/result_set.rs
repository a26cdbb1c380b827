//! Lazy, paged listings.
//!
//! A [`ResultSet`] describes a listing; it holds no records. Each call to
//! [`ResultSet::iter`] starts a new traversal from the first page, and pages
//! are requested one at a time as the previous page runs out.
//!
//! # Example
//!
//! ```rust,ignore
//! let users = client.resource("users").filter([("is_active", true)]).all();
//!
//! let mut cursor = users.iter();
//! while let Some(user) = cursor.next().await {
//!     let user = user?;
//!     println!("{:?}", user.get("name"));
//! }
//!
//! // A second traversal re-issues every request.
//! let everyone = users.collect().await?;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::HttpClient;
use crate::rest::path::list_path;
use crate::rest::response::{NextPage, Page};
use crate::rest::{Record, ResourceError};

/// A lazy, finite, restartable sequence of records.
#[derive(Debug, Clone)]
pub struct ResultSet {
    resource: String,
    http: Arc<HttpClient>,
    query: Vec<(String, String)>,
    fields_query: Vec<(String, String)>,
}

impl ResultSet {
    pub(crate) const fn new(
        resource: String,
        http: Arc<HttpClient>,
        query: Vec<(String, String)>,
        fields_query: Vec<(String, String)>,
    ) -> Self {
        Self {
            resource,
            http,
            query,
            fields_query,
        }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the query parameters sent with every page request.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Starts a new traversal over the records.
    #[must_use]
    #[allow(clippy::iter_not_returning_iterator)]
    pub fn iter(&self) -> RecordCursor {
        RecordCursor {
            pages: self.pages(),
            buffer: VecDeque::new(),
            fields_query: self.fields_query.clone(),
        }
    }

    /// Starts a new traversal over the raw pages.
    #[must_use]
    pub fn pages(&self) -> PageCursor {
        PageCursor {
            resource: self.resource.clone(),
            http: Arc::clone(&self.http),
            query: self.query.clone(),
            state: PageState::Start,
        }
    }

    /// Materializes every record.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while paging.
    pub async fn collect(&self) -> Result<Vec<Record>, ResourceError> {
        let mut records = Vec::new();
        let mut cursor = self.iter();
        while let Some(record) = cursor.next().await {
            records.push(record?);
        }
        Ok(records)
    }

    /// Returns the first record, requesting only the first page.
    ///
    /// # Errors
    ///
    /// Returns any request or envelope error from the first page.
    pub async fn first(&self) -> Result<Option<Record>, ResourceError> {
        self.iter().next().await.transpose()
    }
}

#[derive(Debug, Clone)]
enum PageState {
    Start,
    Next(NextPage),
    Done,
}

/// A single traversal over the pages of a [`ResultSet`].
#[derive(Debug)]
pub struct PageCursor {
    resource: String,
    http: Arc<HttpClient>,
    query: Vec<(String, String)>,
    state: PageState,
}

impl PageCursor {
    /// Requests the next page, or returns `None` once the listing is
    /// exhausted.
    ///
    /// After an error the cursor is exhausted.
    pub async fn next(&mut self) -> Option<Result<Page, ResourceError>> {
        let requested = match std::mem::replace(&mut self.state, PageState::Done) {
            PageState::Done => return None,
            PageState::Start => None,
            PageState::Next(next) => Some(next),
        };

        let mut query = self.query.clone();
        if let Some(next) = &requested {
            let (key, value) = next.query_param();
            query.retain(|(k, _)| *k != key);
            query.push((key, value));
        }

        tracing::debug!(
            "Fetching {} page {:?}",
            self.resource,
            requested.as_ref().map_or_else(|| "first".to_string(), |n| n.query_param().1)
        );

        let result = match self.http.get(&list_path(&self.resource), query).await {
            Ok(body) => Page::from_body(&self.resource, &body),
            Err(e) => Err(e.into()),
        };

        if let Ok(page) = &result {
            match &page.next {
                Some(next) if requested.as_ref() == Some(next) => {
                    tracing::warn!(
                        "Server returned the same {} page twice, stopping",
                        self.resource
                    );
                }
                Some(next) => self.state = PageState::Next(next.clone()),
                None => {}
            }
        }
        Some(result)
    }
}

/// A single traversal over the records of a [`ResultSet`].
#[derive(Debug)]
pub struct RecordCursor {
    pages: PageCursor,
    buffer: VecDeque<Map<String, Value>>,
    fields_query: Vec<(String, String)>,
}

impl RecordCursor {
    /// Returns the next record, requesting the next page only when the
    /// current one is used up.
    ///
    /// After an error the cursor is exhausted.
    pub async fn next(&mut self) -> Option<Result<Record, ResourceError>> {
        loop {
            if let Some(attributes) = self.buffer.pop_front() {
                let mut record = Record::from_existing(
                    &self.pages.resource,
                    Arc::clone(&self.pages.http),
                    attributes,
                );
                record.set_fields_query(self.fields_query.clone());
                return Some(Ok(record));
            }

            match self.pages.next().await? {
                Ok(page) => self.buffer.extend(page.items),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
