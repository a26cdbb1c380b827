//! Per-client cache of resource handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::clients::HttpClient;
use crate::rest::Resource;

/// Maps lower-cased resource names to cached [`Resource`] handles.
///
/// Lookups are case-insensitive: `"Users"` and `"users"` return the same
/// `Arc`. A handle is created on first lookup and lives as long as the
/// registry.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: Mutex<HashMap<String, Arc<Resource>>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `name`, creating it on first use.
    pub fn get_or_create(&self, name: &str, http: &Arc<HttpClient>) -> Arc<Resource> {
        let key = name.to_lowercase();
        let mut resources = self
            .resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(resources.entry(key).or_insert_with_key(|key| {
            tracing::debug!("Registering resource {}", key);
            Arc::new(Resource::new(key.clone(), Arc::clone(http)))
        }))
    }

    /// Returns the names of every registered resource, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let resources = self
            .resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no resource has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
