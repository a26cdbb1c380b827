//! Dirty tracking for partial updates.
//!
//! This module provides [`TrackedAttributes`], the attribute map of a
//! record together with the set of fields assigned since the record was
//! loaded, created or last saved. Only those fields are sent in a PATCH.
//!
//! # Example
//!
//! ```rust
//! use drest::rest::TrackedAttributes;
//! use serde_json::json;
//!
//! let attributes = json!({"id": 1, "name": "john", "age": 30});
//! let mut tracked = TrackedAttributes::from_existing(attributes.as_object().unwrap().clone());
//! assert!(!tracked.is_dirty());
//!
//! tracked.set("name", json!("jane"));
//! assert!(tracked.is_dirty());
//!
//! let changes = tracked.changed_fields();
//! assert_eq!(changes, json!({"name": "jane"}));
//!
//! tracked.mark_clean();
//! assert!(!tracked.is_dirty());
//! ```

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Record attributes with per-field dirty tracking.
///
/// Assigning a field marks it dirty even if the value is unchanged; the
/// server decides whether the write is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedAttributes {
    attributes: Map<String, Value>,
    dirty: BTreeSet<String>,
}

impl TrackedAttributes {
    /// Creates tracked attributes for a record that does not exist yet.
    ///
    /// Every field starts dirty.
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        let dirty = attributes.keys().cloned().collect();
        Self { attributes, dirty }
    }

    /// Creates tracked attributes for a record loaded from the server.
    #[must_use]
    pub const fn from_existing(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            dirty: BTreeSet::new(),
        }
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Assigns `field` and marks it dirty.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        self.dirty.insert(field.clone());
        self.attributes.insert(field, value);
    }

    /// Returns all attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns `true` if any field was assigned since the last clean point.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Returns the names of the dirty fields, in sorted order.
    #[must_use]
    pub const fn dirty_fields(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    /// Returns a JSON object with only the dirty fields and their values.
    #[must_use]
    pub fn changed_fields(&self) -> Value {
        let changes: Map<String, Value> = self
            .dirty
            .iter()
            .filter_map(|field| {
                self.attributes
                    .get(field)
                    .map(|value| (field.clone(), value.clone()))
            })
            .collect();
        Value::Object(changes)
    }

    /// Clears the dirty set.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// Overlays `attributes` returned by the server and clears the dirty set.
    ///
    /// Fields absent from `attributes` keep their current value.
    pub fn merge_clean(&mut self, attributes: Map<String, Value>) {
        self.attributes.extend(attributes);
        self.dirty.clear();
    }

    /// Replaces all attributes with a fresh server copy and clears the dirty
    /// set.
    pub fn replace_clean(&mut self, attributes: Map<String, Value>) {
        self.attributes = attributes;
        self.dirty.clear();
    }

    /// Consumes the tracker and returns the attributes.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_from_existing_starts_clean() {
        let tracked = TrackedAttributes::from_existing(object(json!({"id": 1, "name": "a"})));

        assert!(!tracked.is_dirty());
        assert_eq!(tracked.changed_fields(), json!({}));
    }

    #[test]
    fn test_new_marks_every_field_dirty() {
        let tracked = TrackedAttributes::new(object(json!({"name": "a", "age": 3})));

        assert!(tracked.is_dirty());
        assert_eq!(tracked.dirty_fields().len(), 2);
        assert_eq!(tracked.changed_fields(), json!({"name": "a", "age": 3}));
    }

    #[test]
    fn test_changed_fields_returns_only_assigned_fields() {
        let mut tracked =
            TrackedAttributes::from_existing(object(json!({"id": 1, "name": "a", "age": 3})));
        tracked.set("name", json!("b"));

        assert_eq!(tracked.changed_fields(), json!({"name": "b"}));
        assert_eq!(tracked.get("age"), Some(&json!(3)));
    }

    #[test]
    fn test_set_new_field_is_dirty() {
        let mut tracked = TrackedAttributes::from_existing(object(json!({"id": 1})));
        tracked.set("nickname", json!("x"));

        assert!(tracked.dirty_fields().contains("nickname"));
        assert_eq!(tracked.attributes().len(), 2);
    }

    #[test]
    fn test_assigning_same_value_still_marks_dirty() {
        let mut tracked = TrackedAttributes::from_existing(object(json!({"name": "a"})));
        tracked.set("name", json!("a"));

        assert!(tracked.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty_state() {
        let mut tracked = TrackedAttributes::from_existing(object(json!({"name": "a"})));
        tracked.set("name", json!("b"));
        tracked.mark_clean();

        assert!(!tracked.is_dirty());
        assert_eq!(tracked.get("name"), Some(&json!("b")));
    }

    #[test]
    fn test_merge_clean_overlays_server_values() {
        let mut tracked = TrackedAttributes::new(object(json!({"name": "a", "local": true})));
        tracked.merge_clean(object(json!({"id": 7, "name": "A"})));

        assert!(!tracked.is_dirty());
        assert_eq!(tracked.get("id"), Some(&json!(7)));
        assert_eq!(tracked.get("name"), Some(&json!("A")));
        assert_eq!(tracked.get("local"), Some(&json!(true)));
    }

    #[test]
    fn test_replace_clean_drops_local_fields() {
        let mut tracked = TrackedAttributes::from_existing(object(json!({"id": 1, "name": "a"})));
        tracked.set("extra", json!(1));
        tracked.replace_clean(object(json!({"id": 1, "name": "z"})));

        assert!(!tracked.is_dirty());
        assert!(tracked.get("extra").is_none());
        assert_eq!(tracked.clone().into_inner().len(), 2);
    }
}
