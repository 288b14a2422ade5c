//! The flat metadata map produced by every decoder.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field name to rendered value.
///
/// Keys are unique and inserting an existing key overwrites it: the same
/// logical field may appear in several places in one stream, and the last one
/// read wins. Backed by an ordered map so two parses of the same bytes
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataMap {
    fields: BTreeMap<String, String>,
}

impl MetadataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume the map, returning the underlying ordered map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl<'a> IntoIterator for &'a MetadataMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
