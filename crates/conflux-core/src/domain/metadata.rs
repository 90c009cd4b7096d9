//! Descriptive metadata attached to raw payloads.

use indexmap::IndexMap;
use serde_json::Value;

/// An ordered mapping of string keys to scalar values describing a payload.
///
/// Detectors populate metadata when they observe an artifact (mime type,
/// provenance, target identity hints); adapters add to it at each chain
/// hop. Metadata is mutable only while being built: once captured into a
/// [`ConfigurationSource`] it is moved and never touched again.
///
/// Later writers win at the same key, while the key keeps its original
/// position in iteration order.
///
/// [`ConfigurationSource`]: crate::domain::ConfigurationSource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: IndexMap<String, Value>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, overwriting any previous value at the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Inserts an entry (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value stored at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value at `key` if it is a string.
    ///
    /// Non-string values are treated as absent; target addressing keys are
    /// required to be strings.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merges `other` into this metadata; `other` wins at the same key.
    pub fn merge(&mut self, other: Metadata) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
