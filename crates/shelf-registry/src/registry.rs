//! Key → value index used as a collection's read path.
//!
//! [`Registry`] stores values in a `HashMap`. Iteration order of
//! [`Registry::get_all_values`] is unspecified; callers that need an order
//! sort the snapshot themselves.

use std::collections::HashMap;

use crate::error::{RegistryError, Result};

/// An in-memory index of values keyed by string.
///
/// The registry is owned by exactly one collection and is never shared;
/// mutation goes through `&mut self`.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    items: HashMap<String, T>,
}

impl<T> Registry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Register a value under `key`, replacing any previous value.
    pub fn register(&mut self, key: impl Into<String>, value: T) {
        self.items.insert(key.into(), value);
    }

    /// Overwrite the value under `key`.
    ///
    /// Behaves like [`register`](Self::register) when the key is new.
    pub fn update(&mut self, key: impl Into<String>, value: T) {
        self.items.insert(key.into(), value);
    }

    /// Remove the value under `key`, returning it if present.
    pub fn delete(&mut self, key: &str) -> Option<T> {
        self.items.remove(key)
    }

    /// Look up the value under `key`.
    pub fn get(&self, key: &str) -> Result<&T> {
        self.items.get(key).ok_or_else(|| RegistryError::NotFound {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate over registered keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Iterate over registered values in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }
}

impl<T: Clone> Registry<T> {
    /// Snapshot of every registered value, in unspecified order.
    pub fn get_all_values(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(String, T)> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
