//! Entry Store Module
//!
//! Owns the key to [`CacheEntry`] map. Pure storage: capacity, recency and
//! expiration decisions are made by the engine.

use std::collections::HashMap;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Entry Store ==
/// Key-value storage backing the cache engine.
#[derive(Debug, Default)]
pub struct EntryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl EntryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, returning the previous one.
    pub fn put(&mut self, key: String, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(key, entry)
    }

    // == Get ==
    /// Returns the entry for `key`, expired or not.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the entry for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }

    // == Remove ==
    /// Removes `key`. Absent keys are a silent no-op.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    /// Removes `key`, failing with `NotFound` when it is absent.
    pub fn remove_strict(&mut self, key: &str) -> Result<CacheEntry> {
        self.entries
            .remove(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Checks whether `key` is physically present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
