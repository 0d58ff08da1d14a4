//! Cache Engine Module
//!
//! Combines the entry store, expiration tracker and eviction policy into the
//! get/set/delete operations the server exposes.
//!
//! The engine itself is single-threaded (`&mut self` everywhere, including
//! `get`, which updates recency and stats). Callers share it behind one lock;
//! see [`SharedCache`](crate::api::SharedCache).

use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::cache::{
    expiry_from, CacheEntry, CacheStats, EntryStore, EvictionPolicy, EvictionPolicyKind,
    ExpirationTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::error::{CacheError, Result};

// == Cache Config ==
/// Capacity and expiration settings for a [`CacheEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries, always > 0
    pub max_entries: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Option<Duration>,
    /// Victim selection strategy
    pub policy: EvictionPolicyKind,
}

impl CacheConfig {
    /// Creates an LRU config, rejecting `max_entries == 0`.
    pub fn new(max_entries: usize, default_ttl: Option<Duration>) -> Result<Self> {
        let config = Self {
            max_entries,
            default_ttl,
            policy: EvictionPolicyKind::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: EvictionPolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// == Cache Engine ==
/// Bounded in-memory cache with TTL expiration and policy-driven eviction.
///
/// Every key in `store` is tracked by `policy` and vice versa. Keys with a
/// deadline are also tracked by `expirations`.
#[derive(Debug)]
pub struct CacheEngine {
    store: EntryStore,
    expirations: ExpirationTracker,
    policy: Box<dyn EvictionPolicy>,
    stats: CacheStats,
    config: CacheConfig,
}

impl CacheEngine {
    // == Constructor ==
    /// Builds an empty engine. Fails fast with `InvalidConfig` on a zero capacity.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: EntryStore::with_capacity(config.max_entries),
            expirations: ExpirationTracker::new(),
            policy: config.policy.build(config.max_entries),
            stats: CacheStats::new(),
            config,
        })
    }

    // == Get ==
    /// Returns the value for `key` if it is present and live at `now`.
    ///
    /// A hit marks the key most recently used. An expired entry is removed as
    /// a side effect and reported as a miss.
    pub fn get(&mut self, key: &str, now: u64) -> Option<Bytes> {
        if !self.store.contains(key) {
            self.stats.record_miss();
            return None;
        }

        if self.expirations.is_expired(key, now) {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "expired entry removed on access");
            return None;
        }

        let entry = self.store.get_mut(key)?;
        entry.touch(now);
        let value = entry.value.clone();

        self.policy.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Creates or overwrites `key`.
    ///
    /// `ttl` falls back to the configured default; with neither the entry
    /// never expires. If the insert pushes the cache over capacity, expired
    /// entries are reclaimed first and only then are live victims evicted
    /// until it fits again. The key just written is never a victim.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Bytes>,
        ttl: Option<Duration>,
        now: u64,
    ) -> Result<()> {
        let key = key.into();
        let value = value.into();
        validate_key(&key)?;
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidValue(format!(
                "value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let ttl = ttl.or(self.config.default_ttl);
        self.expirations
            .record(&key, ttl.map(|ttl| expiry_from(now, ttl)));
        self.policy.touch(&key);
        self.store.put(key.clone(), CacheEntry::new(value, ttl, now));

        self.evict_overflow(&key, now);
        debug_assert_eq!(self.store.len(), self.policy.len());
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was not present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Contains ==
    /// Checks for a live entry without touching recency or stats.
    pub fn contains(&self, key: &str, now: u64) -> bool {
        self.store.contains(key) && !self.expirations.is_expired(key, now)
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry.
    ///
    /// `None` is a miss; `Some(None)` is a live entry without expiration.
    pub fn ttl_remaining(&self, key: &str, now: u64) -> Option<Option<Duration>> {
        if !self.contains(key, now) {
            return None;
        }
        self.store.get(key).map(|entry| entry.ttl_remaining(now))
    }

    // == Sweep Expired ==
    /// Removes every entry expired at `now`. Returns how many were removed.
    pub fn sweep_expired(&mut self, now: u64) -> usize {
        let expired = self.expirations.sweep(now);
        let mut removed = 0;
        for key in &expired {
            if self.remove_entry(key).is_some() {
                removed += 1;
            }
        }
        self.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.store.len();
        stats
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.expirations.clear();
        self.policy.clear();
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.max_entries
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Removes `key` from all three components.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.store.remove(key);
        self.policy.remove(key);
        self.expirations.remove(key);
        removed
    }

    fn evict_overflow(&mut self, protected: &str, now: u64) {
        if self.store.len() <= self.config.max_entries {
            return;
        }

        let reclaimed = self.sweep_expired(now);
        if reclaimed > 0 {
            debug!(reclaimed, "reclaimed expired entries before evicting");
        }

        while self.store.len() > self.config.max_entries {
            let Some(victim) = self.next_victim(protected) else {
                break;
            };

            self.store.remove(&victim);
            self.expirations.remove(&victim);
            self.policy.evict(&victim);
            self.stats.record_eviction();
            debug!(key = %victim, "evicted entry to stay within capacity");
        }
    }

    /// The policy's first choice, or the next one in line if that is `protected`.
    fn next_victim(&self, protected: &str) -> Option<String> {
        match self.policy.next_victim() {
            Some(victim) if victim != protected => Some(victim.to_string()),
            Some(_) => self
                .policy
                .eviction_iter()
                .find(|candidate| *candidate != protected)
                .map(str::to_string),
            None => None,
        }
    }
}

/// Rejects empty keys and keys over [`MAX_KEY_LENGTH`] bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
