//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the millisecond clock
//! every expiration decision is made against.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

// == Cache Entry ==
/// Represents a single cache entry with its payload and metadata.
///
/// Entries live inside the [`EntryStore`](super::EntryStore) and never leave
/// the engine; callers only ever receive a clone of `value`. Whether an entry
/// is expired is decided by the [`ExpirationTracker`](super::ExpirationTracker);
/// `expires_at` only feeds [`ttl_remaining`](Self::ttl_remaining).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Bytes,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Last successful read or write (Unix milliseconds)
    pub last_accessed: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry at `now` with an optional TTL.
    pub fn new(value: Bytes, ttl: Option<Duration>, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: ttl.map(|ttl| expiry_from(now, ttl)),
            last_accessed: now,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// Expired entries report `Duration::ZERO`.
    pub fn ttl_remaining(&self, now: u64) -> Option<Duration> {
        self.expires_at
            .map(|expires| Duration::from_millis(expires.saturating_sub(now)))
    }

    /// Records a read at `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed = now;
    }
}

/// Computes `now + ttl` in milliseconds, saturating instead of overflowing.
pub fn expiry_from(now: u64, ttl: Duration) -> u64 {
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    now.saturating_add(ttl_ms)
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
