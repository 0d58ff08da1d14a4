//! Expiration Tracker Module
//!
//! Tracks per-key deadlines. Nothing here runs on a timer: expiry is checked
//! when a key is accessed, and [`ExpirationTracker::sweep`] reclaims in bulk
//! when a caller asks for it.

use std::collections::{BTreeSet, HashMap};

// == Expiration Tracker ==
/// Deadline index keyed by cache key.
///
/// Deadlines are kept both by key (for O(1) checks) and ordered by time (so a
/// sweep only visits keys that have actually expired).
#[derive(Debug, Default)]
pub struct ExpirationTracker {
    /// key -> expiration timestamp (Unix milliseconds)
    deadlines: HashMap<String, u64>,
    /// (expiration timestamp, key), ascending
    by_deadline: BTreeSet<(u64, String)>,
}

impl ExpirationTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Sets or clears the deadline for `key`.
    ///
    /// `None` means the key never expires and stops being tracked.
    pub fn record(&mut self, key: &str, expires_at: Option<u64>) {
        self.remove(key);
        if let Some(deadline) = expires_at {
            self.deadlines.insert(key.to_string(), deadline);
            self.by_deadline.insert((deadline, key.to_string()));
        }
    }

    // == Is Expired ==
    /// Returns true if `key` has a deadline at or before `now`.
    pub fn is_expired(&self, key: &str, now: u64) -> bool {
        self.deadlines
            .get(key)
            .is_some_and(|&deadline| now >= deadline)
    }

    /// Returns the deadline recorded for `key`, if any.
    pub fn deadline(&self, key: &str) -> Option<u64> {
        self.deadlines.get(key).copied()
    }

    // == Sweep ==
    /// Returns every key expired at `now`, earliest deadline first, and stops
    /// tracking them.
    pub fn sweep(&mut self, now: u64) -> Vec<String> {
        let mut expired = Vec::new();
        while let Some((deadline, _)) = self.by_deadline.first() {
            if *deadline > now {
                break;
            }
            if let Some((_, key)) = self.by_deadline.pop_first() {
                self.deadlines.remove(&key);
                expired.push(key);
            }
        }
        expired
    }

    // == Remove ==
    /// Stops tracking `key`. Returns true if it had a deadline.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.deadlines.remove(key) {
            Some(deadline) => {
                self.by_deadline.remove(&(deadline, key.to_string()));
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
        self.by_deadline.clear();
    }

    /// Number of keys with a deadline.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
