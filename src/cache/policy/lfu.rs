//! LFU Policy Module
//!
//! Least Frequently Used ordering. Keys with the fewest accesses are evicted
//! first; among equals the one touched longest ago goes first.

use std::collections::{BTreeSet, HashMap};

use super::EvictionPolicy;

/// Access count and logical time of the last touch.
#[derive(Debug, Clone, Copy)]
struct Usage {
    hits: u64,
    tick: u64,
}

// == LFU Policy ==
/// Tracks access frequency for LFU eviction.
///
/// `order` is sorted by `(hits, tick)`, so the first element is always the
/// victim. Touch and remove are O(log n).
#[derive(Debug, Default)]
pub struct LfuPolicy {
    usage: HashMap<String, Usage>,
    order: BTreeSet<(u64, u64, String)>,
    clock: u64,
}

impl LfuPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded accesses for `key`.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.usage.get(key).map(|usage| usage.hits)
    }
}

impl EvictionPolicy for LfuPolicy {
    fn touch(&mut self, key: &str) {
        self.clock += 1;
        let tick = self.clock;

        let hits = match self.usage.get_mut(key) {
            Some(usage) => {
                self.order.remove(&(usage.hits, usage.tick, key.to_string()));
                usage.hits += 1;
                usage.tick = tick;
                usage.hits
            }
            None => {
                self.usage.insert(key.to_string(), Usage { hits: 1, tick });
                1
            }
        };

        self.order.insert((hits, tick, key.to_string()));
    }

    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.order.iter().map(|(_, _, key)| key.as_str()))
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.usage.remove(key) {
            Some(usage) => {
                self.order.remove(&(usage.hits, usage.tick, key.to_string()));
                true
            }
            None => false,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.usage.contains_key(key)
    }

    fn len(&self) -> usize {
        self.usage.len()
    }

    fn clear(&mut self) {
        self.usage.clear();
        self.order.clear();
    }
}
