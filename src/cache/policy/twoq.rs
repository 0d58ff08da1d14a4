//! 2Q Policy Module
//!
//! New keys wait in a FIFO probation queue (`A1in`). A second touch promotes
//! them into an LRU main queue (`Am`). Keys evicted from probation are kept
//! as ghosts in `A1out`; a ghost that comes back skips probation.

use super::{EvictionPolicy, LruPolicy};

// == 2Q Policy ==
/// Scan-resistant policy built from two resident queues and one ghost queue.
///
/// Probation is drained first once it holds more than a quarter of the
/// capacity; otherwise the main queue gives up its least recent key.
#[derive(Debug)]
pub struct TwoQPolicy {
    /// Probation queue, FIFO since keys leave it on their second touch
    a1in: LruPolicy,
    /// Main queue
    am: LruPolicy,
    /// Keys recently evicted from probation, no values behind them
    a1out: LruPolicy,
    /// Probation size above which it is evicted from first
    kin: usize,
    ghost_capacity: usize,
}

impl TwoQPolicy {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            a1in: LruPolicy::new(),
            am: LruPolicy::with_capacity(capacity),
            a1out: LruPolicy::new(),
            kin: (capacity / 4).max(1),
            ghost_capacity: capacity,
        }
    }

    /// Whether `key` is remembered as a recently evicted probation key.
    pub fn is_ghost(&self, key: &str) -> bool {
        self.a1out.contains(key)
    }

    fn remember_ghost(&mut self, key: &str) {
        self.a1out.touch(key);
        if self.a1out.len() > self.ghost_capacity {
            if let Some(oldest) = self.a1out.next_victim().map(str::to_string) {
                self.a1out.remove(&oldest);
            }
        }
    }
}

impl EvictionPolicy for TwoQPolicy {
    // == Touch ==
    fn touch(&mut self, key: &str) {
        if self.am.contains(key) {
            self.am.touch(key);
        } else if self.a1in.remove(key) || self.a1out.remove(key) {
            self.am.touch(key);
        } else {
            self.a1in.touch(key);
        }
    }

    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.a1in.len() > self.kin {
            Box::new(self.a1in.eviction_iter().chain(self.am.eviction_iter()))
        } else {
            Box::new(self.am.eviction_iter().chain(self.a1in.eviction_iter()))
        }
    }

    // == Evict ==
    fn evict(&mut self, key: &str) -> bool {
        if self.a1in.remove(key) {
            self.remember_ghost(key);
            return true;
        }
        self.am.remove(key)
    }

    fn remove(&mut self, key: &str) -> bool {
        self.a1in.remove(key) || self.am.remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.a1in.contains(key) || self.am.contains(key)
    }

    fn len(&self) -> usize {
        self.a1in.len() + self.am.len()
    }

    fn clear(&mut self) {
        self.a1in.clear();
        self.am.clear();
        self.a1out.clear();
    }
}
