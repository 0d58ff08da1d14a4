//! ARC Policy Module
//!
//! Adaptive Replacement Cache ordering. `T1` holds keys seen once, `T2` keys
//! seen at least twice. `B1` and `B2` remember keys recently evicted from
//! each side, and hits on them move the target size `p` of `T1`.

use super::{EvictionPolicy, LruPolicy};

/// Where the key of the most recent touch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Resident,
    New,
    GhostRecent,
    GhostFrequent,
}

// == ARC Policy ==
/// Balances recency against frequency by adapting `p` to ghost hits.
#[derive(Debug)]
pub struct ArcPolicy {
    t1: LruPolicy,
    t2: LruPolicy,
    b1: LruPolicy,
    b2: LruPolicy,
    /// Target size of `t1`
    p: usize,
    capacity: usize,
    last: Admission,
}

impl ArcPolicy {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            t1: LruPolicy::with_capacity(capacity),
            t2: LruPolicy::with_capacity(capacity),
            b1: LruPolicy::new(),
            b2: LruPolicy::new(),
            p: 0,
            capacity,
            last: Admission::Resident,
        }
    }

    /// Current target size of the recency list.
    pub fn target_recent(&self) -> usize {
        self.p
    }

    /// Whether the recency list should give up the next victim.
    ///
    /// A key admitted by the last touch does not count towards `t1`: the
    /// replacement decision is made as if it had not been inserted yet.
    fn evict_from_recent(&self) -> bool {
        let t1 = match self.last {
            Admission::New => self.t1.len().saturating_sub(1),
            _ => self.t1.len(),
        };
        t1 > 0 && (t1 > self.p || (self.last == Admission::GhostFrequent && t1 == self.p))
    }

    fn trim_ghosts(&mut self) {
        let capacity = self.capacity;
        for ghosts in [&mut self.b1, &mut self.b2] {
            while ghosts.len() > capacity {
                let Some(oldest) = ghosts.next_victim().map(str::to_string) else {
                    break;
                };
                ghosts.remove(&oldest);
            }
        }
    }
}

impl EvictionPolicy for ArcPolicy {
    // == Touch ==
    fn touch(&mut self, key: &str) {
        if self.t1.remove(key) || self.t2.contains(key) {
            self.t2.touch(key);
            self.last = Admission::Resident;
            return;
        }

        if self.b1.contains(key) {
            let delta = (self.b2.len() / self.b1.len()).max(1);
            self.p = (self.p + delta).min(self.capacity);
            self.b1.remove(key);
            self.t2.touch(key);
            self.last = Admission::GhostRecent;
        } else if self.b2.contains(key) {
            let delta = (self.b1.len() / self.b2.len()).max(1);
            self.p = self.p.saturating_sub(delta);
            self.b2.remove(key);
            self.t2.touch(key);
            self.last = Admission::GhostFrequent;
        } else {
            self.t1.touch(key);
            self.last = Admission::New;
        }
    }

    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.evict_from_recent() {
            Box::new(self.t1.eviction_iter().chain(self.t2.eviction_iter()))
        } else {
            Box::new(self.t2.eviction_iter().chain(self.t1.eviction_iter()))
        }
    }

    // == Evict ==
    fn evict(&mut self, key: &str) -> bool {
        let evicted = if self.t1.remove(key) {
            self.b1.touch(key);
            true
        } else if self.t2.remove(key) {
            self.b2.touch(key);
            true
        } else {
            false
        };
        self.trim_ghosts();
        evicted
    }

    fn remove(&mut self, key: &str) -> bool {
        self.t1.remove(key) || self.t2.remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    fn clear(&mut self) {
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
        self.last = Admission::Resident;
    }
}
