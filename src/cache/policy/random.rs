//! Random Policy Module
//!
//! Evicts a uniformly random key. Keys live in a dense vector so removal is
//! an O(1) swap with the last slot.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::EvictionPolicy;

// == Random Policy ==
/// Picks victims at random, ignoring access history.
///
/// The starting slot of [`eviction_iter`](EvictionPolicy::eviction_iter) is
/// re-drawn on every change, so each insert sees a fresh victim.
#[derive(Debug)]
pub struct RandomPolicy {
    keys: Vec<String>,
    slots: HashMap<String, usize>,
    cursor: usize,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_rng(capacity, StdRng::from_os_rng())
    }

    /// Deterministic victims for a given seed.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::from_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn from_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            cursor: 0,
            rng,
        }
    }

    fn reroll(&mut self) {
        self.cursor = if self.keys.is_empty() {
            0
        } else {
            self.rng.random_range(0..self.keys.len())
        };
    }
}

impl EvictionPolicy for RandomPolicy {
    fn touch(&mut self, key: &str) {
        if !self.slots.contains_key(key) {
            self.slots.insert(key.to_string(), self.keys.len());
            self.keys.push(key.to_string());
        }
        self.reroll();
    }

    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        let (before, from_cursor) = self.keys.split_at(self.cursor.min(self.keys.len()));
        Box::new(from_cursor.iter().chain(before).map(String::as_str))
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(slot) = self.slots.remove(key) else {
            return false;
        };
        self.keys.swap_remove(slot);
        if let Some(moved) = self.keys.get(slot) {
            self.slots.insert(moved.clone(), slot);
        }
        self.reroll();
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.slots.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_iter_visits_every_key_once() {
        let mut policy = RandomPolicy::with_seed(8, 7);
        for key in ["a", "b", "c", "d", "e"] {
            policy.touch(key);
        }

        let seen: Vec<&str> = policy.eviction_iter().collect();
        assert_eq!(seen.len(), 5);
        assert_eq!(
            seen.into_iter().collect::<HashSet<_>>(),
            HashSet::from(["a", "b", "c", "d", "e"])
        );
    }

    #[test]
    fn test_random_remove_keeps_slots_consistent() {
        let mut policy = RandomPolicy::with_seed(4, 1);
        for key in ["a", "b", "c", "d"] {
            policy.touch(key);
        }

        assert!(policy.remove("a"));
        assert!(!policy.remove("a"));
        assert!(policy.remove("d"));

        assert_eq!(policy.len(), 2);
        for (slot, key) in policy.keys.iter().enumerate() {
            assert_eq!(policy.slots[key], slot);
        }
        assert!(policy.contains("b") && policy.contains("c"));
    }

    #[test]
    fn test_random_retouch_does_not_duplicate() {
        let mut policy = RandomPolicy::with_seed(4, 3);

        policy.touch("a");
        policy.touch("a");

        assert_eq!(policy.len(), 1);
        assert_eq!(policy.next_victim(), Some("a"));
    }

    #[test]
    fn test_random_victims_vary() {
        let mut policy = RandomPolicy::with_seed(16, 42);
        for round in 0..16 {
            policy.touch(&format!("k{}", round));
        }

        let mut victims = HashSet::new();
        for round in 0..64 {
            policy.touch(&format!("k{}", round % 16));
            victims.insert(policy.next_victim().map(str::to_string));
        }

        assert!(victims.len() > 1, "always picked {:?}", victims);
    }

    #[test]
    fn test_random_clear() {
        let mut policy = RandomPolicy::with_seed(4, 9);
        policy.touch("a");

        policy.clear();

        assert!(policy.is_empty());
        assert_eq!(policy.next_victim(), None);
    }
}
