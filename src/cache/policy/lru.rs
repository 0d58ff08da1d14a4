//! LRU Policy Module
//!
//! Least Recently Used ordering backed by an index-addressed node arena.

use std::collections::HashMap;

use super::EvictionPolicy;

/// One slot in the arena. Free slots keep an empty key and no links.
#[derive(Debug, Default)]
struct Node {
    key: String,
    /// Neighbour towards the most recent end
    prev: Option<usize>,
    /// Neighbour towards the least recent end
    next: Option<usize>,
}

// == LRU Policy ==
/// Tracks access order for LRU eviction.
///
/// Nodes form a doubly-linked list inside `nodes`:
/// - `head` = most recently used
/// - `tail` = least recently used
///
/// Links are slot indices, so there are no reference cycles, and freed slots
/// are reused. `touch`, `remove` and `next_victim` are all O(1).
#[derive(Debug, Default)]
pub struct LruPolicy {
    nodes: Vec<Node>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LruPolicy {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Keys from least to most recently used.
    #[cfg(test)]
    pub fn keys_lru_order(&self) -> Vec<&str> {
        self.iter().collect()
    }

    fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.tail,
        }
    }

    fn allocate(&mut self, key: &str) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].key = key.to_string();
                idx
            }
            None => {
                self.nodes.push(Node {
                    key: key.to_string(),
                    ..Node::default()
                });
                self.nodes.len() - 1
            }
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;

        match self.head {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

impl EvictionPolicy for LruPolicy {
    // == Touch ==
    /// Marks a key as most recently used, tracking it if it is new.
    fn touch(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            if self.head != Some(idx) {
                self.detach(idx);
                self.push_front(idx);
            }
            return;
        }

        let idx = self.allocate(key);
        self.push_front(idx);
        self.index.insert(key.to_string(), idx);
    }

    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter())
    }

    // == Next Victim ==
    fn next_victim(&self) -> Option<&str> {
        self.tail.map(|idx| self.nodes[idx].key.as_str())
    }

    // == Remove ==
    fn remove(&mut self, key: &str) -> bool {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };
        self.detach(idx);
        self.nodes[idx].key.clear();
        self.free.push(idx);
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }
}

/// Walks the list from the least recently used end.
struct Iter<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.prev;
        Some(node.key.as_str())
    }
}
