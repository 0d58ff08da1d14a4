//! Eviction Policy Module
//!
//! Eviction policies only care about the order of keys. They never see values
//! or deadlines; the engine keeps them in step with the entry store.

mod arc;
mod lfu;
mod lru;
mod random;
mod twoq;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

pub use arc::ArcPolicy;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use twoq::TwoQPolicy;

// == Eviction Policy ==
/// Ordering of cached keys used to pick eviction victims.
pub trait EvictionPolicy: fmt::Debug + Send + Sync {
    /// Records an access to `key`, starting to track it if needed.
    fn touch(&mut self, key: &str);

    /// Keys in eviction order, first victim first.
    fn eviction_iter(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Returns the key that should be evicted next without removing it.
    fn next_victim(&self) -> Option<&str> {
        self.eviction_iter().next()
    }

    /// Stops tracking `key`. Returns true if it was tracked.
    fn remove(&mut self, key: &str) -> bool;

    /// Stops tracking `key` because it was chosen as a victim.
    ///
    /// Policies that keep ghost history remember evicted keys here; an
    /// explicit delete goes through [`remove`](Self::remove) and leaves none.
    fn evict(&mut self, key: &str) -> bool {
        self.remove(key)
    }

    fn contains(&self, key: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

// == Policy Kind ==
/// Selects which [`EvictionPolicy`] a cache is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used, recency breaks ties
    Lfu,
    /// FIFO probation queue in front of an LRU main queue
    #[serde(rename = "2q")]
    TwoQ,
    /// Adaptive replacement between recency and frequency lists
    Arc,
    /// Uniformly random victim
    #[serde(rename = "rand")]
    Random,
}

impl EvictionPolicyKind {
    /// Builds an empty policy of this kind sized for `capacity` keys.
    pub fn build(self, capacity: usize) -> Box<dyn EvictionPolicy> {
        match self {
            EvictionPolicyKind::Lru => Box::new(LruPolicy::with_capacity(capacity)),
            EvictionPolicyKind::Lfu => Box::new(LfuPolicy::new()),
            EvictionPolicyKind::TwoQ => Box::new(TwoQPolicy::new(capacity)),
            EvictionPolicyKind::Arc => Box::new(ArcPolicy::new(capacity)),
            EvictionPolicyKind::Random => Box::new(RandomPolicy::with_capacity(capacity)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvictionPolicyKind::Lru => "lru",
            EvictionPolicyKind::Lfu => "lfu",
            EvictionPolicyKind::TwoQ => "2q",
            EvictionPolicyKind::Arc => "arc",
            EvictionPolicyKind::Random => "rand",
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicyKind::Lru),
            "lfu" => Ok(EvictionPolicyKind::Lfu),
            "2q" => Ok(EvictionPolicyKind::TwoQ),
            "arc" => Ok(EvictionPolicyKind::Arc),
            "rand" | "random" => Ok(EvictionPolicyKind::Random),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction policy '{}', expected one of lru, lfu, 2q, arc, rand",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("lru".parse::<EvictionPolicyKind>().unwrap(), EvictionPolicyKind::Lru);
        assert_eq!(" LFU ".parse::<EvictionPolicyKind>().unwrap(), EvictionPolicyKind::Lfu);
        assert_eq!("2Q".parse::<EvictionPolicyKind>().unwrap(), EvictionPolicyKind::TwoQ);
        assert_eq!("arc".parse::<EvictionPolicyKind>().unwrap(), EvictionPolicyKind::Arc);
        assert_eq!("random".parse::<EvictionPolicyKind>().unwrap(), EvictionPolicyKind::Random);
        assert!(matches!(
            "mru".parse::<EvictionPolicyKind>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    const ALL_KINDS: [EvictionPolicyKind; 5] = [
        EvictionPolicyKind::Lru,
        EvictionPolicyKind::Lfu,
        EvictionPolicyKind::TwoQ,
        EvictionPolicyKind::Arc,
        EvictionPolicyKind::Random,
    ];

    #[test]
    fn test_kind_display_round_trips() {
        for kind in ALL_KINDS {
            assert_eq!(kind.to_string().parse::<EvictionPolicyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_serializes_as_config_name() {
        for kind in ALL_KINDS {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_build_produces_empty_policy() {
        for kind in ALL_KINDS {
            let mut policy = kind.build(8);
            assert!(policy.is_empty());
            policy.touch("a");
            assert_eq!(policy.next_victim(), Some("a"));
        }
    }

    #[test]
    fn test_evict_and_remove_stop_tracking() {
        for kind in ALL_KINDS {
            let mut policy = kind.build(4);
            policy.touch("a");
            policy.touch("b");

            assert!(policy.evict("a"), "{} lost a", kind);
            assert!(!policy.contains("a"));
            assert!(policy.remove("b"));
            assert!(!policy.evict("b"));
            assert!(policy.is_empty(), "{} not empty", kind);
        }
    }
}
