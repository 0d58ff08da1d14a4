//! Cache Module
//!
//! In-memory cache engine: entry storage, TTL expiration and policy-driven
//! eviction, composed by [`CacheEngine`].

mod engine;
mod entry;
mod expiration;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use engine::{validate_key, CacheConfig, CacheEngine};
pub use entry::{current_timestamp_ms, expiry_from, CacheEntry};
pub use expiration::ExpirationTracker;
pub use policy::{
    ArcPolicy, EvictionPolicy, EvictionPolicyKind, LfuPolicy, LruPolicy, RandomPolicy, TwoQPolicy,
};
pub use stats::{resident_memory_kb, CacheStats};
pub use store::EntryStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
