//! hcache - An HTTP-fronted in-memory cache
//!
//! Bounded key-value cache with TTL expiration and LRU, LFU, 2Q, ARC or random
//! eviction, served over a small HTTP protocol.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState, SharedCache};
pub use cache::{CacheConfig, CacheEngine, EvictionPolicyKind};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweep_task;
