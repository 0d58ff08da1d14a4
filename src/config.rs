//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, EvictionPolicyKind};
use crate::error::{CacheError, Result};

/// Address used when `LISTEN_ADDR` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = ":8080";

/// Sweep interval used when `SWEEP_INTERVAL_SECONDS` is not set.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

/// Server configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity, default TTL and eviction policy of the cache
    pub cache: CacheConfig,
    /// Address to bind, `host:port` or `:port`
    pub listen_addr: String,
    /// Background sweep interval, None = lazy expiration only
    pub sweep_interval: Option<Duration>,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (required, > 0)
    /// - `DEFAULT_TTL_SECONDS` - Default TTL in seconds (optional, no expiration if unset)
    /// - `LISTEN_ADDR` - Bind address (default: `:8080`)
    /// - `EVICTION_POLICY` - `lru`, `lfu`, `2q`, `arc` or `rand` (default: `lru`)
    /// - `SWEEP_INTERVAL_SECONDS` - Background sweep frequency, `0` disables (default: 1)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_entries: usize = required(&lookup, "MAX_ENTRIES")?;
        let default_ttl = optional::<u64, _>(&lookup, "DEFAULT_TTL_SECONDS")?.map(Duration::from_secs);
        let policy = optional::<EvictionPolicyKind, _>(&lookup, "EVICTION_POLICY")?.unwrap_or_default();
        let sweep_secs = optional::<u64, _>(&lookup, "SWEEP_INTERVAL_SECONDS")?
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        let listen_addr = match lookup("LISTEN_ADDR").map(|v| v.trim().to_string()) {
            Some(addr) if !addr.is_empty() => addr,
            Some(_) => {
                return Err(CacheError::InvalidConfig("LISTEN_ADDR cannot be empty".to_string()))
            }
            None => DEFAULT_LISTEN_ADDR.to_string(),
        };

        Ok(Self {
            cache: CacheConfig::new(max_entries, default_ttl)?.with_policy(policy),
            listen_addr,
            sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
        })
    }

    /// Returns the address to hand to the listener.
    ///
    /// A bare `:port` binds every interface.
    pub fn bind_addr(&self) -> String {
        if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        }
    }
}

fn required<T, F>(lookup: &F, name: &str) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name)?
        .ok_or_else(|| CacheError::InvalidConfig(format!("{} must be set", name)))
}

fn optional<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CacheError::InvalidConfig(format!("{} has an invalid value: '{}'", name, raw))
        }),
    }
}
