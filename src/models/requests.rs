//! Request DTOs for the cache server API

use std::time::Duration;

use serde::Deserialize;

/// Query parameters for the SET operation (`PUT /set/{key}?ttl=N`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetParams {
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetParams {
    /// The requested TTL, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }
}
