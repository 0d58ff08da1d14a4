//! API Handlers
//!
//! HTTP request handlers translating each endpoint into one cache engine call.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::cache::{current_timestamp_ms, resident_memory_kb, CacheEngine};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, SetParams, StatsResponse};

/// The cache engine shared by every request.
///
/// `get` updates LRU order and hit counters, so it takes the write lock like
/// `set` and `delete`. Only the stats snapshot reads under the read lock. No
/// I/O ever happens while the lock is held.
pub type SharedCache = Arc<RwLock<CacheEngine>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache engine
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState around an already built engine.
    pub fn new(cache: CacheEngine) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = CacheEngine::new(config.cache.clone())?;
        Ok(Self::new(cache))
    }
}

/// Handler for GET /get/:key
///
/// Responds with the raw value bytes on a hit and an empty 404 on a miss.
pub async fn get_handler(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let value = {
        let mut cache = state.cache.write().await;
        cache.get(&key, current_timestamp_ms())
    };

    match value {
        Some(value) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            value,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handler for PUT /set/:key
///
/// Stores the request body under `key`, with an optional `ttl` query
/// parameter in seconds.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<SetParams>,
    body: Bytes,
) -> Result<StatusCode> {
    let size = body.len();
    {
        let mut cache = state.cache.write().await;
        cache.set(key.as_str(), body, params.ttl(), current_timestamp_ms())?;
    }

    debug!(key = %key, size, ttl = ?params.ttl, "stored entry");
    Ok(StatusCode::OK)
}

/// Handler for PUT /set and PUT /set/
///
/// A set without a key segment is always rejected.
pub async fn missing_key_handler() -> CacheError {
    CacheError::InvalidKey("key cannot be empty".to_string())
}

/// Handler for DELETE /del/:key
///
/// 200 if the key was removed, 404 if it was absent.
pub async fn delete_handler(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    let removed = state.cache.write().await.delete(&key);

    if removed {
        debug!(key = %key, "deleted entry");
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, capacity, policy) = {
        let cache = state.cache.read().await;
        (cache.stats(), cache.capacity(), cache.config().policy)
    };

    Json(StatsResponse::new(&stats, capacity, policy, resident_memory_kb()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;

    fn test_state() -> AppState {
        AppState::new(CacheEngine::new(CacheConfig::new(100, None).unwrap()).unwrap())
    }

    async fn set(state: &AppState, key: &str, value: &'static str, ttl: Option<u64>) -> Result<StatusCode> {
        set_handler(
            State(state.clone()),
            Path(key.to_string()),
            Query(SetParams { ttl }),
            Bytes::from_static(value.as_bytes()),
        )
        .await
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        assert_eq!(set(&state, "test_key", "test_value", None).await, Ok(StatusCode::OK));

        let response = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let response = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_a_miss() {
        let state = test_state();

        set(&state, "flash", "value", Some(0)).await.unwrap();

        let response = get_handler(State(state.clone()), Path("flash".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.cache.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        set(&state, "to_delete", "value", None).await.unwrap();

        let status = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let status = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let response = get_handler(State(state), Path("to_delete".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
        #[cfg(target_os = "linux")]
        assert!(response.memory_kb.is_some());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_oversized_key() {
        let state = test_state();
        let key = "k".repeat(crate::cache::MAX_KEY_LENGTH + 1);

        let result = set(&state, &key, "value", None).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_handler() {
        let response = missing_key_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
