//! Error types for the cache server
//!
//! Misses, expirations and evictions are ordinary cache states and never show
//! up here. Only malformed input or configuration becomes a `CacheError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty, oversized or otherwise unusable key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the accepted payload size
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Key absent on a strict-mode removal
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => return StatusCode::NOT_FOUND.into_response(),
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
