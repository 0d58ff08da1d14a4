//! Request and Response models for the cache server API
//!
//! Cached values travel as raw bytes; only the query string, the stats and
//! health payloads, and error bodies are structured.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SetParams;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
