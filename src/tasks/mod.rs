//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiration sweep: reclaims expired cache entries at a configured interval

mod sweeper;

pub use sweeper::spawn_sweep_task;
