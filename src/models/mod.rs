//! Response models for the proxy's own endpoints
//!
//! This module defines the DTOs (Data Transfer Objects) serialized by the
//! cache management and health handlers.

pub mod responses;

// Re-export commonly used types
pub use responses::{FlushResponse, HealthResponse, StatsResponse};
