//! Cache Module
//!
//! In-memory response cache with TTL expiry and insertion-order eviction.

mod entry;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::{CacheStats, StatsCounters};
pub use store::{CacheStore, SharedCache};
