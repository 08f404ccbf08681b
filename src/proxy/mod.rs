//! Proxy Module
//!
//! Cache key derivation, fallback payloads and the fetch algorithm that
//! ties the response cache to the upstream API.

pub mod fallback;
pub mod fetcher;
pub mod key;

pub use fallback::{family_of, FallbackGenerator, FallbackRegistry, UNAVAILABLE_MESSAGE};
pub use fetcher::{is_success_payload, FetchOutcome, FetchSource, ProxyFetcher};
pub use key::{group_pairs, CacheKey, QueryParams};
