//! Fallback payloads
//!
//! When the upstream call fails, the fetcher answers with a static payload
//! registered for the request's endpoint family, so pages can still render
//! placeholders. Families are the first path segment (`/home` -> `home`,
//! `/anime/1` -> `anime`).

use std::collections::HashMap;

use serde_json::{json, Value};

/// Builds the fallback payload for one family.
pub type FallbackGenerator = fn() -> Value;

/// Message of the payload returned when no fallback applies.
pub const UNAVAILABLE_MESSAGE: &str = "API unavailable";

const PLACEHOLDER_POSTER: &str = "/assets/placeholder.jpg";

/// Lookup table from endpoint family to fallback generator.
#[derive(Debug, Clone, Default)]
pub struct FallbackRegistry {
    generators: HashMap<String, FallbackGenerator>,
}

impl FallbackRegistry {
    /// An empty registry: every failure yields the generic payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `home` fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("home", home_fallback);
        registry
    }

    /// Registers (or replaces) the generator for `family`.
    pub fn register(&mut self, family: impl Into<String>, generator: FallbackGenerator) {
        self.generators.insert(family.into(), generator);
    }

    /// Fallback payload for `path`, if its family has one.
    pub fn for_path(&self, path: &str) -> Option<Value> {
        self.generators.get(family_of(path)).map(|generate| generate())
    }
}

/// Endpoint family of `path`: its first non-empty segment.
pub fn family_of(path: &str) -> &str {
    path.split('/').find(|s| !s.is_empty()).unwrap_or("")
}

/// Payload returned when the upstream fails and no fallback is registered.
pub fn unavailable_payload() -> Value {
    json!({
        "success": false,
        "message": UNAVAILABLE_MESSAGE,
        "data": {},
    })
}

/// Placeholder home page: one spotlight entry, six trending, twelve recent.
pub fn home_fallback() -> Value {
    let spotlight = vec![json!({
        "title": "Attack on Titan",
        "alternativeTitle": "進撃の巨人",
        "id": "attack-on-titan",
        "poster": PLACEHOLDER_POSTER,
        "rank": 1,
        "type": "TV",
        "quality": "HD",
        "duration": "24m",
        "aired": "2013-04-07",
        "synopsis": "Humanity fights for survival against giant humanoid creatures.",
        "episodes": { "sub": 75, "dub": 75, "eps": 75 },
    })];

    let trending: Vec<Value> = (0..6)
        .map(|i| {
            let kind = if i % 3 == 0 { "TV" } else { "Movie" };
            json!({
                "title": format!("Trending Anime {}", i + 1),
                "id": format!("trending-{}", i + 1),
                "poster": PLACEHOLDER_POSTER,
                "type": kind,
                "rating": (85 - i) as f64 / 10.0,
                "duration": "24m",
            })
        })
        .collect();

    let recent: Vec<Value> = (0..12)
        .map(|i| {
            let language = if i % 2 == 0 { "sub" } else { "dub" };
            json!({
                "title": format!("Recently Added {}", i + 1),
                "id": format!("recent-{}", i + 1),
                "poster": PLACEHOLDER_POSTER,
                "episode": i + 1,
                "number": i + 1,
                "language": language,
            })
        })
        .collect();

    json!({
        "success": true,
        "data": {
            "spotlight": spotlight,
            "trending": trending,
            "recent": recent,
        },
    })
}
