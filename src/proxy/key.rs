//! Cache key derivation
//!
//! A request's logical identity is its path plus its query parameters. The
//! parameters live in a `BTreeMap`, so two requests carrying the same pairs
//! in a different order produce the same key. A name given more than once
//! maps to an array holding its values in request order.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{ProxyError, Result};

/// Query parameters of a proxied request, sorted by name.
pub type QueryParams = BTreeMap<String, Value>;

/// Groups raw query pairs by name.
///
/// A name seen once keeps its string value; a repeated name collects every
/// value, in order, into an array.
pub fn group_pairs<I>(pairs: I) -> QueryParams
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut params = QueryParams::new();
    for (name, value) in pairs {
        match params.get_mut(&name) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                params.insert(name, Value::String(value));
            }
        }
    }
    params
}

/// Cache key for one logical upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    path: String,
    query: Vec<(String, String)>,
    text: String,
}

impl CacheKey {
    /// Derives the key for `path` and `params`.
    ///
    /// `path` is used as given, percent-encoding included. Fails when it is
    /// not an absolute, query-free path, or when a parameter has an empty
    /// name or a value that is neither a scalar (string, number, boolean)
    /// nor an array of scalars.
    pub fn derive(path: &str, params: &QueryParams) -> Result<Self> {
        validate_path(path)?;

        let mut query = Vec::with_capacity(params.len());
        for (name, value) in params {
            if name.is_empty() {
                return Err(ProxyError::InvalidQueryParam {
                    name: name.clone(),
                    reason: "name must not be empty",
                });
            }
            match value {
                Value::Array(values) => {
                    for item in values {
                        query.push((name.clone(), scalar_to_string(name, item)?));
                    }
                }
                _ => query.push((name.clone(), scalar_to_string(name, value)?)),
            }
        }

        let encoded = serde_json::to_string(params)
            .map_err(|e| ProxyError::Internal(format!("failed to encode query: {e}")))?;

        Ok(Self {
            path: path.to_string(),
            query,
            text: format!("{path}{encoded}"),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs sorted by name, values rendered as strings. Repeated
    /// names keep their values in request order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn validate_path(path: &str) -> Result<()> {
    let reason = if path.is_empty() {
        "must not be empty"
    } else if !path.starts_with('/') {
        "must start with '/'"
    } else if path.contains(['?', '#']) {
        "must not contain a query or fragment"
    } else {
        return Ok(());
    };

    Err(ProxyError::InvalidPath {
        path: path.to_string(),
        reason,
    })
}

fn scalar_to_string(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(ProxyError::InvalidQueryParam {
            name: name.to_string(),
            reason: "value must be a string, number, boolean or a list of those",
        }),
    }
}
