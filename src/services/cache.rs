//! Key-value cache holding the last picked issue.
//!
//! [`IssueCache`] is the seam between the refresh flow and the store that
//! backs it. Production uses Vercel Edge Config; [`MemoryIssueCache`] keeps
//! values in process for local runs.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid cache URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Cache request failed: {0}")]
    Request(String),

    #[error("Cache store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid cache payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

/// A store with unconditional overwrite semantics for a single key.
#[async_trait::async_trait]
pub trait IssueCache: Send + Sync {
    /// Short name used in logs and metrics labels.
    fn backend(&self) -> &'static str;

    /// Replaces whatever is stored under `key`.
    async fn write(&self, key: &str, value: &Value) -> Result<(), CacheError>;

    /// Returns the stored value verbatim, `None` when the key is absent.
    async fn read(&self, key: &str) -> Result<Option<Value>, CacheError>;
}

/// The cache as seen by the service: either a usable backend, or the
/// configuration problem that prevented building one.
pub type CacheHandle = Result<Arc<dyn IssueCache>, ConfigError>;

#[derive(Default)]
pub struct MemoryIssueCache {
    items: RwLock<HashMap<String, Value>>,
}

impl MemoryIssueCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl IssueCache for MemoryIssueCache {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        debug!(key, "Writing cache item to memory");
        self.items
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, CacheError> {
        Ok(self.items.read().await.get(key).cloned())
    }
}

/// Read side of the cache. No freshness check and no fallback.
pub struct CacheReader {
    cache: CacheHandle,
    key: String,
}

impl CacheReader {
    #[must_use]
    pub fn new(cache: CacheHandle, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn current(&self) -> Result<Option<Value>, CacheError> {
        let cache = self.cache.as_ref().map_err(|e| CacheError::Config(e.clone()))?;
        cache.read(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_cache_overwrites() {
        let cache = MemoryIssueCache::new();
        assert!(cache.read("current-issue").await.unwrap().is_none());

        cache.write("current-issue", &json!({"title": "a"})).await.unwrap();
        cache.write("current-issue", &json!({"title": "b"})).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(
            cache.read("current-issue").await.unwrap(),
            Some(json!({"title": "b"}))
        );
    }

    #[tokio::test]
    async fn test_reader_returns_none_when_absent() {
        let cache: Arc<dyn IssueCache> = Arc::new(MemoryIssueCache::new());
        let reader = CacheReader::new(Ok(cache), "current-issue");

        assert!(reader.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_surfaces_config_error() {
        let reader = CacheReader::new(
            Err(ConfigError::MissingCredential {
                var: "VERCEL_API_KEY".to_string(),
            }),
            "current-issue",
        );

        let err = reader.current().await.unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
        assert!(err.to_string().contains("VERCEL_API_KEY"));
    }
}
