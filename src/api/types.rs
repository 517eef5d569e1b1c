use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CacheBackend;

/// Body of every failed request: `{ "error": "..." }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Body of the cache read endpoint. `value` is `null` when nothing is cached.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentIssueResponse {
    pub value: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cache_backend: CacheBackend,
    pub repository: String,
}
