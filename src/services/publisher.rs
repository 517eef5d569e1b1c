use tracing::{error, info, warn};

use crate::config::ConfigError;
use crate::models::IssueRecord;
use crate::services::cache::CacheHandle;

/// What happened to the cache write attached to a refresh.
///
/// This is reported next to the fetch result, never in place of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped(ConfigError),
    Failed(String),
}

impl WriteOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

/// Upserts the picked issue under a fixed key.
pub struct CachePublisher {
    cache: CacheHandle,
    key: String,
}

impl CachePublisher {
    /// A missing credential is accepted here and reported on every publish,
    /// so the read half of a refresh keeps working.
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

    pub async fn publish(&self, issue: &IssueRecord) -> WriteOutcome {
        let outcome = self.try_publish(issue).await;
        metrics::counter!("cache_write_total", "outcome" => outcome.label()).increment(1);
        outcome
    }

    async fn try_publish(&self, issue: &IssueRecord) -> WriteOutcome {
        let cache = match &self.cache {
            Ok(cache) => cache,
            Err(e) => {
                error!(event = "cache_write_skipped", key = %self.key, error = %e, "Cache write skipped");
                return WriteOutcome::Skipped(e.clone());
            }
        };

        match cache.write(&self.key, issue.as_value()).await {
            Ok(()) => {
                info!(
                    event = "cache_write_finished",
                    backend = cache.backend(),
                    key = %self.key,
                    title = %issue.title(),
                    "Cached current issue"
                );
                WriteOutcome::Written
            }
            Err(e) => {
                warn!(
                    event = "cache_write_failed",
                    backend = cache.backend(),
                    key = %self.key,
                    error = %e,
                    "Cache write failed"
                );
                WriteOutcome::Failed(e.to_string())
            }
        }
    }
}
