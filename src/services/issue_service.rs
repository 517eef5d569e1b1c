//! Fetch-and-cache flow behind the HTTP endpoints, the scheduler and the CLI.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::models::IssueRecord;
use crate::services::cache::{CacheError, CacheHandle, CacheReader};
use crate::services::fetcher::{FetchError, IssueFetcher};
use crate::services::publisher::{CachePublisher, WriteOutcome};

/// Result of one fetch-and-publish cycle.
///
/// `issue` is what the caller gets back. `write` is `None` when nothing was
/// fetched, so nothing was written.
#[derive(Debug)]
pub struct RefreshReport {
    pub issue: Result<IssueRecord, FetchError>,
    pub write: Option<WriteOutcome>,
    pub finished_at: DateTime<Utc>,
}

impl RefreshReport {
    #[must_use]
    pub fn wrote_cache(&self) -> bool {
        self.write.as_ref().is_some_and(WriteOutcome::is_written)
    }
}

pub struct IssueService {
    fetcher: IssueFetcher,
    publisher: CachePublisher,
    reader: CacheReader,
}

impl IssueService {
    #[must_use]
    pub const fn new(fetcher: IssueFetcher, publisher: CachePublisher, reader: CacheReader) -> Self {
        Self {
            fetcher,
            publisher,
            reader,
        }
    }

    /// Builds fetcher, publisher and reader around one cache handle.
    #[must_use]
    pub fn with_cache(fetcher: IssueFetcher, cache: CacheHandle, key: &str) -> Self {
        Self::new(
            fetcher,
            CachePublisher::new(cache.clone(), key),
            CacheReader::new(cache, key),
        )
    }

    /// Picks a random open issue without touching the cache.
    pub async fn random_issue(&self) -> Result<IssueRecord, FetchError> {
        self.fetcher.fetch_random().await
    }

    /// Picks a random open issue and stores it as the current issue.
    pub async fn refresh(&self) -> RefreshReport {
        let issue = self.fetcher.fetch_random().await;

        let write = match &issue {
            Ok(issue) => Some(self.publisher.publish(issue).await),
            Err(_) => None,
        };

        let report = RefreshReport {
            issue,
            write,
            finished_at: Utc::now(),
        };

        info!(
            event = "refresh_finished",
            fetched = report.issue.is_ok(),
            write = report.write.as_ref().map_or("none", WriteOutcome::label),
            "Refresh cycle finished"
        );

        report
    }

    /// Last published value, verbatim.
    pub async fn current_issue(&self) -> Result<Option<Value>, CacheError> {
        self.reader.current().await
    }
}
