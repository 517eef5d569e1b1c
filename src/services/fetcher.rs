use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{IssueRecord, SearchResult};
use crate::services::selection::select_random;

/// Ways a fetch can fail. The display strings double as the `error` field of
/// HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("No open issues found")]
    NotFound,

    #[error("Error: {status}")]
    Upstream { status: u16 },

    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    /// Label used for the `issue_fetch_total` counter.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// Something that can run the fixed open-issue search.
#[async_trait::async_trait]
pub trait IssueSource: Send + Sync {
    async fn search_open_issues(&self) -> Result<SearchResult, FetchError>;
}

/// Runs one search and picks a random issue from it. Single attempt, no retries.
#[derive(Clone)]
pub struct IssueFetcher {
    source: Arc<dyn IssueSource>,
}

impl IssueFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn IssueSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_random(&self) -> Result<IssueRecord, FetchError> {
        let result = self.search().await?;
        Self::pick(result, &mut rand::rng())
    }

    /// Same as [`fetch_random`](Self::fetch_random) with a caller-supplied RNG.
    pub async fn fetch_random_with<R: Rng + Send + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<IssueRecord, FetchError> {
        let result = self.search().await?;
        Self::pick(result, rng)
    }

    async fn search(&self) -> Result<SearchResult, FetchError> {
        match self.source.search_open_issues().await {
            Ok(result) => Ok(result),
            Err(e) => {
                metrics::counter!("issue_fetch_total", "outcome" => e.outcome()).increment(1);
                warn!(event = "issue_fetch_failed", outcome = e.outcome(), error = %e, "Issue search failed");
                Err(e)
            }
        }
    }

    fn pick<R: Rng + ?Sized>(result: SearchResult, rng: &mut R) -> Result<IssueRecord, FetchError> {
        let Some(issue) = select_random(&result.items, rng).cloned() else {
            metrics::counter!("issue_fetch_total", "outcome" => FetchError::NotFound.outcome())
                .increment(1);
            info!(event = "issue_fetch_empty", "Search returned no open issues");
            return Err(FetchError::NotFound);
        };

        metrics::counter!("issue_fetch_total", "outcome" => "success").increment(1);
        info!(
            event = "issue_selected",
            candidates = result.items.len(),
            title = %issue.title(),
            url = %issue.html_url(),
            "Selected random issue"
        );
        Ok(issue)
    }
}
