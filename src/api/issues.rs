//! Issue endpoints.
//!
//! `GET /api` picks a random open issue. `GET /api/cron-job` does the same and
//! also stores the pick as the current issue. `GET /api/current-issue` reads
//! the stored value back.

use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::observability::RequestOutcome;
use super::{ApiError, AppState, CurrentIssueResponse};
use crate::models::IssueRecord;
use crate::services::WriteOutcome;

/// # Endpoint
/// `GET /api`
pub async fn random_issue(
    State(state): State<Arc<AppState>>,
) -> Result<(Extension<RequestOutcome>, Json<IssueRecord>), ApiError> {
    let issue = state.issues().random_issue().await?;
    Ok((Extension(RequestOutcome::new("success")), Json(issue)))
}

/// Fetches a random issue and writes it to the cache.
///
/// # Endpoint
/// `GET /api/cron-job`
///
/// The response depends only on the fetch. A failed or skipped cache write is
/// logged by the publisher and does not change the status code.
pub async fn refresh_issue(
    State(state): State<Arc<AppState>>,
) -> Result<(Extension<RequestOutcome>, Json<IssueRecord>), ApiError> {
    let report = state.issues().refresh().await;
    let write = report.write.as_ref().map_or("none", WriteOutcome::label);
    let issue = report.issue?;

    Ok((
        Extension(RequestOutcome::new("success").with_cache_write(write)),
        Json(issue),
    ))
}

/// # Endpoint
/// `GET /api/current-issue`
pub async fn current_issue(
    State(state): State<Arc<AppState>>,
) -> Result<(Extension<RequestOutcome>, Json<CurrentIssueResponse>), ApiError> {
    let value = state.issues().current_issue().await?;
    let outcome = if value.is_some() { "cached" } else { "empty" };
    Ok((
        Extension(RequestOutcome::new(outcome)),
        Json(CurrentIssueResponse { value }),
    ))
}
