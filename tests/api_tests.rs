//! Router tests with in-process backends.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use issue_roulette::config::{CacheBackend, Config, ConfigError};
use issue_roulette::models::{IssueRecord, SearchResult};
use issue_roulette::services::{
    CacheHandle, FetchError, IssueCache, IssueSource, MemoryIssueCache,
};
use issue_roulette::state::SharedState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedSource(Result<SearchResult, FetchError>);

#[async_trait::async_trait]
impl IssueSource for FixedSource {
    async fn search_open_issues(&self) -> Result<SearchResult, FetchError> {
        self.0.clone()
    }
}

fn issue_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "body": "Steps to reproduce",
        "state": "open",
        "html_url": format!("https://github.com/calcom/cal.com/issues/{number}"),
        "user": {
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat"
        },
        "labels": [{"id": 1, "name": "bug", "color": "d73a4a"}]
    })
}

fn search_result(numbers: &[u64]) -> SearchResult {
    let items = numbers
        .iter()
        .map(|n| IssueRecord::new(issue_json(*n)))
        .collect();
    SearchResult::from_items(items)
}

fn spawn_app(source: Result<SearchResult, FetchError>, cache: CacheHandle) -> Router {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Memory;

    let shared = SharedState::with_backends(config, Arc::new(FixedSource(source)), cache);
    let state = issue_roulette::api::create_app_state(Arc::new(shared), None);
    issue_roulette::api::router(state)
}

fn memory_cache() -> (Arc<MemoryIssueCache>, CacheHandle) {
    let cache = Arc::new(MemoryIssueCache::new());
    let handle: CacheHandle = Ok(cache.clone() as Arc<dyn IssueCache>);
    (cache, handle)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, body_json)
}

#[tokio::test]
async fn test_random_issue_returns_record() {
    let (cache, handle) = memory_cache();
    let app = spawn_app(Ok(search_result(&[1, 2, 3])), handle);

    let (status, _, body) = get(&app, "/api").await;

    assert_eq!(status, StatusCode::OK);
    let issue: IssueRecord = serde_json::from_value(body).unwrap();
    assert!(["Issue 1", "Issue 2", "Issue 3"].contains(&issue.title()));
    assert!(cache.is_empty().await, "direct fetch must not write the cache");
}

#[tokio::test]
async fn test_sparse_record_is_served_and_cached_verbatim() {
    let sparse = json!({
        "html_url": "https://github.com/calcom/cal.com/issues/9",
        "number": 9,
        "state": "open",
        "title": "Sparse",
        "labels": [{"id": 3, "name": "needs triage"}]
    });
    let (_, handle) = memory_cache();
    let app = spawn_app(
        Ok(SearchResult::from_items(vec![IssueRecord::new(sparse.clone())])),
        handle,
    );

    let (status, _, picked) = get(&app, "/api/cron-job").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(picked, sparse);

    let (_, _, current) = get(&app, "/api/current-issue").await;
    assert_eq!(current, json!({"value": sparse}));
}

#[tokio::test]
async fn test_rate_limited_maps_to_429() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Err(FetchError::RateLimited), handle);

    let (status, headers, body) = get(&app, "/api").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers.get(header::RETRY_AFTER).unwrap(), "60");
    assert_eq!(body, json!({"error": "Rate limit exceeded"}));
}

#[tokio::test]
async fn test_no_issues_maps_to_404() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Ok(search_result(&[])), handle);

    let (status, _, body) = get(&app, "/api").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No open issues found"}));
}

#[tokio::test]
async fn test_upstream_error_maps_to_500() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Err(FetchError::Upstream { status: 502 }), handle);

    let (status, _, body) = get(&app, "/api").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Error: 502"}));
}

#[tokio::test]
async fn test_unexpected_failure_surfaces_message() {
    let (_, handle) = memory_cache();
    let app = spawn_app(
        Err(FetchError::Unexpected("error decoding response body".to_string())),
        handle,
    );

    let (status, _, body) = get(&app, "/api/cron-job").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "error decoding response body"}));
}

#[tokio::test]
async fn test_cron_job_publishes_and_current_issue_reads_back() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Ok(search_result(&[42])), handle);

    let (status, _, body) = get(&app, "/api/current-issue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": null}));

    let (status, _, picked) = get(&app, "/api/cron-job").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(picked, issue_json(42));

    let (status, _, body) = get(&app, "/api/current-issue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], picked);
}

#[tokio::test]
async fn test_cron_job_without_credential_still_returns_issue() {
    let missing: CacheHandle = Err(ConfigError::MissingCredential {
        var: "VERCEL_API_KEY".to_string(),
    });
    let app = spawn_app(Ok(search_result(&[7])), missing);

    let (status, _, body) = get(&app, "/api/cron-job").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Issue 7");

    let (status, _, body) = get(&app, "/api/current-issue").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("VERCEL_API_KEY"));
}

#[tokio::test]
async fn test_cron_job_errors_leave_cache_untouched() {
    for error in [
        FetchError::RateLimited,
        FetchError::Upstream { status: 500 },
    ] {
        let (cache, handle) = memory_cache();
        let app = spawn_app(Err(error), handle);

        let (status, _, _) = get(&app, "/api/cron-job").await;

        assert_ne!(status, StatusCode::OK);
        assert!(cache.is_empty().await);
    }
}

#[tokio::test]
async fn test_health() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Ok(search_result(&[1])), handle);

    let (status, _, body) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache_backend"], "memory");
    assert_eq!(body["repository"], "calcom/cal.com");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (_, handle) = memory_cache();
    let app = spawn_app(Ok(search_result(&[1])), handle);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&body).contains("Metrics not enabled"));
}
