use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::api::AppState;

/// What an issue endpoint did, attached to its response for the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// `success`, or the failure label of the fetch or cache read.
    pub outcome: &'static str,

    /// Set only when the request also attempted a cache write.
    pub cache_write: Option<&'static str>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn new(outcome: &'static str) -> Self {
        Self {
            outcome,
            cache_write: None,
        }
    }

    #[must_use]
    pub const fn with_cache_write(mut self, label: &'static str) -> Self {
        self.cache_write = Some(label);
        self
    }
}

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    // unmatched paths share one label
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |mp| mp.as_str().to_string());
    let method = req.method().to_string();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
    );

    async move {
        let response = next.run(req).await;

        let status = response.status().as_u16();
        let elapsed = start.elapsed();
        let outcome = response.extensions().get::<RequestOutcome>().copied();

        let labels = [
            ("method", method),
            ("path", route),
            ("status", status.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let issue_outcome = outcome.map_or("none", |o| o.outcome);
        let cache_write = outcome.and_then(|o| o.cache_write).unwrap_or("none");

        if response.status().is_server_error() {
            warn!(
                event = "http_request_finished",
                status_code = status,
                duration_ms,
                outcome = issue_outcome,
                cache_write,
                "Request failed"
            );
        } else {
            info!(
                event = "http_request_finished",
                status_code = status,
                duration_ms,
                outcome = issue_outcome,
                cache_write,
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}
