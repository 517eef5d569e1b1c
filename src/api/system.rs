use axum::{Json, extract::State};
use std::sync::Arc;

use super::{AppState, HealthResponse};

/// Liveness probe.
///
/// # Endpoint
/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = &state.shared.config;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        cache_backend: config.cache.backend,
        repository: config.github.repository.clone(),
    })
}
