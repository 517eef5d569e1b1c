use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use super::observability::RequestOutcome;
use crate::constants::rate_limit::RETRY_AFTER_SECONDS;
use crate::services::{CacheError, FetchError};

#[derive(Debug)]
pub enum ApiError {
    RateLimited(String),

    NotFound(String),

    UpstreamError(String),

    CacheError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited(msg) => write!(f, "Rate limited: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::UpstreamError(msg) => write!(f, "Upstream error: {msg}"),
            Self::CacheError(msg) => write!(f, "Cache error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Label recorded in the request log next to the status code.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::RateLimited(_) => "rate_limited",
            Self::NotFound(_) => "not_found",
            Self::UpstreamError(_) => "upstream_error",
            Self::CacheError(_) => "cache_error",
            Self::InternalError(_) => "unexpected",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let outcome = RequestOutcome::new(self.outcome());
        let (status, error_message) = match self {
            Self::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UpstreamError(msg) => {
                tracing::warn!("Issue tracker error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Self::CacheError(msg) => {
                tracing::error!("Cache error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let mut response = (status, Json(ErrorBody::new(error_message))).into_response();
        response.extensions_mut().insert(outcome);

        if status == StatusCode::TOO_MANY_REQUESTS {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECONDS));
        }

        response
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match err {
            FetchError::RateLimited => Self::RateLimited(message),
            FetchError::NotFound => Self::NotFound(message),
            FetchError::Upstream { .. } => Self::UpstreamError(message),
            FetchError::Unexpected(_) => Self::InternalError(message),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::CacheError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
