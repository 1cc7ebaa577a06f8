use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use finnhub_client::FinnhubError;
use serde_json::json;

/// Application error type that converts to HTTP responses
///
/// Callers see exactly three failure shapes: their own bad input (4xx), a
/// retryable "temporarily unavailable" (503, only when the provider is
/// throttling and no cached fallback exists), or an upstream/internal
/// failure (502/500).
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Provider is rate limiting and no stale fallback exists; retryable
    Unavailable(String),
    /// Provider failed for a reason other than throttling
    Upstream(String),
    Database(sqlx::Error),
}

impl AppError {
    /// Classify a provider failure. Rate limiting maps to the retryable
    /// 503; anything else (timeout, transport, bad status) is a 502.
    pub fn from_provider(e: FinnhubError) -> Self {
        if e.is_rate_limited() {
            AppError::Unavailable(e.to_string())
        } else {
            AppError::Upstream(e.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Service temporarily unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream provider error");
                (StatusCode::BAD_GATEWAY, "Upstream provider error".into())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}
