//! REST API endpoints.
//!
//! Axum-based HTTP API serving weekday presence statistics. Every handler
//! reads the dataset through the shared [`TimedCache`](crate::cache::TimedCache).

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::storage::SourceError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Presence data unavailable: {0}")]
    SourceUnavailable(String),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        ApiError::SourceUnavailable(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::SourceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SOURCE_UNAVAILABLE")
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/users", get(routes::users::list_users))
        .route(
            "/api/v1/mean_time_weekday/:user_id",
            get(routes::presence::mean_time_weekday),
        )
        .route(
            "/api/v1/presence_weekday/:user_id",
            get(routes::presence::presence_weekday),
        )
        .route(
            "/api/v1/presence_start_end/:user_id",
            get(routes::presence::presence_start_end),
        )
        .route("/api/v1/cache/invalidate", post(routes::cache::invalidate))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origin. `"*"` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST]),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            CorsLayer::new()
        }
    }
}
