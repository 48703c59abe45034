use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub invalidated: bool,
}

/// Drop the cached dataset; the next request reparses the log.
pub async fn invalidate(State(state): State<AppState>) -> Json<InvalidateResponse> {
    state.cache.invalidate().await;
    Json(InvalidateResponse { invalidated: true })
}
