use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{self, MeanTimeRow, PresenceRow, StartEndRow, PRESENCE_HEADER};
use crate::models::UserId;

// ── Mean time per weekday ───────────────────────────────────────

pub async fn mean_time_weekday(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<MeanTimeRow>>, ApiError> {
    let dataset = state.cache.get().await?;
    if !dataset.contains_user(user_id) {
        debug!("User {} not found!", user_id);
    }

    Ok(Json(calculate::mean_time_weekday(&dataset, user_id)))
}

// ── Total presence per weekday ──────────────────────────────────

/// A line of the presence chart: the column header, then one row per day.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PresenceLine {
    Header(&'static str, &'static str),
    Day(PresenceRow),
}

pub async fn presence_weekday(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<PresenceLine>>, ApiError> {
    let dataset = state.cache.get().await?;
    if !dataset.contains_user(user_id) {
        debug!("User {} not found!", user_id);
        return Ok(Json(Vec::new()));
    }

    let (weekday, presence) = PRESENCE_HEADER;
    let lines: Vec<PresenceLine> = std::iter::once(PresenceLine::Header(weekday, presence))
        .chain(
            calculate::presence_weekday(&dataset, user_id)
                .into_iter()
                .map(PresenceLine::Day),
        )
        .collect();

    Ok(Json(lines))
}

// ── Mean start/end per weekday ──────────────────────────────────

pub async fn presence_start_end(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<StartEndRow>>, ApiError> {
    let dataset = state.cache.get().await?;
    if !dataset.contains_user(user_id) {
        debug!("User {} not found!", user_id);
    }

    Ok(Json(calculate::presence_start_end(&dataset, user_id)))
}
