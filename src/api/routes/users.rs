use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Dataset, UserId};

#[derive(Debug, Serialize)]
pub struct UserEntry {
    pub user_id: UserId,
    pub name: String,
}

/// Listing entries for every user in the dataset, ordered by id.
pub fn user_entries(dataset: &Dataset) -> Vec<UserEntry> {
    dataset
        .user_ids()
        .map(|user_id| UserEntry {
            user_id,
            name: format!("User {}", user_id),
        })
        .collect()
}

/// Users present in the log, for the user picker.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserEntry>>, ApiError> {
    let dataset = state.cache.get().await?;
    Ok(Json(user_entries(&dataset)))
}
