use axum::{extract::State, Json};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

use super::dto::AchievementResponse;
use super::repo;

#[instrument(skip(state))]
pub async fn list_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let rows = repo::list_with_status(&state.db, auth.id).await?;
    Ok(Json(rows.into_iter().map(AchievementResponse::from).collect()))
}
