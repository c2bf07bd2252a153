use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::achievements::{self, ActionEvent};
use crate::auth::AuthUser;
use crate::dates::parse_date;
use crate::errors::ApiError;
use crate::nutrition;
use crate::profile;
use crate::state::AppState;

use super::dto::{
    ActivityListResponse, ActivityResponse, DateQuery, ExerciseResponse, LogActivityRequest,
};
use super::repo;

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    let rows = repo::list_exercises(&state.db).await?;
    Ok(Json(rows.into_iter().map(ExerciseResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<DateQuery>,
) -> Result<Json<ActivityListResponse>, ApiError> {
    let date = parse_date(&q.date)?;
    let rows = repo::fetch_for_date(&state.db, auth.id, date).await?;
    let weight_kg = profile::repo::fetch_user_profile(&state.db, auth.id)
        .await?
        .weight_kg;

    let efforts: Vec<_> = rows.iter().map(|r| r.effort()).collect();
    let total = nutrition::exercise_kcal(&efforts, weight_kg);

    Ok(Json(ActivityListResponse {
        items: rows
            .into_iter()
            .map(|r| ActivityResponse::from_row(r, weight_kg))
            .collect(),
        kcal_burned_total: crate::calculator::round_kcal(total),
    }))
}

#[instrument(skip(state, body))]
pub async fn log_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<LogActivityRequest>,
) -> Result<(StatusCode, Json<ActivityResponse>), ApiError> {
    let date = parse_date(&body.date)?;
    if body.duration_min <= 0.0 {
        return Err(ApiError::bad_request("duration_min must be positive"));
    }
    if !repo::exercise_exists(&state.db, body.exercise_id).await? {
        return Err(ApiError::bad_request("unknown exercise_id"));
    }

    let row = repo::insert(&state.db, auth.id, body.exercise_id, date, body.duration_min).await?;

    achievements::check_and_award(&state, auth.id, ActionEvent::ActivityLogged { date }).await;

    let weight_kg = profile::repo::fetch_user_profile(&state.db, auth.id)
        .await?
        .weight_kg;
    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse::from_row(row, weight_kg)),
    ))
}
