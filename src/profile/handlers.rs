use axum::{extract::State, Json};
use tracing::instrument;

use crate::achievements::{self, ActionEvent};
use crate::auth::AuthUser;
use crate::calculator::{self, ActivityLevel, BmrFormula, Gender, Goal};
use crate::errors::ApiError;
use crate::state::AppState;

use super::dto::{ProfileResponse, PutProfileRequest};
use super::repo;

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = repo::get(&state.db, auth.id).await?;
    let profile = row
        .as_ref()
        .map(|r| r.to_profile())
        .unwrap_or_default();
    let targets = calculator::calculate(&profile);
    Ok(Json(ProfileResponse::from_row(row, targets)))
}

#[instrument(skip(state, body))]
pub async fn put_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PutProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    validate(&body)?;

    let row = repo::upsert(
        &state.db,
        auth.id,
        body.weight_kg,
        body.height_cm,
        body.age_years,
        body.gender.as_deref(),
        body.activity_level.as_deref(),
        body.goal.as_deref(),
        body.bmr_formula.as_deref(),
        body.body_fat_pct,
        body.target_kcal_override,
    )
    .await?;

    achievements::check_and_award(&state, auth.id, ActionEvent::ProfileUpdated).await;

    let targets = calculator::calculate(&row.to_profile());
    Ok(Json(ProfileResponse::from_row(Some(row), targets)))
}

fn validate(body: &PutProfileRequest) -> Result<(), ApiError> {
    if body.weight_kg.is_some_and(|v| v <= 0.0) {
        return Err(ApiError::bad_request("weight_kg must be positive"));
    }
    if body.height_cm.is_some_and(|v| v <= 0.0) {
        return Err(ApiError::bad_request("height_cm must be positive"));
    }
    if body.age_years.is_some_and(|v| v <= 0) {
        return Err(ApiError::bad_request("age_years must be positive"));
    }
    if body.body_fat_pct.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
        return Err(ApiError::bad_request("body_fat_pct must be within 0..100"));
    }
    if body.target_kcal_override.is_some_and(|v| v <= 0) {
        return Err(ApiError::bad_request("target_kcal_override must be positive"));
    }
    if let Some(g) = body.gender.as_deref() {
        Gender::parse(g).ok_or_else(|| ApiError::bad_request("unknown gender"))?;
    }
    if let Some(a) = body.activity_level.as_deref() {
        ActivityLevel::parse(a).ok_or_else(|| ApiError::bad_request("unknown activity_level"))?;
    }
    if let Some(g) = body.goal.as_deref() {
        Goal::parse(g).ok_or_else(|| ApiError::bad_request("unknown goal"))?;
    }
    if let Some(f) = body.bmr_formula.as_deref() {
        BmrFormula::parse(f).ok_or_else(|| ApiError::bad_request("unknown bmr_formula"))?;
    }
    Ok(())
}
