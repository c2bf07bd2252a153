use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::achievements::{self, ActionEvent};
use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::nutrition::RecipeDetails;
use crate::state::AppState;

use super::dto::{
    IngredientResponse, RecipeDetailsResponse, RecipeListItem, SaveRecipeRequest,
};
use super::repo::{self, RecipeRow};

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RecipeListItem>>, ApiError> {
    let rows = repo::list_by_user(&state.db, auth.id).await?;
    Ok(Json(rows.into_iter().map(RecipeListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetailsResponse>, ApiError> {
    let row = repo::get(&state.db, auth.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("recipe not found"))?;
    details_response(&state, row).await.map(Json)
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetailsResponse>), ApiError> {
    let ingredients = validate(&body)?;
    let row = repo::create(&state.db, auth.id, body.name.trim(), body.total_servings, &ingredients)
        .await?;

    achievements::check_and_award(&state, auth.id, ActionEvent::RecipeCreated).await;

    let response = details_response(&state, row).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveRecipeRequest>,
) -> Result<Json<RecipeDetailsResponse>, ApiError> {
    let ingredients = validate(&body)?;
    let row = repo::update(
        &state.db,
        auth.id,
        id,
        body.name.trim(),
        body.total_servings,
        &ingredients,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("recipe not found"))?;

    details_response(&state, row).await.map(Json)
}

fn validate(body: &SaveRecipeRequest) -> Result<Vec<(Uuid, f64)>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    if body.total_servings <= 0.0 {
        return Err(ApiError::bad_request("total_servings must be positive"));
    }
    if body.ingredients.is_empty() {
        return Err(ApiError::bad_request("ingredients must not be empty"));
    }
    for ing in &body.ingredients {
        if ing.amount_grams <= 0.0 {
            return Err(ApiError::bad_request("ingredient amount_grams must be positive"));
        }
    }
    Ok(body
        .ingredients
        .iter()
        .map(|i| (i.product_id, i.amount_grams))
        .collect())
}

async fn details_response(
    state: &AppState,
    row: RecipeRow,
) -> Result<RecipeDetailsResponse, ApiError> {
    let ingredients = repo::list_ingredients(&state.db, row.id).await?;

    // Totals go through the same code path the diary aggregation uses
    let details = repo::fetch_details(&state.db, &[row.id]).await?;
    let details = details
        .get(&row.id)
        .cloned()
        .unwrap_or_else(|| RecipeDetails {
            name: row.name.clone(),
            total_servings: row.total_servings,
            total: Default::default(),
        });

    Ok(RecipeDetailsResponse {
        id: row.id,
        name: row.name,
        total_servings: row.total_servings,
        ingredients: ingredients.into_iter().map(IngredientResponse::from).collect(),
        total: details.total.into(),
        per_serving: details.per_serving().into(),
        created_at: row.created_at,
    })
}
