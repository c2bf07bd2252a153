use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::state::AppState;

use super::dto::{CreateProductRequest, Pagination, ProductResponse};
use super::repo;

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let limit = p.limit.clamp(1, 100);
    let rows = repo::list(&state.db, p.search.as_deref(), limit, p.offset.max(0)).await?;
    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    for (label, v) in [
        ("kcal", body.kcal),
        ("protein", body.protein),
        ("fat", body.fat),
        ("carbs", body.carbs),
    ] {
        if !(0.0..=10_000.0).contains(&v) {
            return Err(ApiError::bad_request(format!("{label} out of range")));
        }
    }

    let row = repo::create(
        &state.db,
        body.name.trim(),
        body.kcal,
        body.protein,
        body.fat,
        body.carbs,
        auth.id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(row))))
}
