use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::instrument;
use uuid::Uuid;

use crate::achievements::{self, ActionEvent};
use crate::advice::engine::{self, AdviceContext, DayFacts};
use crate::auth::AuthUser;
use crate::dates::{format_date, parse_date};
use crate::errors::ApiError;
use crate::nutrition::MealSlot;
use crate::state::AppState;

use super::dto::{AddItemRequest, DayQuery, DayResponse, MealsDto, SummaryDto};
use super::{repo, services};

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayResponse>, ApiError> {
    let date = parse_date(&q.date)?;
    day_response(&state, auth.id, date).await.map(Json)
}

#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<DayResponse>), ApiError> {
    let date = parse_date(&body.date)?;
    let slot = MealSlot::parse(&body.meal)
        .ok_or_else(|| ApiError::bad_request("meal must be breakfast, lunch, dinner or snack"))?;

    match (body.product_id, body.recipe_id) {
        (Some(_), Some(_)) => {
            return Err(ApiError::bad_request(
                "an item references a product or a recipe, not both",
            ))
        }
        (None, None) => {
            return Err(ApiError::bad_request(
                "either product_id or recipe_id is required",
            ))
        }
        (Some(_), None) => {
            if !body.amount_grams.is_some_and(|g| g > 0.0) {
                return Err(ApiError::bad_request("amount_grams must be positive"));
            }
        }
        (None, Some(_)) => {
            if !body.servings.is_some_and(|s| s > 0.0) {
                return Err(ApiError::bad_request("servings must be positive"));
            }
        }
    }

    repo::insert_item(
        &state.db,
        auth.id,
        date,
        slot,
        body.product_id,
        body.amount_grams.filter(|_| body.product_id.is_some()),
        body.recipe_id,
        body.servings.filter(|_| body.recipe_id.is_some()),
    )
    .await?;

    achievements::check_and_award(&state, auth.id, ActionEvent::MealLogged { date }).await;

    let response = day_response(&state, auth.id, date).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete_item(&state.db, auth.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("diary item not found"))
    }
}

async fn day_response(
    state: &AppState,
    user_id: Uuid,
    date: time::Date,
) -> Result<DayResponse, ApiError> {
    let view = services::load_day(state, user_id, date).await?;

    let facts = DayFacts::from_resolved(&view.summary, &view.items);
    let ctx = AdviceContext::new(&view.profile, &facts, state.config.default_target_kcal);
    let mut rng = StdRng::from_entropy();
    let advice = engine::evaluate(&ctx, &mut rng);

    Ok(DayResponse {
        date: format_date(date),
        meals: MealsDto::from_items(&view.items),
        summary: SummaryDto::from(&view.summary),
        advice,
    })
}
