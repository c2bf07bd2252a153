use std::collections::{BTreeMap, HashSet};

use axum::{
    extract::{Query, State},
    Json,
};
use time::Date;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::calculator::round_kcal;
use crate::dates::{format_date, parse_date};
use crate::errors::ApiError;
use crate::nutrition::{self, round1, ActivityEffort, DiaryItemRow, Nutrients, RecipeDetails};
use crate::state::AppState;
use crate::{activities, diary, profile, recipes};

use super::dto::{CaloriePoint, CalorieTrendResponse, MacroDistributionResponse, RangeQuery};

const MAX_RANGE_DAYS: i64 = 366;

struct RangeData {
    items_by_date: BTreeMap<Date, Vec<DiaryItemRow>>,
    efforts_by_date: BTreeMap<Date, Vec<ActivityEffort>>,
    recipe_details: std::collections::HashMap<Uuid, RecipeDetails>,
    weight_kg: Option<f64>,
    from: Date,
    to: Date,
}

async fn load_range(
    state: &AppState,
    user_id: Uuid,
    q: &RangeQuery,
) -> Result<RangeData, ApiError> {
    let from = parse_date(&q.from)?;
    let to = parse_date(&q.to)?;
    if from > to {
        return Err(ApiError::bad_request("'from' must not be after 'to'"));
    }
    if (to - from).whole_days() > MAX_RANGE_DAYS {
        return Err(ApiError::bad_request("range too large"));
    }

    let rows = diary::repo::fetch_range(&state.db, user_id, from, to).await?;

    let recipe_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|r| r.recipe_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let recipe_details = recipes::repo::fetch_details(&state.db, &recipe_ids).await?;

    let mut items_by_date: BTreeMap<Date, Vec<DiaryItemRow>> = BTreeMap::new();
    for row in rows {
        items_by_date.entry(row.entry_date).or_default().push(row);
    }

    let activity_rows = activities::repo::fetch_range(&state.db, user_id, from, to).await?;
    let mut efforts_by_date: BTreeMap<Date, Vec<ActivityEffort>> = BTreeMap::new();
    for row in activity_rows {
        efforts_by_date
            .entry(row.log_date)
            .or_default()
            .push(row.effort());
    }

    let weight_kg = profile::repo::fetch_user_profile(&state.db, user_id)
        .await?
        .weight_kg;

    Ok(RangeData {
        items_by_date,
        efforts_by_date,
        recipe_details,
        weight_kg,
        from,
        to,
    })
}

#[instrument(skip(state))]
pub async fn calorie_trend(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<CalorieTrendResponse>, ApiError> {
    let data = load_range(&state, auth.id, &q).await?;

    let mut points = Vec::new();
    let mut date = data.from;
    loop {
        let consumed = match data.items_by_date.get(&date) {
            Some(rows) => {
                let items = nutrition::resolve_items(rows, &data.recipe_details);
                nutrition::day_summary(&items, 0.0).kcal_consumed
            }
            None => 0.0,
        };
        let burned = data
            .efforts_by_date
            .get(&date)
            .map_or(0.0, |efforts| nutrition::exercise_kcal(efforts, data.weight_kg));

        let kcal_consumed = round_kcal(consumed);
        let kcal_burned = round_kcal(burned);
        points.push(CaloriePoint {
            date: format_date(date),
            kcal_consumed,
            kcal_burned,
            net_kcal: kcal_consumed - kcal_burned,
        });

        if date >= data.to {
            break;
        }
        let Some(next) = date.next_day() else { break };
        date = next;
    }

    Ok(Json(CalorieTrendResponse { points }))
}

#[instrument(skip(state))]
pub async fn macro_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<MacroDistributionResponse>, ApiError> {
    let data = load_range(&state, auth.id, &q).await?;

    // Same resolution path as the diary read; totals stay unrounded until
    // the response is built
    let mut total = Nutrients::default();
    for rows in data.items_by_date.values() {
        for item in nutrition::resolve_items(rows, &data.recipe_details) {
            total.add(item.nutrients);
        }
    }

    let energy = total.protein * 4.0 + total.fat * 9.0 + total.carbs * 4.0;
    let pct = |part_kcal: f64| {
        if energy > 0.0 {
            round1(part_kcal / energy * 100.0)
        } else {
            0.0
        }
    };

    Ok(Json(MacroDistributionResponse {
        kcal_consumed: round_kcal(total.kcal),
        protein_g: round1(total.protein),
        fat_g: round1(total.fat),
        carbs_g: round1(total.carbs),
        protein_pct: pct(total.protein * 4.0),
        fat_pct: pct(total.fat * 9.0),
        carbs_pct: pct(total.carbs * 4.0),
    }))
}
