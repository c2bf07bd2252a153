use std::collections::HashSet;

use time::Date;
use uuid::Uuid;

use crate::calculator::UserProfile;
use crate::nutrition::{self, DaySummary, ResolvedItem};
use crate::state::AppState;
use crate::{activities, profile, recipes};

use super::repo;

/// Everything needed to render one diary day. Recomputed on every read.
pub struct DayView {
    pub profile: UserProfile,
    pub items: Vec<ResolvedItem>,
    pub summary: DaySummary,
}

pub async fn load_day(state: &AppState, user_id: Uuid, date: Date) -> anyhow::Result<DayView> {
    let rows = repo::fetch_day(&state.db, user_id, date).await?;

    let recipe_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|r| r.recipe_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let recipe_details = recipes::repo::fetch_details(&state.db, &recipe_ids).await?;

    let items = nutrition::resolve_items(&rows, &recipe_details);

    let user_profile = profile::repo::fetch_user_profile(&state.db, user_id).await?;

    let activity_rows = activities::repo::fetch_for_date(&state.db, user_id, date).await?;
    let efforts: Vec<_> = activity_rows.iter().map(|r| r.effort()).collect();
    let kcal_burned = nutrition::exercise_kcal(&efforts, user_profile.weight_kg);

    let summary = nutrition::day_summary(&items, kcal_burned);

    Ok(DayView {
        profile: user_profile,
        items,
        summary,
    })
}
