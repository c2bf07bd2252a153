//! Check-and-award evaluation, triggered by action events.
//!
//! The whole pass is best-effort: a failure on one definition is logged and
//! the loop moves on, and nothing ever propagates back to the request that
//! triggered the event. Awarding is idempotent via the unique constraint on
//! (user, achievement).

use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use crate::nutrition;
use crate::state::AppState;
use crate::{activities, diary, profile, recipes};

use super::repo::{self, AchievementDef};

/// What just happened; drives which criteria can newly hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    MealLogged { date: Date },
    ProfileUpdated,
    ActivityLogged { date: Date },
    RecipeCreated,
}

impl ActionEvent {
    fn date(self) -> Option<Date> {
        match self {
            Self::MealLogged { date } | Self::ActivityLogged { date } => Some(date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaType {
    FirstMealLog,
    MealsLoggedCount,
    RecipesCreatedCount,
    ProfileComplete,
    CaloriesBurnedDay,
    FirstActivityLog,
}

impl CriteriaType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_meal_log" => Some(Self::FirstMealLog),
            "meals_logged_count" => Some(Self::MealsLoggedCount),
            "recipes_created_count" => Some(Self::RecipesCreatedCount),
            "profile_complete" => Some(Self::ProfileComplete),
            "calories_burned_day" => Some(Self::CaloriesBurnedDay),
            "first_activity_log" => Some(Self::FirstActivityLog),
            _ => None,
        }
    }
}

/// Fresh lookups shared by all definitions in one pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaFacts {
    pub meals_logged: i64,
    pub recipes_created: i64,
    pub profile_complete: bool,
    pub kcal_burned_on_date: f64,
}

/// Pure decision step, separated from I/O so it is testable on its own.
pub fn criteria_met(
    criteria: CriteriaType,
    criteria_value: Option<f64>,
    event: ActionEvent,
    facts: &CriteriaFacts,
) -> bool {
    match criteria {
        CriteriaType::FirstMealLog => {
            matches!(event, ActionEvent::MealLogged { .. }) && facts.meals_logged >= 1
        }
        CriteriaType::MealsLoggedCount => {
            criteria_value.is_some_and(|v| facts.meals_logged as f64 >= v)
        }
        CriteriaType::RecipesCreatedCount => {
            criteria_value.is_some_and(|v| facts.recipes_created as f64 >= v)
        }
        CriteriaType::ProfileComplete => facts.profile_complete,
        CriteriaType::CaloriesBurnedDay => {
            matches!(event, ActionEvent::ActivityLogged { .. })
                && criteria_value.is_some_and(|v| facts.kcal_burned_on_date >= v)
        }
        CriteriaType::FirstActivityLog => matches!(event, ActionEvent::ActivityLogged { .. }),
    }
}

async fn gather_facts(
    state: &AppState,
    user_id: Uuid,
    event: ActionEvent,
) -> anyhow::Result<CriteriaFacts> {
    let meals_logged = diary::repo::count_items(&state.db, user_id).await?;
    let recipes_created = recipes::repo::count_by_user(&state.db, user_id).await?;

    let user_profile = profile::repo::fetch_user_profile(&state.db, user_id).await?;
    let profile_complete = user_profile.weight_kg.is_some()
        && user_profile.height_cm.is_some()
        && user_profile.age_years.is_some()
        && user_profile.gender.is_some()
        && user_profile.goal.is_some();

    let kcal_burned_on_date = match event.date() {
        Some(date) => {
            let rows = activities::repo::fetch_for_date(&state.db, user_id, date).await?;
            let efforts: Vec<_> = rows.iter().map(|r| r.effort()).collect();
            nutrition::exercise_kcal(&efforts, user_profile.weight_kg)
        }
        None => 0.0,
    };

    Ok(CriteriaFacts {
        meals_logged,
        recipes_created,
        profile_complete,
        kcal_burned_on_date,
    })
}

/// Evaluate every unearned definition against the event. Never fails; the
/// caller's request must not be affected by anything that happens here.
pub async fn check_and_award(state: &AppState, user_id: Uuid, event: ActionEvent) {
    let defs = match repo::fetch_unearned(&state.db, user_id).await {
        Ok(defs) => defs,
        Err(e) => {
            warn!(error = %e, %user_id, "could not load achievement definitions");
            return;
        }
    };
    if defs.is_empty() {
        return;
    }

    let facts = match gather_facts(state, user_id, event).await {
        Ok(facts) => facts,
        Err(e) => {
            warn!(error = %e, %user_id, "could not gather achievement facts");
            return;
        }
    };

    for def in defs {
        evaluate_one(state, user_id, event, &facts, &def).await;
    }
}

async fn evaluate_one(
    state: &AppState,
    user_id: Uuid,
    event: ActionEvent,
    facts: &CriteriaFacts,
    def: &AchievementDef,
) {
    let Some(criteria) = CriteriaType::parse(&def.criteria_type) else {
        warn!(code = %def.code, criteria = %def.criteria_type, "unknown criteria type, skipping");
        return;
    };
    if !criteria_met(criteria, def.criteria_value, event, facts) {
        return;
    }
    match repo::award(&state.db, user_id, def.id).await {
        Ok(true) => info!(%user_id, code = %def.code, "achievement awarded"),
        Ok(false) => {} // already earned, e.g. a concurrent request won the race
        Err(e) => warn!(error = %e, code = %def.code, "awarding failed, continuing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const MEAL: ActionEvent = ActionEvent::MealLogged {
        date: date!(2025 - 06 - 01),
    };
    const ACTIVITY: ActionEvent = ActionEvent::ActivityLogged {
        date: date!(2025 - 06 - 01),
    };

    #[test]
    fn first_meal_requires_meal_event_and_a_logged_meal() {
        let facts = CriteriaFacts {
            meals_logged: 1,
            ..CriteriaFacts::default()
        };
        assert!(criteria_met(CriteriaType::FirstMealLog, None, MEAL, &facts));
        assert!(!criteria_met(
            CriteriaType::FirstMealLog,
            None,
            ActionEvent::ProfileUpdated,
            &facts
        ));
        assert!(!criteria_met(
            CriteriaType::FirstMealLog,
            None,
            MEAL,
            &CriteriaFacts::default()
        ));
    }

    #[test]
    fn count_criteria_compare_against_value() {
        let facts = CriteriaFacts {
            recipes_created: 5,
            meals_logged: 10,
            ..CriteriaFacts::default()
        };
        assert!(criteria_met(
            CriteriaType::RecipesCreatedCount,
            Some(5.0),
            ActionEvent::RecipeCreated,
            &facts
        ));
        assert!(!criteria_met(
            CriteriaType::RecipesCreatedCount,
            Some(6.0),
            ActionEvent::RecipeCreated,
            &facts
        ));
        // A count definition without a value can never be met
        assert!(!criteria_met(
            CriteriaType::MealsLoggedCount,
            None,
            MEAL,
            &facts
        ));
    }

    #[test]
    fn calories_burned_day_is_gated_on_activity_events() {
        let facts = CriteriaFacts {
            kcal_burned_on_date: 550.0,
            ..CriteriaFacts::default()
        };
        assert!(criteria_met(
            CriteriaType::CaloriesBurnedDay,
            Some(500.0),
            ACTIVITY,
            &facts
        ));
        // A meal log on the same day must not award a burn achievement
        assert!(!criteria_met(
            CriteriaType::CaloriesBurnedDay,
            Some(500.0),
            MEAL,
            &facts
        ));
        assert!(!criteria_met(
            CriteriaType::CaloriesBurnedDay,
            Some(600.0),
            ACTIVITY,
            &facts
        ));
    }

    #[test]
    fn profile_complete_ignores_event_kind() {
        let facts = CriteriaFacts {
            profile_complete: true,
            ..CriteriaFacts::default()
        };
        for event in [MEAL, ACTIVITY, ActionEvent::ProfileUpdated, ActionEvent::RecipeCreated] {
            assert!(criteria_met(CriteriaType::ProfileComplete, None, event, &facts));
        }
    }

    #[test]
    fn unknown_criteria_types_parse_to_none() {
        assert!(CriteriaType::parse("streak_30_days").is_none());
        assert_eq!(
            CriteriaType::parse("first_meal_log"),
            Some(CriteriaType::FirstMealLog)
        );
    }

    #[test]
    fn decision_is_pure_and_repeatable() {
        // Re-evaluating with the same inputs gives the same answer; the
        // idempotence of awarding rests on the insert, not on this check.
        let facts = CriteriaFacts {
            meals_logged: 3,
            ..CriteriaFacts::default()
        };
        let first = criteria_met(CriteriaType::MealsLoggedCount, Some(3.0), MEAL, &facts);
        let second = criteria_met(CriteriaType::MealsLoggedCount, Some(3.0), MEAL, &facts);
        assert_eq!(first, second);
        assert!(first);
    }
}
