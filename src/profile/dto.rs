use serde::{Deserialize, Serialize};

use crate::calculator::{round_kcal, CalorieTargets};

use super::repo_types::ProfileRow;

#[derive(Debug, Deserialize)]
pub struct PutProfileRequest {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub bmr_formula: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub target_kcal_override: Option<i32>,
}

/// Profile plus calculator output, kcal rounded at this boundary.
/// Null calculated fields mean "cannot compute, show N/A".
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub bmr_formula: Option<String>,
    pub body_fat_pct: Option<f64>,
    pub target_kcal_override: Option<i32>,
    pub bmr: Option<i64>,
    pub tdee: Option<i64>,
    pub target_kcal: Option<i64>,
}

impl ProfileResponse {
    pub fn from_row(row: Option<ProfileRow>, targets: CalorieTargets) -> Self {
        let row = row.as_ref();
        Self {
            weight_kg: row.and_then(|r| r.weight_kg),
            height_cm: row.and_then(|r| r.height_cm),
            age_years: row.and_then(|r| r.age_years),
            gender: row.and_then(|r| r.gender.clone()),
            activity_level: row.and_then(|r| r.activity_level.clone()),
            goal: row.and_then(|r| r.goal.clone()),
            bmr_formula: row.and_then(|r| r.bmr_formula.clone()),
            body_fat_pct: row.and_then(|r| r.body_fat_pct),
            target_kcal_override: row.and_then(|r| r.target_kcal_override),
            bmr: targets.bmr.map(round_kcal),
            tdee: targets.tdee.map(round_kcal),
            target_kcal: targets.target_kcal.map(round_kcal),
        }
    }
}
