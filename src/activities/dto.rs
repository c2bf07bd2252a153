use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::format_date;
use crate::nutrition;

use super::repo::{ActivityLogRow, ExerciseRow};

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub met: Option<f64>,
    pub kcal_per_minute: Option<f64>,
}

impl From<ExerciseRow> for ExerciseResponse {
    fn from(r: ExerciseRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            met: r.met,
            kcal_per_minute: r.kcal_per_minute,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogActivityRequest {
    pub exercise_id: Uuid,
    /// YYYY-MM-DD
    pub date: String,
    pub duration_min: f64,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise: Option<String>,
    pub date: String,
    pub duration_min: f64,
    pub kcal_burned: i64,
}

impl ActivityResponse {
    pub fn from_row(row: ActivityLogRow, weight_kg: Option<f64>) -> Self {
        let kcal = nutrition::exercise_kcal(&[row.effort()], weight_kg);
        Self {
            id: row.id,
            exercise_id: row.exercise_id,
            exercise: row.exercise_name,
            date: format_date(row.log_date),
            duration_min: row.duration_min,
            kcal_burned: crate::calculator::round_kcal(kcal),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub items: Vec<ActivityResponse>,
    pub kcal_burned_total: i64,
}
