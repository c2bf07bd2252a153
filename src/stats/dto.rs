use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// YYYY-MM-DD
    pub from: String,
    /// YYYY-MM-DD
    pub to: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CaloriePoint {
    pub date: String,
    pub kcal_consumed: i64,
    pub kcal_burned: i64,
    pub net_kcal: i64,
}

#[derive(Debug, Serialize)]
pub struct CalorieTrendResponse {
    pub points: Vec<CaloriePoint>,
}

/// Macro totals over the range plus their share of consumed energy.
#[derive(Debug, Serialize)]
pub struct MacroDistributionResponse {
    pub kcal_consumed: i64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub carbs_pct: f64,
}
