use serde::{Deserialize, Serialize};

use crate::calculator::UserProfile;
use super::engine::DayFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceKind {
    Warning,
    Suggestion,
    Praise,
    Info,
}

/// One rendered advice entry. Priority 1 is the most urgent.
#[derive(Debug, Clone, Serialize)]
pub struct AdviceItem {
    pub id: &'static str,
    pub kind: AdviceKind,
    pub priority: u8,
    pub text: String,
}

/// Body of `POST /advice`: a profile plus a diary snapshot.
#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub diary: DiarySnapshot,
}

/// Client-supplied day numbers. `net_kcal` is always recomputed server-side
/// as consumed minus burned, so clients cannot drift from the canonical
/// summary schema.
#[derive(Debug, Default, Deserialize)]
pub struct DiarySnapshot {
    #[serde(default)]
    pub kcal_consumed: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub kcal_burned: f64,
    #[serde(default)]
    pub breakfast_kcal: f64,
    #[serde(default)]
    pub lunch_kcal: f64,
    #[serde(default)]
    pub dinner_kcal: f64,
    #[serde(default)]
    pub snack_kcal: f64,
    #[serde(default)]
    pub item_count: usize,
}

impl DiarySnapshot {
    pub fn into_facts(self) -> DayFacts {
        DayFacts {
            kcal_consumed: self.kcal_consumed,
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
            kcal_burned: self.kcal_burned,
            net_kcal: self.kcal_consumed - self.kcal_burned,
            slot_kcal: [
                self.breakfast_kcal,
                self.lunch_kcal,
                self.dinner_kcal,
                self.snack_kcal,
            ],
            item_count: self.item_count,
        }
    }
}
