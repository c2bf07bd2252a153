use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advice::dto::AdviceItem;
use crate::calculator::round_kcal;
use crate::nutrition::{round1, DaySummary, ItemKind, MealSlot, NutrientsDto, ResolvedItem};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// YYYY-MM-DD
    pub date: String,
}

/// A diary item is a product reference (grams) or a recipe reference
/// (servings), never both.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// YYYY-MM-DD
    pub date: String,
    pub meal: String,
    pub product_id: Option<Uuid>,
    pub amount_grams: Option<f64>,
    pub recipe_id: Option<Uuid>,
    pub servings: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ItemDto {
    pub id: Uuid,
    pub kind: ItemKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_grams: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
    pub nutrition: NutrientsDto,
}

impl From<&ResolvedItem> for ItemDto {
    fn from(item: &ResolvedItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            label: item.label.clone(),
            amount_grams: item.amount_grams,
            servings: item.servings,
            nutrition: item.nutrients.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct MealDto {
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Default, Serialize)]
pub struct MealsDto {
    pub breakfast: MealDto,
    pub lunch: MealDto,
    pub dinner: MealDto,
    pub snack: MealDto,
}

impl MealsDto {
    pub fn from_items(items: &[ResolvedItem]) -> Self {
        let mut meals = Self::default();
        for item in items {
            let slot = match item.slot {
                MealSlot::Breakfast => &mut meals.breakfast,
                MealSlot::Lunch => &mut meals.lunch,
                MealSlot::Dinner => &mut meals.dinner,
                MealSlot::Snack => &mut meals.snack,
            };
            slot.items.push(ItemDto::from(item));
        }
        meals
    }
}

/// Canonical summary schema. `net_kcal` is derived from the two rounded
/// kcal figures so the displayed arithmetic always adds up.
#[derive(Debug, Serialize)]
pub struct SummaryDto {
    pub kcal_consumed: i64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal_burned: i64,
    pub net_kcal: i64,
}

impl From<&DaySummary> for SummaryDto {
    fn from(s: &DaySummary) -> Self {
        let kcal_consumed = round_kcal(s.kcal_consumed);
        let kcal_burned = round_kcal(s.kcal_burned);
        Self {
            kcal_consumed,
            protein: round1(s.protein),
            fat: round1(s.fat),
            carbs: round1(s.carbs),
            kcal_burned,
            net_kcal: kcal_consumed - kcal_burned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub meals: MealsDto,
    pub summary: SummaryDto,
    pub advice: Vec<AdviceItem>,
}
