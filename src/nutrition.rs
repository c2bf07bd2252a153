//! Shared nutrition aggregation.
//!
//! Every consumer of per-day numbers (diary read, calorie trend, macro
//! distribution) goes through this module, so the recipe serving-ratio math
//! and the rounding rules exist exactly once. Values stay unrounded while
//! they are being summed; rounding is applied only when a DTO is built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Nutrients {
    pub fn scale(self, factor: f64) -> Self {
        Self {
            kcal: self.kcal * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
        }
    }

    pub fn add(&mut self, other: Nutrients) {
        self.kcal += other.kcal;
        self.protein += other.protein;
        self.fat += other.fat;
        self.carbs += other.carbs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Breakfast => 0,
            Self::Lunch => 1,
            Self::Dinner => 2,
            Self::Snack => 3,
        }
    }
}

/// One diary row as fetched from the database, product nutrition LEFT-joined.
/// A row references a product (grams) or a recipe (servings), never both.
#[derive(Debug, Clone)]
pub struct DiaryItemRow {
    pub id: Uuid,
    pub entry_date: Date,
    pub slot: MealSlot,
    pub product_id: Option<Uuid>,
    pub amount_grams: Option<f64>,
    pub recipe_id: Option<Uuid>,
    pub servings: Option<f64>,
    pub product_name: Option<String>,
    pub product_per_100g: Option<Nutrients>,
}

/// Recipe totals computed from its ingredients, keyed by recipe id.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub name: String,
    pub total_servings: f64,
    pub total: Nutrients,
}

impl RecipeDetails {
    /// Nutrition of one serving. Zero when `total_servings` is not positive.
    pub fn per_serving(&self) -> Nutrients {
        if self.total_servings > 0.0 {
            self.total.scale(1.0 / self.total_servings)
        } else {
            Nutrients::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Recipe,
}

/// A diary row with its nutrition resolved, still unrounded.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub id: Uuid,
    pub slot: MealSlot,
    pub kind: ItemKind,
    pub label: String,
    pub amount_grams: Option<f64>,
    pub servings: Option<f64>,
    pub nutrients: Nutrients,
}

/// Canonical per-day summary: `net_kcal = kcal_consumed - kcal_burned`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaySummary {
    pub kcal_consumed: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal_burned: f64,
    pub net_kcal: f64,
}

/// Resolve diary rows against joined product data and fetched recipe details.
/// Dangling references are skipped with a warning rather than failing the
/// whole day.
pub fn resolve_items(
    rows: &[DiaryItemRow],
    recipes: &HashMap<Uuid, RecipeDetails>,
) -> Vec<ResolvedItem> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let resolved = match (row.product_id, row.recipe_id) {
            (Some(product_id), None) => resolve_product(row, product_id),
            (None, Some(recipe_id)) => resolve_recipe(row, recipe_id, recipes),
            _ => {
                warn!(item = %row.id, "diary item has no usable reference, skipping");
                None
            }
        };
        if let Some(item) = resolved {
            out.push(item);
        }
    }
    out
}

fn resolve_product(row: &DiaryItemRow, product_id: Uuid) -> Option<ResolvedItem> {
    let Some(per_100g) = row.product_per_100g else {
        warn!(item = %row.id, %product_id, "dangling product reference, skipping");
        return None;
    };
    let grams = row.amount_grams.unwrap_or(0.0).max(0.0);
    Some(ResolvedItem {
        id: row.id,
        slot: row.slot,
        kind: ItemKind::Product,
        label: row.product_name.clone().unwrap_or_default(),
        amount_grams: Some(grams),
        servings: None,
        nutrients: per_100g.scale(grams / 100.0),
    })
}

fn resolve_recipe(
    row: &DiaryItemRow,
    recipe_id: Uuid,
    recipes: &HashMap<Uuid, RecipeDetails>,
) -> Option<ResolvedItem> {
    let Some(details) = recipes.get(&recipe_id) else {
        warn!(item = %row.id, %recipe_id, "dangling recipe reference, skipping");
        return None;
    };
    let servings = row.servings.unwrap_or(0.0).max(0.0);
    // total_servings <= 0 would divide by zero; such a recipe contributes nothing
    let nutrients = if details.total_servings > 0.0 {
        details.total.scale(servings / details.total_servings)
    } else {
        Nutrients::default()
    };
    Some(ResolvedItem {
        id: row.id,
        slot: row.slot,
        kind: ItemKind::Recipe,
        label: details.name.clone(),
        amount_grams: None,
        servings: Some(servings),
        nutrients,
    })
}

/// Sum resolved items and exercise burn into the canonical day summary.
pub fn day_summary(items: &[ResolvedItem], kcal_burned: f64) -> DaySummary {
    let mut consumed = Nutrients::default();
    for item in items {
        consumed.add(item.nutrients);
    }
    DaySummary {
        kcal_consumed: consumed.kcal,
        protein: consumed.protein,
        fat: consumed.fat,
        carbs: consumed.carbs,
        kcal_burned,
        net_kcal: consumed.kcal - kcal_burned,
    }
}

/// Per-slot kcal totals in slot order (breakfast, lunch, dinner, snack).
pub fn kcal_by_slot(items: &[ResolvedItem]) -> [f64; 4] {
    let mut slots = [0.0; 4];
    for item in items {
        slots[item.slot.index()] += item.nutrients.kcal;
    }
    slots
}

/// What an activity log contributes to energy expenditure.
#[derive(Debug, Clone, Copy)]
pub struct ActivityEffort {
    pub duration_min: f64,
    pub met: Option<f64>,
    pub kcal_per_minute: Option<f64>,
}

/// Calories burned across activity logs. MET-based when the exercise carries
/// a MET value and the user's weight is known, otherwise the exercise's flat
/// kcal-per-minute rate.
pub fn exercise_kcal(efforts: &[ActivityEffort], weight_kg: Option<f64>) -> f64 {
    efforts
        .iter()
        .map(|e| match (e.met, weight_kg) {
            (Some(met), Some(w)) => met * w * (e.duration_min / 60.0),
            _ => e.kcal_per_minute.unwrap_or(0.0) * e.duration_min,
        })
        .sum()
}

/// One-decimal rounding for displayed macro grams.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Display form of [`Nutrients`]: kcal to the nearest integer, macros to one
/// decimal. Built only at the response boundary.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NutrientsDto {
    pub kcal: i64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl From<Nutrients> for NutrientsDto {
    fn from(n: Nutrients) -> Self {
        Self {
            kcal: crate::calculator::round_kcal(n.kcal),
            protein: round1(n.protein),
            fat: round1(n.fat),
            carbs: round1(n.carbs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn product_row(grams: f64, per_100g: Nutrients) -> DiaryItemRow {
        DiaryItemRow {
            id: Uuid::new_v4(),
            entry_date: date!(2025 - 06 - 01),
            slot: MealSlot::Lunch,
            product_id: Some(Uuid::new_v4()),
            amount_grams: Some(grams),
            recipe_id: None,
            servings: None,
            product_name: Some("test product".into()),
            product_per_100g: Some(per_100g),
        }
    }

    fn recipe_row(recipe_id: Uuid, servings: f64) -> DiaryItemRow {
        DiaryItemRow {
            id: Uuid::new_v4(),
            entry_date: date!(2025 - 06 - 01),
            slot: MealSlot::Dinner,
            product_id: None,
            amount_grams: None,
            recipe_id: Some(recipe_id),
            servings: Some(servings),
            product_name: None,
            product_per_100g: None,
        }
    }

    fn kcal_only(kcal: f64) -> Nutrients {
        Nutrients {
            kcal,
            ..Nutrients::default()
        }
    }

    #[test]
    fn product_item_scales_per_100g() {
        let rows = [product_row(
            150.0,
            Nutrients {
                kcal: 100.0,
                protein: 10.0,
                fat: 4.0,
                carbs: 12.0,
            },
        )];
        let items = resolve_items(&rows, &HashMap::new());
        assert_eq!(items.len(), 1);
        let n = items[0].nutrients;
        assert!((n.kcal - 150.0).abs() < 1e-9);
        assert!((n.protein - 15.0).abs() < 1e-9);
        assert!((n.fat - 6.0).abs() < 1e-9);
        assert!((n.carbs - 18.0).abs() < 1e-9);
    }

    #[test]
    fn recipe_item_uses_serving_ratio() {
        // 200g of a 50kcal/100g ingredient = 100 kcal total, 2 servings,
        // one serving consumed -> 50 kcal
        let recipe_id = Uuid::new_v4();
        let mut recipes = HashMap::new();
        recipes.insert(
            recipe_id,
            RecipeDetails {
                name: "soup".into(),
                total_servings: 2.0,
                total: kcal_only(100.0),
            },
        );

        let rows = [recipe_row(recipe_id, 1.0)];
        let items = resolve_items(&rows, &recipes);
        assert_eq!(items.len(), 1);
        assert!((items[0].nutrients.kcal - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_servings_contributes_nothing() {
        let recipe_id = Uuid::new_v4();
        let mut recipes = HashMap::new();
        recipes.insert(
            recipe_id,
            RecipeDetails {
                name: "broken".into(),
                total_servings: 0.0,
                total: kcal_only(500.0),
            },
        );

        let items = resolve_items(&[recipe_row(recipe_id, 3.0)], &recipes);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].nutrients.kcal, 0.0);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let mut dangling_product = product_row(100.0, Nutrients::default());
        dangling_product.product_per_100g = None;
        dangling_product.product_name = None;

        let dangling_recipe = recipe_row(Uuid::new_v4(), 1.0);

        let items = resolve_items(&[dangling_product, dangling_recipe], &HashMap::new());
        assert!(items.is_empty());
    }

    #[test]
    fn summary_sums_items_and_subtracts_burn() {
        let rows = [
            product_row(100.0, kcal_only(150.0)),
            product_row(100.0, kcal_only(250.0)),
        ];
        let items = resolve_items(&rows, &HashMap::new());
        let summary = day_summary(&items, 120.0);
        assert!((summary.kcal_consumed - 400.0).abs() < 1e-9);
        assert!((summary.net_kcal - 280.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_happens_once_at_output() {
        // Three items of 100.4 kcal: per-item display rounds to 100 each, but
        // the summary must round the unrounded sum (301.2 -> 301, not 300).
        let rows = vec![product_row(100.0, kcal_only(100.4)); 3];
        let items = resolve_items(&rows, &HashMap::new());
        let summary = day_summary(&items, 0.0);
        assert_eq!(crate::calculator::round_kcal(summary.kcal_consumed), 301);
    }

    #[test]
    fn exercise_kcal_prefers_met_when_weight_known() {
        let efforts = [ActivityEffort {
            duration_min: 30.0,
            met: Some(8.0),
            kcal_per_minute: Some(10.0),
        }];
        // MET path: 8 * 70 * 0.5 = 280
        assert!((exercise_kcal(&efforts, Some(70.0)) - 280.0).abs() < 1e-9);
        // No weight -> flat rate: 10 * 30 = 300
        assert!((exercise_kcal(&efforts, None) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn exercise_kcal_without_any_rate_is_zero() {
        let efforts = [ActivityEffort {
            duration_min: 45.0,
            met: None,
            kcal_per_minute: None,
        }];
        assert_eq!(exercise_kcal(&efforts, Some(80.0)), 0.0);
    }

    #[test]
    fn kcal_by_slot_groups_in_slot_order() {
        let mut breakfast = product_row(100.0, kcal_only(200.0));
        breakfast.slot = MealSlot::Breakfast;
        let lunch = product_row(100.0, kcal_only(300.0));

        let items = resolve_items(&[breakfast, lunch], &HashMap::new());
        let slots = kcal_by_slot(&items);
        assert!((slots[0] - 200.0).abs() < 1e-9);
        assert!((slots[1] - 300.0).abs() < 1e-9);
        assert_eq!(slots[2], 0.0);
        assert_eq!(slots[3], 0.0);
    }
}
