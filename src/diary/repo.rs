use sqlx::{FromRow, PgPool};
use time::Date;
use tracing::warn;
use uuid::Uuid;

use crate::nutrition::{DiaryItemRow, MealSlot, Nutrients};

/// Raw row shape; converted into [`DiaryItemRow`] for the aggregator.
#[derive(Debug, FromRow)]
struct DbRow {
    id: Uuid,
    entry_date: Date,
    meal_slot: String,
    product_id: Option<Uuid>,
    amount_grams: Option<f64>,
    recipe_id: Option<Uuid>,
    servings: Option<f64>,
    product_name: Option<String>,
    p_kcal: Option<f64>,
    p_protein: Option<f64>,
    p_fat: Option<f64>,
    p_carbs: Option<f64>,
}

impl DbRow {
    fn into_item(self) -> Option<DiaryItemRow> {
        let Some(slot) = MealSlot::parse(&self.meal_slot) else {
            warn!(item = %self.id, slot = %self.meal_slot, "unknown meal slot, skipping");
            return None;
        };
        let per_100g = match (self.p_kcal, self.p_protein, self.p_fat, self.p_carbs) {
            (Some(kcal), Some(protein), Some(fat), Some(carbs)) => Some(Nutrients {
                kcal,
                protein,
                fat,
                carbs,
            }),
            _ => None,
        };
        Some(DiaryItemRow {
            id: self.id,
            entry_date: self.entry_date,
            slot,
            product_id: self.product_id,
            amount_grams: self.amount_grams,
            recipe_id: self.recipe_id,
            servings: self.servings,
            product_name: self.product_name,
            product_per_100g: per_100g,
        })
    }
}

const COLUMNS: &str = "d.id, d.entry_date, d.meal_slot, d.product_id, d.amount_grams, \
                       d.recipe_id, d.servings, p.name AS product_name, \
                       p.kcal AS p_kcal, p.protein AS p_protein, p.fat AS p_fat, p.carbs AS p_carbs";

pub async fn fetch_day(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<DiaryItemRow>> {
    let rows = sqlx::query_as::<_, DbRow>(&format!(
        "SELECT {COLUMNS}
         FROM diary_entries d
         LEFT JOIN products p ON p.id = d.product_id
         WHERE d.user_id = $1 AND d.entry_date = $2
         ORDER BY d.created_at",
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().filter_map(DbRow::into_item).collect())
}

pub async fn fetch_range(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> anyhow::Result<Vec<DiaryItemRow>> {
    let rows = sqlx::query_as::<_, DbRow>(&format!(
        "SELECT {COLUMNS}
         FROM diary_entries d
         LEFT JOIN products p ON p.id = d.product_id
         WHERE d.user_id = $1 AND d.entry_date BETWEEN $2 AND $3
         ORDER BY d.entry_date, d.created_at",
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().filter_map(DbRow::into_item).collect())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_item(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    slot: MealSlot,
    product_id: Option<Uuid>,
    amount_grams: Option<f64>,
    recipe_id: Option<Uuid>,
    servings: Option<f64>,
) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO diary_entries
            (user_id, entry_date, meal_slot, product_id, amount_grams, recipe_id, servings)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(user_id)
    .bind(date)
    .bind(slot.as_str())
    .bind(product_id)
    .bind(amount_grams)
    .bind(recipe_id)
    .bind(servings)
    .fetch_one(db)
    .await?;
    Ok(row.0)
}

pub async fn delete_item(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM diary_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_items(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM diary_entries WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(count.0)
}
