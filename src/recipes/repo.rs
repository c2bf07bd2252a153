use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::nutrition::{Nutrients, RecipeDetails};

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub total_servings: f64,
    pub created_at: OffsetDateTime,
}

/// Ingredient with its product LEFT-joined; a deleted product leaves the
/// nutrition columns NULL.
#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
    pub product_id: Uuid,
    pub amount_grams: f64,
    pub product_name: Option<String>,
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

#[derive(Debug, FromRow)]
struct DetailsRow {
    recipe_id: Uuid,
    name: String,
    total_servings: f64,
    amount_grams: Option<f64>,
    kcal: Option<f64>,
    protein: Option<f64>,
    fat: Option<f64>,
    carbs: Option<f64>,
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<RecipeRow>> {
    let row = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, user_id, name, total_servings, created_at
         FROM recipes WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RecipeRow>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        "SELECT id, user_id, name, total_servings, created_at
         FROM recipes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_ingredients(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<IngredientRow>> {
    let rows = sqlx::query_as::<_, IngredientRow>(
        "SELECT ri.product_id, ri.amount_grams,
                p.name AS product_name, p.kcal, p.protein, p.fat, p.carbs
         FROM recipe_ingredients ri
         LEFT JOIN products p ON p.id = ri.product_id
         WHERE ri.recipe_id = $1
         ORDER BY ri.position",
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM recipes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(count.0)
}

/// Recipe totals for the aggregator, keyed by recipe id. Ingredients whose
/// product no longer exists are skipped with a warning.
pub async fn fetch_details(
    db: &PgPool,
    ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, RecipeDetails>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, DetailsRow>(
        "SELECT r.id AS recipe_id, r.name, r.total_servings,
                ri.amount_grams, p.kcal, p.protein, p.fat, p.carbs
         FROM recipes r
         LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
         LEFT JOIN products p ON p.id = ri.product_id
         WHERE r.id = ANY($1)",
    )
    .bind(ids.to_vec())
    .fetch_all(db)
    .await?;

    let mut details: HashMap<Uuid, RecipeDetails> = HashMap::new();
    for row in rows {
        let entry = details
            .entry(row.recipe_id)
            .or_insert_with(|| RecipeDetails {
                name: row.name.clone(),
                total_servings: row.total_servings,
                total: Nutrients::default(),
            });

        let Some(grams) = row.amount_grams else {
            continue; // recipe without ingredients
        };
        match (row.kcal, row.protein, row.fat, row.carbs) {
            (Some(kcal), Some(protein), Some(fat), Some(carbs)) => {
                entry.total.add(
                    Nutrients {
                        kcal,
                        protein,
                        fat,
                        carbs,
                    }
                    .scale(grams / 100.0),
                );
            }
            _ => {
                warn!(recipe = %row.recipe_id, "ingredient references missing product, skipping");
            }
        }
    }
    Ok(details)
}

/// Insert a recipe and its ingredients in one transaction.
pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    total_servings: f64,
    ingredients: &[(Uuid, f64)],
) -> anyhow::Result<RecipeRow> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, RecipeRow>(
        "INSERT INTO recipes (user_id, name, total_servings)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, name, total_servings, created_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(total_servings)
    .fetch_one(&mut *tx)
    .await?;

    for (position, (product_id, amount_grams)) in ingredients.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, product_id, amount_grams, position)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(row.id)
        .bind(product_id)
        .bind(amount_grams)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(row)
}

/// Update a recipe, replacing its ingredient list atomically.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    name: &str,
    total_servings: f64,
    ingredients: &[(Uuid, f64)],
) -> anyhow::Result<Option<RecipeRow>> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, RecipeRow>(
        "UPDATE recipes SET name = $3, total_servings = $4
         WHERE id = $1 AND user_id = $2
         RETURNING id, user_id, name, total_servings, created_at",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(total_servings)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Ok(None);
    };

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for (position, (product_id, amount_grams)) in ingredients.iter().enumerate() {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, product_id, amount_grams, position)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(product_id)
        .bind(amount_grams)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Some(row))
}
