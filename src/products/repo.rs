use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Nutrition is stored per 100g and never rescaled in place; scaling happens
/// in the aggregator at read time.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, kcal, protein, fat, carbs, created_by, created_at";

pub async fn list(
    db: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ProductRow>> {
    let rows = match search {
        Some(term) => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {COLUMNS} FROM products WHERE name ILIKE $1 ORDER BY name LIMIT $2 OFFSET $3"
            ))
            .bind(format!("%{term}%"))
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {COLUMNS} FROM products ORDER BY name LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?
        }
    };
    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    kcal: f64,
    protein: f64,
    fat: f64,
    carbs: f64,
    created_by: Uuid,
) -> anyhow::Result<ProductRow> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r#"
        INSERT INTO products (name, kcal, protein, fat, carbs, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(name)
    .bind(kcal)
    .bind(protein)
    .bind(fat)
    .bind(carbs)
    .bind(created_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}
