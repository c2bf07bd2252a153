use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::ProductRow;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    20
}

/// Per-100g nutrition values.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub created_at: OffsetDateTime,
}

impl From<ProductRow> for ProductResponse {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            kcal: r.kcal,
            protein: r.protein,
            fat: r.fat,
            carbs: r.carbs,
            created_at: r.created_at,
        }
    }
}
