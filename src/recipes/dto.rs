use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::NutrientsDto;

use super::repo::{IngredientRow, RecipeRow};

#[derive(Debug, Deserialize)]
pub struct IngredientInput {
    pub product_id: Uuid,
    pub amount_grams: f64,
}

#[derive(Debug, Deserialize)]
pub struct SaveRecipeRequest {
    pub name: String,
    pub total_servings: f64,
    pub ingredients: Vec<IngredientInput>,
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub product_id: Uuid,
    pub name: Option<String>,
    pub amount_grams: f64,
}

impl From<IngredientRow> for IngredientResponse {
    fn from(r: IngredientRow) -> Self {
        Self {
            product_id: r.product_id,
            name: r.product_name,
            amount_grams: r.amount_grams,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub name: String,
    pub total_servings: f64,
    pub created_at: OffsetDateTime,
}

impl From<RecipeRow> for RecipeListItem {
    fn from(r: RecipeRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            total_servings: r.total_servings,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub total_servings: f64,
    pub ingredients: Vec<IngredientResponse>,
    pub total: NutrientsDto,
    pub per_serving: NutrientsDto,
    pub created_at: OffsetDateTime,
}
