mod dto;
mod handlers;
pub mod repo;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(handlers::list_recipes))
        .route("/recipes", post(handlers::create_recipe))
        .route("/recipes/:id", get(handlers::get_recipe))
        .route("/recipes/:id", put(handlers::update_recipe))
}
