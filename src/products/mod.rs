mod dto;
mod handlers;
pub mod repo;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products", post(handlers::create_product))
}
