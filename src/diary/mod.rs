mod dto;
mod handlers;
pub mod repo;
mod services;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/diary", get(handlers::get_day))
        .route("/diary/items", post(handlers::add_item))
        .route("/diary/items/:id", delete(handlers::delete_item))
}
