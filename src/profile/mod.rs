mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::get_profile))
        .route("/profile", put(handlers::put_profile))
}
