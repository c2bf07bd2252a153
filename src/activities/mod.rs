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
        .route("/exercises", get(handlers::list_exercises))
        .route("/activities", get(handlers::list_activities))
        .route("/activities", post(handlers::log_activity))
}
