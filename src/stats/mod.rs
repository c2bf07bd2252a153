mod dto;
mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats/calories", get(handlers::calorie_trend))
        .route("/stats/macros", get(handlers::macro_distribution))
}
