pub mod dto;
pub mod engine;
mod handlers;
mod rules;

use axum::{routing::post, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/advice", post(handlers::get_advice))
}
