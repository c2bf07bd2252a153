mod dto;
mod evaluator;
mod handlers;
pub mod repo;

use axum::{routing::get, Router};

use crate::state::AppState;

pub use evaluator::{check_and_award, ActionEvent};

pub fn router() -> Router<AppState> {
    Router::new().route("/achievements", get(handlers::list_achievements))
}
