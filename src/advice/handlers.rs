use axum::{extract::State, Json};
use rand::{rngs::StdRng, SeedableRng};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::state::AppState;

use super::dto::{AdviceItem, AdviceRequest};
use super::engine::{self, AdviceContext};

/// POST /advice
///
/// Stateless: evaluates the rule bank against the profile and diary snapshot
/// in the request body. The diary page gets the same list embedded in the
/// diary response instead of calling this.
#[instrument(skip(state, body))]
pub async fn get_advice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<AdviceRequest>,
) -> Json<Vec<AdviceItem>> {
    let facts = body.diary.into_facts();
    let ctx = AdviceContext::new(&body.profile, &facts, state.config.default_target_kcal);
    let mut rng = StdRng::from_entropy();
    Json(engine::evaluate(&ctx, &mut rng))
}
