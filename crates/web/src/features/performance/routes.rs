use axum::{Router, middleware, routing::get};

use super::handlers::{exercise_history, get_performance, list_performances};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_performances))
        .route("/:exercise_id", get(get_performance))
        .route("/:exercise_id/history", get(exercise_history))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
