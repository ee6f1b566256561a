use axum::{Router, middleware, routing::get};

use super::handlers::{create_exercise, get_exercise, list_exercises};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/:id", get(get_exercise))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
