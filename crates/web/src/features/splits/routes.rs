use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{add_exercises, create_split, get_split, list_splits};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_splits).post(create_split))
        .route("/:id", get(get_split))
        .route("/:id/exercises", post(add_exercises))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
