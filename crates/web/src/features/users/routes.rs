use axum::{
    Router, middleware,
    routing::{get, patch},
};

use super::handlers::{get_me, list_body_weight, log_body_weight, update_preferences};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/preferences", patch(update_preferences))
        .route("/me/body-weight", get(list_body_weight).post(log_body_weight))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
