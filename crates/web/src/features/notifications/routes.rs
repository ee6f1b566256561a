use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{list_subscriptions, send_notification, subscribe, unsubscribe};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(subscribe).delete(unsubscribe),
        )
        .route("/send", post(send_notification))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
