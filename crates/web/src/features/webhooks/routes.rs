use axum::{Router, routing::post};

use super::handlers::identity_webhook;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/identity", post(identity_webhook))
}
