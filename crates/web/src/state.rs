use std::sync::Arc;

use axum::extract::FromRef;
use storage::Database;

use crate::features::webhooks::signature::WebhookVerifier;
use crate::middleware::auth::SessionVerifier;
use crate::push::PushTransport;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionVerifier,
    pub webhooks: Arc<WebhookVerifier>,
    pub push: Arc<dyn PushTransport>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
