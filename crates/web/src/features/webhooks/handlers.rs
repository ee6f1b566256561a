use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{error::WebError, state::AppState};

use super::services::{self, RawIdentityEvent};

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, WebError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebError::Unauthorized)
}

#[utoipa::path(
    post,
    path = "/api/webhooks/identity",
    request_body(content = String, description = "Signed identity provider event", content_type = "application/json"),
    responses(
        (status = 204, description = "Event processed or ignored"),
        (status = 400, description = "Malformed event payload"),
        (status = 401, description = "Missing or invalid signature")
    ),
    tag = "webhooks"
)]
pub async fn identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebError> {
    let msg_id = header(&headers, "svix-id")?;
    let timestamp = header(&headers, "svix-timestamp")?;
    let signature = header(&headers, "svix-signature")?;

    state
        .webhooks
        .verify(
            msg_id,
            timestamp,
            &body,
            signature,
            chrono::Utc::now().timestamp(),
        )
        .map_err(|e| {
            tracing::warn!(msg_id = %msg_id, "Rejected identity webhook: {}", e);
            WebError::Unauthorized
        })?;

    let raw: RawIdentityEvent = serde_json::from_slice(&body)
        .map_err(|e| WebError::BadRequest(format!("Invalid event payload: {}", e)))?;
    let event = services::parse_event(raw)
        .map_err(|e| WebError::BadRequest(format!("Invalid event data: {}", e)))?;

    services::apply_event(state.db.pool(), event).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
