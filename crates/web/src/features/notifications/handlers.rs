use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::push::{DispatchReport, SendNotificationRequest, SubscribeRequest, UnsubscribeRequest},
    models::PushSubscription,
};
use validator::Validate;

use crate::{error::WebError, middleware::auth::CurrentUser, push::PushPayload, state::AppState};

use super::services;

#[utoipa::path(
    get,
    path = "/api/notifications/subscriptions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's push subscriptions", body = Vec<PushSubscription>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications"
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let subscriptions = services::list_subscriptions(state.db.pool(), user.user_id).await?;

    Ok(Json(subscriptions).into_response())
}

#[utoipa::path(
    post,
    path = "/api/notifications/subscriptions",
    request_body = SubscribeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Subscription accepted"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::subscribe(state.db.pool(), user.user_id, &req).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    delete,
    path = "/api/notifications/subscriptions",
    request_body = UnsubscribeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Subscription removed, if it existed"),
        (status = 400, description = "Validation error")
    ),
    tag = "notifications"
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::unsubscribe(state.db.pool(), user.user_id, &req.endpoint).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/notifications/send",
    request_body = SendNotificationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Delivery report", body = DispatchReport),
        (status = 400, description = "Validation error")
    ),
    tag = "notifications"
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let payload = PushPayload::from(&req);
    let report =
        services::dispatch(state.db.pool(), state.push.as_ref(), user.user_id, &payload).await?;

    Ok(Json(report).into_response())
}
