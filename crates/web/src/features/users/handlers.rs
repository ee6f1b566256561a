use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{LogBodyWeightRequest, UpdatePreferencesRequest, UserResponse},
    models::BodyWeightEntry,
};
use validator::Validate;

use crate::{error::WebError, middleware::auth::CurrentUser};

use super::services;

#[utoipa::path(
    get,
    path = "/api/users/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Response {
    Json(UserResponse::from(user)).into_response()
}

#[utoipa::path(
    patch,
    path = "/api/users/me/preferences",
    request_body = UpdatePreferencesRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Preferences updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn update_preferences(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let updated = services::update_preferences(db.pool(), &user, &req).await?;

    Ok(Json(UserResponse::from(updated)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/me/body-weight",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Body-weight history, most recent first", body = Vec<BodyWeightEntry>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn list_body_weight(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let entries = services::list_body_weight(db.pool(), &user).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    post,
    path = "/api/users/me/body-weight",
    request_body = LogBodyWeightRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Body weight recorded", body = BodyWeightEntry),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn log_body_weight(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<LogBodyWeightRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let entry = services::log_body_weight(db.pool(), &user, &req).await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}
