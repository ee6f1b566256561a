use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::split::{AddSplitExercisesRequest, CreateSplitRequest, SplitResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::WebError, middleware::auth::CurrentUser};

use super::services;

#[utoipa::path(
    get,
    path = "/api/splits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User's splits, most recently updated first", body = Vec<SplitResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "splits"
)]
pub async fn list_splits(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let splits = services::list_splits(db.pool(), user.user_id).await?;

    let response: Vec<SplitResponse> = splits.into_iter().map(SplitResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/splits/{id}",
    params(
        ("id" = Uuid, Path, description = "Split ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Split found", body = SplitResponse),
        (status = 403, description = "Split belongs to another user"),
        (status = 404, description = "Split not found")
    ),
    tag = "splits"
)]
pub async fn get_split(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let split = services::get_split(db.pool(), user.user_id, id).await?;

    Ok(Json(SplitResponse::from(split)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/splits",
    request_body = CreateSplitRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Split created", body = SplitResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "splits"
)]
pub async fn create_split(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateSplitRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let split = services::create_split(db.pool(), user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(SplitResponse::from(split))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/splits/{id}/exercises",
    params(
        ("id" = Uuid, Path, description = "Split ID")
    ),
    request_body = AddSplitExercisesRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercises added; duplicates ignored", body = SplitResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Split or exercise not accessible"),
        (status = 404, description = "Split or exercise not found")
    ),
    tag = "splits"
)]
pub async fn add_exercises(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddSplitExercisesRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let split = services::add_exercises(db.pool(), user.user_id, id, &req).await?;

    Ok(Json(SplitResponse::from(split)).into_response())
}
