use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::exercise::{CreateExerciseRequest, ExerciseFilter},
    models::Exercise,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::WebError, middleware::auth::CurrentUser};

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercises",
    params(ExerciseFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercises visible to the user", body = Vec<Exercise>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn list_exercises(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(filter): Query<ExerciseFilter>,
) -> Result<Response, WebError> {
    let exercises = services::list_exercises(db.pool(), user.user_id, &filter).await?;

    Ok(Json(exercises).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercise found", body = Exercise),
        (status = 403, description = "Custom exercise owned by another user"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn get_exercise(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let exercise = services::get_exercise(db.pool(), user.user_id, id).await?;

    Ok(Json(exercise).into_response())
}

#[utoipa::path(
    post,
    path = "/api/exercises",
    request_body = CreateExerciseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Custom exercise created", body = Exercise),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn create_exercise(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateExerciseRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let exercise = services::create_custom_exercise(db.pool(), user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}
