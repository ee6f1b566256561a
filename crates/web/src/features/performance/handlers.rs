use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        performance::ExerciseHistoryEntry,
    },
    models::ExercisePerformance,
};
use uuid::Uuid;

use crate::{error::WebError, middleware::auth::CurrentUser};

use super::services;

#[utoipa::path(
    get,
    path = "/api/performance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Performance records, most recently updated first", body = Vec<ExercisePerformance>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "performance"
)]
pub async fn list_performances(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let performances = services::list_performances(db.pool(), user.user_id).await?;

    Ok(Json(performances).into_response())
}

#[utoipa::path(
    get,
    path = "/api/performance/{exercise_id}",
    params(
        ("exercise_id" = Uuid, Path, description = "Exercise ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Performance record for the exercise", body = ExercisePerformance),
        (status = 403, description = "Exercise belongs to another user"),
        (status = 404, description = "Exercise never completed in a workout")
    ),
    tag = "performance"
)]
pub async fn get_performance(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let performance = services::get_performance(db.pool(), user.user_id, exercise_id).await?;

    Ok(Json(performance).into_response())
}

#[utoipa::path(
    get,
    path = "/api/performance/{exercise_id}/history",
    params(
        ("exercise_id" = Uuid, Path, description = "Exercise ID"),
        PaginationParams
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Completed workouts that logged the exercise, newest first", body = PaginatedResponse<ExerciseHistoryEntry>),
        (status = 400, description = "Invalid query parameters"),
        (status = 403, description = "Exercise belongs to another user"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "performance"
)]
pub async fn exercise_history(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(exercise_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let response =
        services::exercise_history(db.pool(), user.user_id, exercise_id, pagination).await?;

    Ok(Json(response).into_response())
}
