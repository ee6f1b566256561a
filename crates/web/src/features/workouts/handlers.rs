use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        workout::{
            AddExerciseSetRequest, CompleteWorkoutRequest, CompleteWorkoutResponse, LogSetRequest,
            SetExerciseActiveRequest, StartWorkoutRequest, WorkoutDetailResponse, WorkoutSummary,
        },
    },
    models::ExerciseSet,
};
use uuid::Uuid;
use validator::Validate;

use crate::{error::WebError, middleware::auth::CurrentUser};

use super::services;

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = StartWorkoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Workout started", body = WorkoutDetailResponse),
        (status = 403, description = "Split belongs to another user"),
        (status = 404, description = "Split not found"),
        (status = 409, description = "A workout is already in progress")
    ),
    tag = "workouts"
)]
pub async fn start_workout(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<StartWorkoutRequest>,
) -> Result<Response, WebError> {
    let workout = services::start_workout(db.pool(), user.user_id, req.split_id).await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workout history, newest first", body = PaginatedResponse<WorkoutSummary>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "workouts"
)]
pub async fn list_workouts(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let response = services::list_workouts(db.pool(), user.user_id, pagination).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/active",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The workout in progress", body = WorkoutDetailResponse),
        (status = 404, description = "No workout in progress")
    ),
    tag = "workouts"
)]
pub async fn get_active_workout(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let workout = services::get_active_workout(db.pool(), user.user_id).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/{id}",
    params(
        ("id" = Uuid, Path, description = "Workout session ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workout with its exercises and sets", body = WorkoutDetailResponse),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn get_workout(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let workout = services::get_workout(db.pool(), user.user_id, id).await?;

    Ok(Json(workout).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}",
    params(
        ("id" = Uuid, Path, description = "Workout session ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Workout deleted"),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout not found")
    ),
    tag = "workouts"
)]
pub async fn delete_workout(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_workout(db.pool(), user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Workout session ID")
    ),
    request_body = CompleteWorkoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workout completed; performance records updated", body = CompleteWorkoutResponse),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout not found"),
        (status = 409, description = "Workout is already completed")
    ),
    tag = "workouts"
)]
pub async fn complete_workout(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteWorkoutRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response =
        services::complete_workout(db.pool(), user.user_id, id, req.notes.as_deref()).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/{id}/exercises",
    params(
        ("id" = Uuid, Path, description = "Workout session ID")
    ),
    request_body = AddExerciseSetRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Exercise added to the workout", body = ExerciseSet),
        (status = 403, description = "Workout or exercise not accessible"),
        (status = 404, description = "Workout or exercise not found")
    ),
    tag = "workouts"
)]
pub async fn add_exercise(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddExerciseSetRequest>,
) -> Result<Response, WebError> {
    let exercise_set = services::add_exercise(db.pool(), user.user_id, id, req.exercise_id).await?;

    Ok((StatusCode::CREATED, Json(exercise_set)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}/exercises/{exercise_set_id}",
    params(
        ("id" = Uuid, Path, description = "Workout session ID"),
        ("exercise_set_id" = Uuid, Path, description = "Exercise set ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Exercise removed from the workout"),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout or exercise set not found")
    ),
    tag = "workouts"
)]
pub async fn remove_exercise(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, exercise_set_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::remove_exercise(db.pool(), user.user_id, id, exercise_set_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/workouts/{id}/exercises/{exercise_set_id}/active",
    params(
        ("id" = Uuid, Path, description = "Workout session ID"),
        ("exercise_set_id" = Uuid, Path, description = "Exercise set ID")
    ),
    request_body = SetExerciseActiveRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercise set updated", body = ExerciseSet),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout or exercise set not found")
    ),
    tag = "workouts"
)]
pub async fn set_exercise_active(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, exercise_set_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetExerciseActiveRequest>,
) -> Result<Response, WebError> {
    let exercise_set =
        services::set_exercise_active(db.pool(), user.user_id, id, exercise_set_id, req.is_active)
            .await?;

    Ok(Json(exercise_set).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/{id}/exercises/{exercise_set_id}/sets",
    params(
        ("id" = Uuid, Path, description = "Workout session ID"),
        ("exercise_set_id" = Uuid, Path, description = "Exercise set ID")
    ),
    request_body = LogSetRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Set logged", body = ExerciseSet),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout or exercise set not found")
    ),
    tag = "workouts"
)]
pub async fn log_set(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, exercise_set_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<LogSetRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let exercise_set = services::log_set(db.pool(), &user, id, exercise_set_id, req).await?;

    Ok((StatusCode::CREATED, Json(exercise_set)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}/exercises/{exercise_set_id}/sets/{set_id}",
    params(
        ("id" = Uuid, Path, description = "Workout session ID"),
        ("exercise_set_id" = Uuid, Path, description = "Exercise set ID"),
        ("set_id" = Uuid, Path, description = "Logged set ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Set removed", body = ExerciseSet),
        (status = 403, description = "Workout belongs to another user"),
        (status = 404, description = "Workout, exercise set or set not found")
    ),
    tag = "workouts"
)]
pub async fn delete_set(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, exercise_set_id, set_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let exercise_set =
        services::delete_set(db.pool(), user.user_id, id, exercise_set_id, set_id).await?;

    Ok(Json(exercise_set).into_response())
}
