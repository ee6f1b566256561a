use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    add_exercise, complete_workout, delete_set, delete_workout, get_active_workout, get_workout,
    list_workouts, log_set, remove_exercise, set_exercise_active, start_workout,
};
use crate::{middleware::auth::require_auth, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(start_workout))
        .route("/active", get(get_active_workout))
        .route("/:id", get(get_workout).delete(delete_workout))
        .route("/:id/complete", post(complete_workout))
        .route("/:id/exercises", post(add_exercise))
        .route("/:id/exercises/:exercise_set_id", delete(remove_exercise))
        .route(
            "/:id/exercises/:exercise_set_id/active",
            put(set_exercise_active),
        )
        .route("/:id/exercises/:exercise_set_id/sets", post(log_set))
        .route(
            "/:id/exercises/:exercise_set_id/sets/:set_id",
            delete(delete_set),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
