use utoipa::OpenApi;

use crate::features;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::get_me,
        features::users::handlers::update_preferences,
        features::users::handlers::list_body_weight,
        features::users::handlers::log_body_weight,
        features::exercises::handlers::list_exercises,
        features::exercises::handlers::get_exercise,
        features::exercises::handlers::create_exercise,
        features::splits::handlers::list_splits,
        features::splits::handlers::get_split,
        features::splits::handlers::create_split,
        features::splits::handlers::add_exercises,
        features::workouts::handlers::start_workout,
        features::workouts::handlers::list_workouts,
        features::workouts::handlers::get_active_workout,
        features::workouts::handlers::get_workout,
        features::workouts::handlers::delete_workout,
        features::workouts::handlers::complete_workout,
        features::workouts::handlers::add_exercise,
        features::workouts::handlers::remove_exercise,
        features::workouts::handlers::set_exercise_active,
        features::workouts::handlers::log_set,
        features::workouts::handlers::delete_set,
        features::performance::handlers::list_performances,
        features::performance::handlers::get_performance,
        features::performance::handlers::exercise_history,
        features::notifications::handlers::list_subscriptions,
        features::notifications::handlers::subscribe,
        features::notifications::handlers::unsubscribe,
        features::notifications::handlers::send_notification,
        features::webhooks::handlers::identity_webhook,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::user::UserResponse,
            storage::dto::user::UpdatePreferencesRequest,
            storage::dto::user::LogBodyWeightRequest,
            storage::dto::exercise::CreateExerciseRequest,
            storage::dto::split::CreateSplitRequest,
            storage::dto::split::AddSplitExercisesRequest,
            storage::dto::split::SplitResponse,
            storage::dto::workout::StartWorkoutRequest,
            storage::dto::workout::AddExerciseSetRequest,
            storage::dto::workout::LogSetRequest,
            storage::dto::workout::SetExerciseActiveRequest,
            storage::dto::workout::CompleteWorkoutRequest,
            storage::dto::workout::ExerciseSetDetail,
            storage::dto::workout::WorkoutDetailResponse,
            storage::dto::workout::WorkoutSummary,
            storage::dto::workout::PersonalBestUpdate,
            storage::dto::workout::CompleteWorkoutResponse,
            storage::dto::performance::ExerciseHistoryEntry,
            storage::dto::push::SubscriptionKeys,
            storage::dto::push::SubscribeRequest,
            storage::dto::push::UnsubscribeRequest,
            storage::dto::push::SendNotificationRequest,
            storage::dto::push::DispatchReport,
            storage::models::User,
            storage::models::BodyWeightEntry,
            storage::models::WeightUnit,
            storage::models::Exercise,
            storage::models::Split,
            storage::models::WorkoutSession,
            storage::models::ExerciseSet,
            storage::models::LoggedSet,
            storage::models::ExercisePerformance,
            storage::models::PushSubscription,
        )
    ),
    tags(
        (name = "users", description = "Current user profile and body weight"),
        (name = "exercises", description = "Exercise catalog and custom exercises"),
        (name = "splits", description = "Workout templates"),
        (name = "workouts", description = "Workout sessions and logged sets"),
        (name = "performance", description = "Last performance and personal bests"),
        (name = "notifications", description = "Web push subscriptions"),
        (name = "webhooks", description = "Identity provider events"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_bearer_scheme_and_paths() {
        let doc = ApiDoc::openapi();

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/workouts/{id}/complete"));
        assert!(doc.paths.paths.contains_key("/api/webhooks/identity"));
    }
}
