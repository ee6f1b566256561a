pub mod exercises;
pub mod notifications;
pub mod performance;
pub mod splits;
pub mod users;
pub mod webhooks;
pub mod workouts;
