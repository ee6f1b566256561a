pub mod exercise;
pub mod performance;
pub mod push_subscription;
pub mod split;
pub mod user;
pub mod weight_unit;
pub mod workout;

pub use exercise::Exercise;
pub use performance::ExercisePerformance;
pub use push_subscription::PushSubscription;
pub use split::{Split, merge_exercise_refs};
pub use user::{BodyWeightEntry, User};
pub use weight_unit::{WeightUnit, fits_weight_precision};
pub use workout::{ExerciseSet, LoggedSet, WorkoutSession};
