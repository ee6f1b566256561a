pub mod exercise;
pub mod performance;
pub mod push_subscription;
pub mod split;
pub mod user;
pub mod workout;
