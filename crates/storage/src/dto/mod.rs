pub mod common;
pub mod exercise;
pub mod performance;
pub mod push;
pub mod split;
pub mod user;
pub mod workout;
