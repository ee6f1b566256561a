pub mod performance;
pub mod subscription;
pub mod workout;
