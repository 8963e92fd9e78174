pub mod error;
pub mod task_repo;
pub mod user_repo;
