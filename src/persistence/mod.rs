//! Persistence layer modules.

pub mod db;
pub mod question_repo;
pub mod response_repo;
pub mod schema;
pub mod survey_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;
