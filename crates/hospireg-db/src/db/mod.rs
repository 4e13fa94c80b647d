//! Database repositories for data access layer

pub mod registration;

/// Embedded schema migrations (workspace `migrations/`).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
