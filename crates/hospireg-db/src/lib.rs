//! Hospireg Database Library
//!
//! Document-store access for hospital registrations. The `RegistrationStore` trait is the seam
//! the upload service depends on; `PgRegistrationRepository` implements it on PostgreSQL with
//! the document locations kept in a JSONB column.

pub mod db;

pub use db::registration::{PgRegistrationRepository, RegistrationRow, RegistrationStore};
pub use db::MIGRATOR;
