//! Hospireg API Library
//!
//! This crate provides the upload ingestion service: the HTTP handlers, the registration
//! upload pipeline and application setup.

// Module declarations
mod handlers;
mod services;
pub mod setup;
pub mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use state::{AppState, UploadPolicy};
