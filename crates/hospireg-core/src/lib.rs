//! Hospireg Core Library
//!
//! This crate provides the domain model, error types and configuration shared by
//! the upload service, the form client and the command-line submitter.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    DocumentKind, DocumentLocations, ErrorBody, HospitalRegistrationRecord, NewRegistration,
    UploadResponse,
};
pub use storage_types::StorageBackend;
