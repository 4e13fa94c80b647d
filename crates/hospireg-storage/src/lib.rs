//! Hospireg Storage Library
//!
//! Object storage for uploaded registration documents: the `Storage` trait and its S3 and
//! local filesystem implementations.
//!
//! # Storage key format
//!
//! Keys are folder-scoped: `{folder}/{filename}`, e.g.
//! `hospital_uploads/1718000000000-cert.jpg`. Keys must not contain `..` or a leading `/`.
//! Key generation is centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use hospireg_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
