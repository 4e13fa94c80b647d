//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Where an uploaded object landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Internal identifier, used to read the object back.
    pub key: String,
    /// Retrievable location recorded in the registration.
    pub url: String,
}

/// Stream of object bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// The upload handler depends only on this trait, so S3-compatible providers and the local
/// filesystem are interchangeable. Implementations are shared across requests behind an
/// `Arc` and must be safe for concurrent use.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload `data` as `{folder}/{filename}`. An existing object is never replaced; the
    /// returned key may carry a `-{n}` suffix when the requested one was taken.
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    /// Download a file as a stream of chunks
    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
