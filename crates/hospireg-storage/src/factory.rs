#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{s3::S3Settings, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use hospireg_core::Config;
use std::sync::Arc;

fn required(value: Option<&str>, name: &str) -> StorageResult<String> {
    value
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
}

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let settings = S3Settings {
                bucket: required(config.s3_bucket(), "S3_BUCKET")?,
                region: required(config.s3_region(), "S3_REGION or AWS_REGION")?,
                endpoint_url: config.s3_endpoint().map(String::from),
                access_key_id: required(config.aws_access_key_id(), "AWS_ACCESS_KEY_ID")?,
                secret_access_key: required(
                    config.aws_secret_access_key(),
                    "AWS_SECRET_ACCESS_KEY",
                )?,
            };

            let storage = S3Storage::new(settings).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?;
            let base_url = required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
