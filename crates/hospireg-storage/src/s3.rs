use crate::keys::{candidate_filename, generate_storage_key, validate_key, MAX_KEY_ATTEMPTS};
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder, S3ConditionalPut};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    ObjectStore, ObjectStoreExt, PutMode, PutOptions, PutPayload, Result as ObjectResult,
};

/// Credentials and location of an S3-compatible bucket.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO).
    pub endpoint_url: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance. Credentials are always explicit, never read from
    /// ambient defaults.
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone())
            .with_access_key_id(settings.access_key_id)
            .with_secret_access_key(settings.secret_access_key)
            .with_conditional_put(S3ConditionalPut::ETagMatch);

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket: settings.bucket,
            region: settings.region,
            endpoint_url: settings.endpoint_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// AWS: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// Custom endpoints use path-style: `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let size = data.len() as u64;
        let payload = PutPayload::from(Bytes::from(data));
        let start = std::time::Instant::now();

        let mut attempt = 0;
        let key = loop {
            let key = generate_storage_key(folder, &candidate_filename(filename, attempt));
            validate_key(&key)?;
            let location = Path::from(key.clone());

            let result: ObjectResult<_> = self
                .store
                .put_opts(&location, payload.clone(), PutOptions::from(PutMode::Create))
                .await;

            match result {
                Ok(_) => break key,
                Err(ObjectStoreError::AlreadyExists { .. })
                | Err(ObjectStoreError::Precondition { .. }) => {
                    attempt += 1;
                    if attempt >= MAX_KEY_ATTEMPTS {
                        return Err(StorageError::UploadFailed(format!(
                            "No free key for {} after {} attempts",
                            key, attempt
                        )));
                    }
                    tracing::debug!(key = %key, attempt, "Storage key taken, retrying");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        size_bytes = size,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 upload failed"
                    );
                    return Err(StorageError::UploadFailed(e.to_string()));
                }
            }
        };

        let url = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(StoredObject { key, url })
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        let bucket = self.bucket.clone();
        let key = storage_key.to_string();

        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(bucket = %bucket, key = %key, error = %e, "S3 stream download error");
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(Box::pin(stream))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
