use crate::keys::{candidate_filename, generate_storage_key, validate_key, MAX_KEY_ATTEMPTS};
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/hospireg/files")
    /// * `base_url` - Base URL the files are served from (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, refusing keys that leave the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        let size = data.len();
        let start = std::time::Instant::now();

        let mut attempt = 0;
        let (key, path, mut file) = loop {
            let key = generate_storage_key(folder, &candidate_filename(filename, attempt));
            let path = self.key_to_path(&key)?;
            self.ensure_parent_dir(&path).await?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (key, path, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
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
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        };

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject { key, url })
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(storage_key)?;

        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(storage_key.to_string()),
            _ => StorageError::DownloadFailed(format!(
                "Failed to open file {}: {}",
                path.display(),
                e
            )),
        })?;

        tracing::debug!(key = %storage_key, "Local storage download");

        let stream = tokio_util::io::ReaderStream::new(file).map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        });

        Ok(Box::pin(stream))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn new_storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
            .await
            .unwrap()
    }

    async fn read_all(storage: &LocalStorage, key: &str) -> Vec<u8> {
        let mut stream = storage.download_stream(key).await.unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }
        downloaded
    }

    #[tokio::test]
    async fn test_local_storage_upload_download() {
        let dir = tempdir().unwrap();
        let storage = new_storage(&dir).await;
        let data = b"jpeg bytes".to_vec();

        let stored = storage
            .upload("hospital_uploads", "1-cert.jpg", "image/jpeg", data.clone())
            .await
            .unwrap();

        assert_eq!(stored.key, "hospital_uploads/1-cert.jpg");
        assert_eq!(
            stored.url,
            "http://localhost:3000/files/hospital_uploads/1-cert.jpg"
        );
        assert_eq!(read_all(&storage, &stored.key).await, data);
    }

    #[tokio::test]
    async fn test_same_name_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = new_storage(&dir).await;
        let name = "1718000000000-hospitalCert.jpg";

        let first = storage
            .upload("hospital_uploads", name, "image/jpeg", b"CLIENT-A".to_vec())
            .await
            .unwrap();
        let second = storage
            .upload("hospital_uploads", name, "image/jpeg", b"CLIENT-B".to_vec())
            .await
            .unwrap();

        assert_ne!(first.key, second.key);
        assert_ne!(first.url, second.url);
        assert_eq!(second.key, "hospital_uploads/1718000000000-hospitalCert-1.jpg");
        assert_eq!(read_all(&storage, &first.key).await, b"CLIENT-A");
        assert_eq!(read_all(&storage, &second.key).await, b"CLIENT-B");
    }

    #[tokio::test]
    async fn test_concurrent_same_name_uploads_keep_their_bytes() {
        let dir = tempdir().unwrap();
        let storage = new_storage(&dir).await;
        let name = "1718000000000-fireNOC.jpg";

        let uploads = (0..8u8).map(|i| {
            let storage = storage.clone();
            async move {
                let data = vec![i; 64];
                let stored = storage
                    .upload("hospital_uploads", name, "image/jpeg", data.clone())
                    .await
                    .unwrap();
                (stored, data)
            }
        });
        let results = futures::future::join_all(uploads).await;

        let mut keys: Vec<_> = results.iter().map(|(s, _)| s.key.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);
        for (stored, data) in &results {
            assert_eq!(&read_all(&storage, &stored.key).await, data);
        }
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = new_storage(&dir).await;

        let result = storage.download_stream("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.download_stream("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .upload("..", "escape.jpg", "image/jpeg", b"x".to_vec())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = new_storage(&dir).await;

        assert!(matches!(
            storage.download_stream("hospital_uploads/missing.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
