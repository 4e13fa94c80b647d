//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{filename}`. Upload filenames carry a millisecond timestamp prefix,
//! `{millis}-{original}`. Backends never overwrite: when a key is taken they retry with
//! `candidate_filename`, which appends `-{n}` before the extension.

use crate::traits::{StorageError, StorageResult};

/// Generate a storage key for the given folder and filename.
pub fn generate_storage_key(folder: &str, filename: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", folder, filename)
    }
}

/// Prefix a filename with the submission timestamp (milliseconds since the Unix epoch).
pub fn timestamped_filename(submitted_at_millis: i64, filename: &str) -> String {
    format!("{}-{}", submitted_at_millis, filename)
}

/// Attempts a backend makes before giving up on a free key.
pub const MAX_KEY_ATTEMPTS: u32 = 16;

/// Filename to try on the given attempt: the name itself first, then `{stem}-{n}.{ext}`.
pub fn candidate_filename(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &filename[..dot], attempt, &filename[dot..]),
        _ => format!("{}-{}", filename, attempt),
    }
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
