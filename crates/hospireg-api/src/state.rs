//! Application state shared by all handlers.

use hospireg_core::Config;
use hospireg_db::RegistrationStore;
use hospireg_storage::Storage;
use std::sync::Arc;

/// Limits applied to every uploaded document.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    /// Storage folder every document is written under.
    pub folder: String,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
    pub max_file_size: usize,
}

impl UploadPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            folder: config.upload_folder().to_string(),
            allowed_extensions: config.allowed_extensions().to_vec(),
            max_file_size: config.max_file_size_bytes(),
        }
    }
}

/// Handles built once in `setup::initialize_app` and injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registrations: Arc<dyn RegistrationStore>,
    pub storage: Arc<dyn Storage>,
    pub upload: UploadPolicy,
}

impl AppState {
    pub fn new(
        config: Config,
        registrations: Arc<dyn RegistrationStore>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let upload = UploadPolicy::from_config(&config);
        Self {
            config,
            registrations,
            storage,
            upload,
        }
    }
}
