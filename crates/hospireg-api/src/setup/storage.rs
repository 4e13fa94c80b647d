//! Storage setup and initialization

use anyhow::{Context, Result};
use hospireg_core::Config;
use hospireg_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the configured storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        folder = %config.upload_folder(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
