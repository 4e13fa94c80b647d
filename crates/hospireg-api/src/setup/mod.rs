//! Application setup and initialization
//!
//! The composition root: every shared handle (pool, storage, repository) is built here and
//! injected through `AppState`.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use hospireg_core::Config;
use hospireg_db::PgRegistrationRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment());

    // Validate configuration - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let registrations = Arc::new(PgRegistrationRepository::new(pool));
    let state = Arc::new(AppState::new(config.clone(), registrations, storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
