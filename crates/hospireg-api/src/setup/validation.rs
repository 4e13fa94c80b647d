//! Configuration validation
//!
//! Checks that only matter to the running server, on top of `Config::validate`.

use anyhow::Result;
use hospireg_core::Config;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    for origin in config.cors_origins().iter().filter(|o| o.as_str() != "*") {
        if origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(anyhow::anyhow!("Invalid CORS origin: {}", origin));
        }
    }

    if config.server_port() == 0 {
        return Err(anyhow::anyhow!("PORT cannot be 0"));
    }

    if config.max_file_size_bytes() > 100 * 1024 * 1024 {
        tracing::warn!(
            max_file_size_mb = config.max_file_size_bytes() / 1024 / 1024,
            "MAX_FILE_SIZE_MB is very high - whole submissions are buffered in memory"
        );
    }

    Ok(())
}
