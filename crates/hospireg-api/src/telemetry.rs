//! Tracing initialization.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "hospireg=debug,tower_http=debug";

/// Install the global subscriber: `RUST_LOG` or the default filter, compact console output.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_telemetry(environment: &str) {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .try_init();

    if installed.is_ok() {
        tracing::info!(environment = %environment, "Tracing initialized");
    }
}
