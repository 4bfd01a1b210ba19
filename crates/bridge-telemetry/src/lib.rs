//! Logging setup for the bridge
//!
//! Installs a `tracing-subscriber` registry with an env-filter and a single
//! fmt layer, rendered as text or JSON depending on configuration

use bridge_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// Filter precedence: `RUST_LOG`, then `telemetry.logs.filter`, then
/// `default_filter`. Must be called once, before the server starts.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let filter = build_filter(config, default_filter);
    let format = config.map_or(LogFormat::Text, |c| c.logs.format);

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    if let Some(config) = config {
        tracing::debug!(service = %config.service_name, ?format, "logging initialized");
    }

    Ok(())
}

/// Resolve the effective `EnvFilter`
fn build_filter(config: Option<&TelemetryConfig>, default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directives = config
        .and_then(|c| c.logs.filter.as_deref())
        .unwrap_or(default_filter);

    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}
