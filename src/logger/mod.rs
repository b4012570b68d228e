//! Tracing subscriber and Prometheus exporter setup.
//!
//! `RUST_LOG` wins over the configured level. Output is pretty or JSON.

mod config;

use std::net::SocketAddr;

pub(crate) use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

const FALLBACK_LEVEL: &str = "info";

/// Install the global subscriber, then the metrics exporter if enabled.
pub(crate) fn initialize(
    logger_config: &LoggerConfig,
    telemetry_config: &TelemetryConfig,
) -> Result<(), TryInitError> {
    let (filter, rejected_level) = build_filter(&logger_config.level);

    initialize_logger(&logger_config.format, filter)?;

    if let Some(error) = rejected_level {
        tracing::warn!(
            level = %logger_config.level,
            error = %error,
            "Invalid log level in config, falling back to {FALLBACK_LEVEL}"
        );
    }

    initialize_metrics(&telemetry_config.metrics);
    Ok(())
}

/// Returns the filter plus the parse error when the configured level was unusable.
fn build_filter(level: &str) -> (EnvFilter, Option<String>) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, None);
    }
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(FALLBACK_LEVEL), Some(error.to_string())),
    }
}

fn initialize_logger(format: &LogFormat, filter: EnvFilter) -> Result<(), TryInitError> {
    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    }
}

fn initialize_metrics(metrics_config: &TelemetryMetricsConfig) {
    if !metrics_config.enabled {
        return;
    }

    let bind_address: SocketAddr = match metrics_config.bind_address.parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; metrics exporter disabled"
            );
            return;
        }
    };

    match PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        Ok(()) => tracing::info!(
            bind_address = %bind_address,
            "Prometheus metrics exporter enabled"
        ),
        Err(error) => tracing::warn!(
            bind_address = %bind_address,
            error = %error,
            "Failed to initialize Prometheus metrics exporter"
        ),
    }
}
