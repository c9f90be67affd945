//! Logging for the relay
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! text or JSON `fmt` layer

use relay_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over the configured filter when it is set and valid.
///
/// # Errors
///
/// Returns an error if the configured filter is invalid or a global
/// subscriber is already installed
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = build_filter(&config.log_filter)?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
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
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(fallback: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(fallback).map_err(|e| anyhow::anyhow!("invalid log filter '{fallback}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fallback_filter_is_reported() {
        // Only reached when RUST_LOG is unset or invalid in the test environment
        if std::env::var("RUST_LOG").is_err() {
            let err = build_filter("relay=notalevel").unwrap_err();
            assert!(err.to_string().contains("invalid log filter"));
        }
    }

    #[test]
    fn valid_fallback_filter_is_accepted() {
        assert!(build_filter("info,relay_server=debug").is_ok());
    }
}
