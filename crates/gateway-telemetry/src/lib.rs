//! Logging and metrics setup, shared by the gateway binary and its crates.

mod error;
mod metrics;

pub use error::Error;
pub use metrics::Metrics;

use gateway_config::{Config, LogLevel};
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Uses a compact human-readable formatter outside of `env: "prod"`, and a
/// JSON formatter in production so log lines are directly ingestible by a
/// log pipeline. `RUST_LOG` always overrides the configured level.
pub fn init_tracing(config: &Config) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_filter(config.log.level)));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.env == "prod" {
        subscriber.json().try_init()
    } else {
        subscriber.compact().try_init()
    };

    result.map_err(|e| Error::SubscriberInit(e.to_string()))
}

fn level_filter(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        // `tracing` has no fatal/panic level; both collapse onto error.
        LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_maps_fatal_and_panic_to_error() {
        assert_eq!(level_filter(LogLevel::Fatal), "error");
        assert_eq!(level_filter(LogLevel::Panic), "error");
        assert_eq!(level_filter(LogLevel::Debug), "debug");
    }
}
