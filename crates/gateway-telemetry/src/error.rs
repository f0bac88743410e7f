use thiserror::Error;

/// Errors raised while wiring up tracing or the metrics registry.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("failed to register metric '{name}': {source}")]
    MetricRegistration {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },
}
