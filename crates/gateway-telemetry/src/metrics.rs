use crate::Error;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Named counters exposed on `GET /metrics`.
///
/// Grounded in spec.md §6's Observability section: one counter per action
/// handler outcome, plus broker/store reconnect and failure counters.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub action_handler_calls_total: IntCounterVec,
    pub nats_reconnect_total: IntCounterVec,
    pub nats_disconnect_total: IntCounterVec,
    pub valkey_reconnect_total: IntCounterVec,
    pub valkey_connection_failures_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, Error> {
        let registry = Registry::new();

        let action_handler_calls_total = register_counter_vec(
            &registry,
            "action_handler_calls_total",
            "Total calls to an HTTP action handler, by action and status",
            &["action", "status"],
        )?;
        let nats_reconnect_total = register_counter_vec(
            &registry,
            "nats_reconnect_total",
            "Total broker connection-pool slot reconnects, by connection name",
            &["conn"],
        )?;
        let nats_disconnect_total = register_counter_vec(
            &registry,
            "nats_disconnect_total",
            "Total broker connection-pool slot disconnects, by connection name",
            &["conn"],
        )?;
        let valkey_reconnect_total = register_counter_vec(
            &registry,
            "valkey_reconnect_total",
            "Total status-store client reconnects",
            &["conn"],
        )?;
        let valkey_connection_failures_total = register_counter_vec(
            &registry,
            "valkey_connection_failures_total",
            "Total status-store connection failures",
            &["conn"],
        )?;

        Ok(Self {
            registry,
            action_handler_calls_total,
            nats_reconnect_total,
            nats_disconnect_total,
            valkey_reconnect_total,
            valkey_connection_failures_total,
        })
    }

    /// Renders the registry in Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        encoder
            .encode(&families, &mut buf)
            .map_err(|source| Error::MetricRegistration {
                name: "encode",
                source,
            })?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn register_counter_vec(
    registry: &Registry,
    name: &'static str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec, Error> {
    let vec = IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| Error::MetricRegistration { name, source })?;
    registry
        .register(Box::new(vec.clone()))
        .map_err(|source| Error::MetricRegistration { name, source })?;
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_includes_all_registered_families() {
        let metrics = Metrics::new().unwrap();
        metrics
            .action_handler_calls_total
            .with_label_values(&["publish", "ok"])
            .inc();

        let text = metrics.encode().unwrap();
        assert!(text.contains("action_handler_calls_total"));
        assert!(text.contains("nats_reconnect_total"));
        assert!(text.contains("valkey_connection_failures_total"));
    }
}
