use gateway_broker::ConnectionPool;
use gateway_config::Config;
use gateway_dispatch::Dispatcher;
use gateway_store::StatusStore;
use gateway_telemetry::Metrics;
use std::sync::Arc;

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub broker: Arc<ConnectionPool>,
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<dyn StatusStore>,
    pub metrics: Arc<Metrics>,
}
