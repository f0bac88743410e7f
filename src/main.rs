//! Process entry point: parses CLI flags, loads configuration, wires up the
//! broker pool, ack dispatcher, and status store, then serves the HTTP
//! surface until a shutdown signal arrives.

use clap::Parser;
use gateway_broker::ConnectionPool;
use gateway_config::Config;
use gateway_dispatch::Dispatcher;
use gateway_store::ValkeyStore;
use gateway_telemetry::Metrics;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "gateway", about = "HTTP-fronted publish gateway")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address the HTTP server binds to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    gateway_telemetry::init_tracing(&config)?;

    tracing::info!(region = %config.region, env = %config.env, "starting gateway");

    let metrics = Arc::new(Metrics::new()?);
    let broker = Arc::new(ConnectionPool::connect(&config.nats, metrics.clone()).await?);
    let store: Arc<dyn gateway_store::StatusStore> =
        Arc::new(ValkeyStore::connect(&config.valkey, metrics.clone()).await?);
    let dispatcher = Arc::new(Dispatcher::start(
        gateway_dispatch::DEFAULT_QUEUE_SIZE,
        config.message.worker_count() as usize,
        store.clone(),
    ));

    let state = gateway_http::AppState {
        config: Arc::new(config),
        broker: broker.clone(),
        dispatcher: dispatcher.clone(),
        store,
        metrics,
    };

    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();

    let server = tokio::spawn(async move {
        gateway_http::serve(&cli.bind, state, server_cancel).await
    });

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, draining in-flight work");
    cancel.cancel();

    if let Err(err) = server.await? {
        tracing::error!(error = %err, "http server exited with an error");
    }

    // Arc::into_inner only succeeds once every clone (the http server's,
    // which has just exited) has been dropped.
    match Arc::try_unwrap(dispatcher) {
        Ok(dispatcher) => dispatcher.stop().await,
        Err(dispatcher) => {
            tracing::warn!("dispatcher still referenced at shutdown; stopping in place");
            drop(dispatcher);
        }
    }

    broker.shutdown().await;
    tracing::info!("gateway shut down cleanly");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
