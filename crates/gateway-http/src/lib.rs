//! HTTP surface assembly: router, middleware, and the graceful-shutdown
//! server loop, grounded in the teacher's admin-server `run()` pattern.

pub mod error;
pub(crate) mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::middleware::from_fn;
use std::net::SocketAddr;
use thiserror::Error as ThisError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Debug, ThisError)]
pub enum ServerError {
    #[error("invalid bind address '{addr}': {message}")]
    InvalidBindAddress { addr: String, message: String },

    #[error("failed to bind '{addr}': {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("http server error on '{addr}': {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Binds `bind_addr` and serves the gateway's HTTP surface until `cancel` is
/// triggered.
pub async fn serve(
    bind_addr: &str,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|err: std::net::AddrParseError| ServerError::InvalidBindAddress {
            addr: bind_addr.to_string(),
            message: err.to_string(),
        })?;

    let app = routes::router(state).layer(from_fn(middleware::request_id));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::BindFailed { addr, source })?;

    tracing::info!(%addr, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|source| ServerError::Serve { addr, source })
}
