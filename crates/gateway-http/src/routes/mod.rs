pub mod action;
pub(crate) mod envelope;
pub mod metrics;
pub mod publish;
pub mod stream;

use crate::state::AppState;
use axum::routing::get;
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/{account_id}",
            get(stream::account_handler).post(stream::account_handler),
        )
        .route(
            "/v1/{account_id}/{stream_id}",
            get(publish::stream_handler).post(publish::stream_handler),
        )
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(state)
}
