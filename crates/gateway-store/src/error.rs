use thiserror::Error;

/// Errors raised by the ack-status store.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to connect to status store at '{addr}': {source}")]
    Connect {
        addr: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("status store command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("failed to serialize ack result for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize ack result for key '{key}': {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
