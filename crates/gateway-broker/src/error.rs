use thiserror::Error;

/// Errors raised by the broker connection pool, publish fast-path, and
/// stream admin operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("failed to connect connection-pool slot to '{url}': {message}")]
    Connect { url: String, message: String },

    #[error("no healthy JetStream connection available in the pool")]
    PoolExhausted,

    #[error("failed to publish to subject '{subject}': {message}")]
    Publish { subject: String, message: String },

    #[error("failed to create stream '{name}': {message}")]
    StreamCreate { name: String, message: String },

    #[error("failed to delete stream '{name}': {message}")]
    StreamDelete { name: String, message: String },

    #[error("failed to list streams: {message}")]
    StreamList { message: String },

    #[error("stream identifier '{0}' is not a valid srn")]
    InvalidStreamSrn(String),
}
