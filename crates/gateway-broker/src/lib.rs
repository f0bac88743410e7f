//! Broker connection pool, non-blocking publish fast-path, and stream admin.

pub mod admin;
mod error;
pub mod pool;
pub mod publish;
pub mod srn;

pub use error::Error;
pub use pool::ConnectionPool;
pub use publish::{publish, PublishAck, PublishHandle};
