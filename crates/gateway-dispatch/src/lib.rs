//! Bounded ack-dispatch worker pool.

mod error;
mod task;
mod worker;

pub use error::Error;
pub use task::AckTask;
pub use worker::{Dispatcher, DEFAULT_ACK_TIMEOUT, DEFAULT_QUEUE_SIZE};
