use thiserror::Error;

/// Errors raised by the ack-dispatch worker pool.
#[derive(Error, Debug)]
pub enum Error {
    /// The dispatcher has already been stopped; no worker remains to drain
    /// the queue.
    #[error("ack dispatcher is shut down")]
    Closed,
}
