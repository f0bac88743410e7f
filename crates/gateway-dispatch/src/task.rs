use gateway_broker::PublishHandle;
use std::time::Duration;

/// A publish awaiting its terminal ack outcome.
///
/// Wraps the [`PublishHandle`] returned by the publish fast-path with the
/// deadline the dispatcher enforces on it — mirrors the original
/// `entity.AckTask{ID, AckFuture, TimeOut}`.
pub struct AckTask {
    pub handle: PublishHandle,
    pub timeout: Duration,
}

impl AckTask {
    pub fn new(handle: PublishHandle, timeout: Duration) -> Self {
        Self { handle, timeout }
    }

    pub fn message_id(&self) -> &str {
        &self.handle.message_id
    }
}
