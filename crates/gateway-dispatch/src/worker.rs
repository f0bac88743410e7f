//! The ack-dispatch worker pool.
//!
//! A fixed number of workers drain a bounded queue of [`AckTask`]s. Each
//! task races the broker's ack future against its own deadline and writes
//! the terminal [`AckResult`] to the status store — win, loss, or
//! timeout, exactly one write always happens.

use crate::task::AckTask;
use crate::Error;
use gateway_store::{AckResult, StatusStore, ACK_RESULT_TTL};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Default per-task ack deadline, unchanged from the original wiring's
/// `ackTimeout := 30 * time.Second`.
pub const DEFAULT_ACK_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Default task queue bound, unchanged from the original wiring's
/// `service.NewAckDispatcher(100000, cfg.Publish.Worker, valkeyRepo)` — fixed
/// independent of worker count.
pub const DEFAULT_QUEUE_SIZE: usize = 100_000;

/// Owns the bounded task queue and the worker pool draining it.
pub struct Dispatcher {
    sender: mpsc::Sender<AckTask>,
    cancel: CancellationToken,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawns `worker_count` workers (at least 1) pulling from a queue
    /// bounded at `queue_size` (at least 1).
    pub fn start(queue_size: usize, worker_count: usize, store: Arc<dyn StatusStore>) -> Self {
        let queue_size = queue_size.max(1);
        let worker_count = worker_count.max(1);
        let (sender, receiver) = mpsc::channel(queue_size);
        let receiver = Arc::new(Mutex::new(receiver));
        let cancel = CancellationToken::new();

        let workers = (0..worker_count)
            .map(|_| {
                let receiver = receiver.clone();
                let store = store.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move { run_worker(receiver, store, cancel).await })
            })
            .collect();

        Self {
            sender,
            cancel,
            workers,
        }
    }

    /// Enqueues `task`, backpressuring the caller if the queue is full —
    /// matches the original's buffered-channel blocking send. Fails only if
    /// the dispatcher has already been stopped.
    pub async fn enqueue(&self, task: AckTask) -> Result<(), Error> {
        self.sender.send(task).await.map_err(|_| Error::Closed)
    }

    /// Signals every worker to stop after its current task and waits for
    /// them to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

async fn run_worker(
    receiver: Arc<Mutex<mpsc::Receiver<AckTask>>>,
    store: Arc<dyn StatusStore>,
    cancel: CancellationToken,
) {
    loop {
        let task = tokio::select! {
            _ = cancel.cancelled() => break,
            task = async {
                let mut guard = receiver.lock().await;
                guard.recv().await
            } => task,
        };

        match task {
            Some(task) => process(task, store.as_ref()).await,
            None => break,
        }
    }
}

#[tracing::instrument(name = "ack.wait", skip(task, store), fields(message_id = task.message_id()))]
async fn process(task: AckTask, store: &dyn StatusStore) {
    let AckTask { handle, timeout } = task;
    let message_id = handle.message_id;

    let result = tokio::select! {
        biased;

        ack = handle.ack => match ack {
            Ok(Ok(ack)) => AckResult::ack(ack.sequence),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, message_id, "publish ack resolved with an error");
                AckResult::failed()
            }
            Err(_) => {
                tracing::warn!(message_id, "ack sender dropped without resolving");
                AckResult::failed()
            }
        },
        _ = tokio::time::sleep(timeout) => AckResult::timeout(),
    };

    if let Err(err) = store
        .store_ack_result(&message_id, &result, ACK_RESULT_TTL)
        .await
    {
        tracing::warn!(error = %err, message_id, "failed to persist ack result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_broker::{PublishAck, PublishHandle};
    use gateway_store::{fake::InMemoryStore, AckStatus};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn handle_with(id: &str) -> (PublishHandle, oneshot::Sender<Result<PublishAck, gateway_broker::Error>>) {
        let (tx, rx) = oneshot::channel();
        (
            PublishHandle {
                message_id: id.to_string(),
                ack: rx,
            },
            tx,
        )
    }

    #[tokio::test]
    async fn successful_ack_is_recorded() {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = Dispatcher::start(4, 1, store.clone());

        let (handle, tx) = handle_with("msg-1");
        tx.send(Ok(PublishAck { sequence: 9 })).unwrap();
        dispatcher
            .enqueue(AckTask::new(handle, Duration::from_secs(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let result = store.get_ack_result("msg-1").await.unwrap().unwrap();
        assert_eq!(result.status, AckStatus::Ack);
        assert_eq!(result.sequence, 9);

        dispatcher.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_ack_times_out() {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = Dispatcher::start(4, 1, store.clone());

        let (handle, _tx) = handle_with("msg-timeout");
        dispatcher
            .enqueue(AckTask::new(handle, Duration::from_millis(10)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(20)).await;
        tokio::task::yield_now().await;

        let result = store.get_ack_result("msg-timeout").await.unwrap().unwrap();
        assert_eq!(result.status, AckStatus::Timeout);

        dispatcher.stop().await;
    }

    #[tokio::test]
    async fn failed_ack_is_recorded() {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = Dispatcher::start(4, 1, store.clone());

        let (handle, tx) = handle_with("msg-fail");
        tx.send(Err(gateway_broker::Error::MissingField("topicName")))
            .unwrap();
        dispatcher
            .enqueue(AckTask::new(handle, Duration::from_secs(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let result = store.get_ack_result("msg-fail").await.unwrap().unwrap();
        assert_eq!(result.status, AckStatus::Failed);

        dispatcher.stop().await;
    }
}
