//! The non-blocking publish fast-path.
//!
//! Publishing never waits on the broker's ack — it hands back a
//! [`PublishHandle`] whose `ack` resolves once the ack dispatcher's worker
//! observes the outcome (or its deadline elapses). This mirrors the
//! original `publishService`/`messageService` split, collapsed into one
//! function since both lineages differ only in field names on the wire.

use crate::Error;
use crate::pool::ConnectionPool;
use bytes::Bytes;
use tokio::sync::oneshot;
use uuid::Uuid;

/// The broker's acknowledgement of a successfully persisted publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAck {
    pub sequence: u64,
}

/// Returned immediately by [`publish`]. `ack` resolves once the broker
/// responds; the caller (the ack dispatcher) is responsible for applying a
/// deadline — this future does not time out on its own.
pub struct PublishHandle {
    pub message_id: String,
    pub ack: oneshot::Receiver<Result<PublishAck, Error>>,
}

/// Publishes `body` to `subject` (defaulting to `stream_name` when empty) on
/// `stream_name`'s stream, via a pooled JetStream connection.
///
/// Validates that `stream_name` and `body` are both non-empty, matching the
/// original handlers' "missing required fields" check.
pub async fn publish(
    pool: &ConnectionPool,
    stream_name: &str,
    subject: &str,
    body: Bytes,
) -> Result<PublishHandle, Error> {
    validate(stream_name, &body)?;
    let subject = if subject.is_empty() {
        stream_name.to_string()
    } else {
        subject.to_string()
    };

    let js = pool.jetstream().await?;
    let ack_future = js
        .publish(subject.clone(), body)
        .await
        .map_err(|source| Error::Publish {
            subject: subject.clone(),
            message: source.to_string(),
        })?;

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = ack_future
            .await
            .map(|ack| PublishAck {
                sequence: ack.sequence,
            })
            .map_err(|source| Error::Publish {
                subject,
                message: source.to_string(),
            });
        // No receiver means the dispatcher worker already gave up (e.g. on
        // shutdown); dropping the result here is fine, nothing is waiting.
        let _ = tx.send(result);
    });

    Ok(PublishHandle {
        message_id: Uuid::new_v4().to_string(),
        ack: rx,
    })
}

/// Rejects an empty stream name or body before a connection is ever
/// touched, so `publish` can be validated without a live broker.
fn validate(stream_name: &str, body: &[u8]) -> Result<(), Error> {
    if stream_name.is_empty() {
        return Err(Error::MissingField("topicName"));
    }
    if body.is_empty() {
        return Err(Error::MissingField("message"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_stream_name() {
        let err = validate("", b"payload").unwrap_err();
        assert!(matches!(err, Error::MissingField("topicName")));
    }

    #[test]
    fn rejects_empty_body() {
        let err = validate("orders", b"").unwrap_err();
        assert!(matches!(err, Error::MissingField("message")));
    }

    #[test]
    fn accepts_non_empty_stream_name_and_body() {
        assert!(validate("orders", b"payload").is_ok());
    }
}
