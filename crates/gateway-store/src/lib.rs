//! The short-TTL store that records the outcome of an asynchronous publish.
//!
//! Every publish writes a `PENDING` [`AckResult`] immediately, then the ack
//! dispatcher overwrites it with the terminal outcome once the broker's
//! publish ack future resolves (or times out). Entries expire after
//! [`ACK_RESULT_TTL`] regardless of outcome — this store is a cache for a
//! client poll window, not durable state.

mod error;
pub mod fake;
pub mod valkey;

pub use error::Error;
pub use valkey::ValkeyStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long an [`AckResult`] survives in the store after being written.
/// Matches the original implementation's fixed 30-second window.
pub const ACK_RESULT_TTL: Duration = Duration::from_secs(30);

/// The outcome of an asynchronous publish, as seen by a client polling
/// `GET /v1/{accountId}/{streamId}?Action=CheckAckStatus&messageId=...`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResult {
    pub status: AckStatus,
    #[serde(default)]
    pub sequence: u64,
}

impl AckResult {
    pub fn pending() -> Self {
        Self {
            status: AckStatus::Pending,
            sequence: 0,
        }
    }

    pub fn ack(sequence: u64) -> Self {
        Self {
            status: AckStatus::Ack,
            sequence,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: AckStatus::Failed,
            sequence: 0,
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: AckStatus::Timeout,
            sequence: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AckStatus {
    Pending,
    Ack,
    Failed,
    Timeout,
}

/// Abstracts over the Valkey/Redis-backed status store so the dispatcher and
/// HTTP handlers can be tested against [`fake::InMemoryStore`].
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Writes `result` under `id`, expiring after `ttl`.
    async fn store_ack_result(
        &self,
        id: &str,
        result: &AckResult,
        ttl: Duration,
    ) -> Result<(), Error>;

    /// Reads back the result stored under `id`, if any and not yet expired.
    async fn get_ack_result(&self, id: &str) -> Result<Option<AckResult>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_result_json_round_trips_with_go_compatible_tags() {
        let result = AckResult::ack(42);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"status":"ACK","sequence":42}"#);

        let back: AckResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn pending_has_zero_sequence() {
        assert_eq!(AckResult::pending().sequence, 0);
    }
}
