//! Redis-protocol-compatible (Valkey) status store client.

use crate::{AckResult, Error, StatusStore};
use async_trait::async_trait;
use gateway_config::ValkeyConfig;
use gateway_telemetry::Metrics;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps a `redis::aio::ConnectionManager`, which reconnects transparently
/// on connection loss — the client never has to notice a dropped link.
/// `ConnectionManager` exposes no reconnect hook the way `async-nats` does,
/// so a reconnect is inferred: a command succeeding right after a prior one
/// failed counts as one.
#[derive(Clone)]
pub struct ValkeyStore {
    conn: ConnectionManager,
    metrics: Arc<Metrics>,
    degraded: Arc<AtomicBool>,
}

impl ValkeyStore {
    pub async fn connect(config: &ValkeyConfig, metrics: Arc<Metrics>) -> Result<Self, Error> {
        let info = connection_info(config)?;
        let client = redis::Client::open(info).map_err(|source| Error::Connect {
            addr: config.addr.clone(),
            source,
        })?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|source| Error::Connect {
                addr: config.addr.clone(),
                source,
            })?;
        Ok(Self {
            conn,
            metrics,
            degraded: Arc::new(AtomicBool::new(false)),
        })
    }

    fn record_failure(&self) {
        self.degraded.store(true, Ordering::Relaxed);
        self.metrics
            .valkey_connection_failures_total
            .with_label_values(&["status-store"])
            .inc();
    }

    fn record_success(&self) {
        if self.degraded.swap(false, Ordering::Relaxed) {
            self.metrics
                .valkey_reconnect_total
                .with_label_values(&["status-store"])
                .inc();
        }
    }
}

/// Builds a `ConnectionInfo` directly instead of a `redis://` URL string, so
/// a password containing `@`, `:`, or `/` can't be misparsed as part of the
/// host.
fn connection_info(config: &ValkeyConfig) -> Result<redis::ConnectionInfo, Error> {
    let (host, port) = config.addr.rsplit_once(':').ok_or_else(|| Error::Connect {
        addr: config.addr.clone(),
        source: bad_address(&config.addr),
    })?;
    let port: u16 = port.parse().map_err(|_| Error::Connect {
        addr: config.addr.clone(),
        source: bad_address(&config.addr),
    })?;

    Ok(redis::ConnectionInfo {
        addr: redis::ConnectionAddr::Tcp(host.to_string(), port),
        redis: redis::RedisConnectionInfo {
            db: config.db,
            username: None,
            password: config.password.clone(),
        },
    })
}

fn bad_address(addr: &str) -> redis::RedisError {
    redis::RedisError::from((
        redis::ErrorKind::InvalidClientConfig,
        "valkey address must be host:port",
        addr.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_config::ValkeyConfig;

    #[test]
    fn connection_info_preserves_special_characters_in_password() {
        let config = ValkeyConfig {
            addr: "127.0.0.1:6379".to_string(),
            password: Some("p@ss:word/weird".to_string()),
            db: 2,
        };

        let info = connection_info(&config).unwrap();
        assert_eq!(info.redis.password.as_deref(), Some("p@ss:word/weird"));
        assert_eq!(info.redis.db, 2);
        assert!(matches!(
            info.addr,
            redis::ConnectionAddr::Tcp(ref host, 6379) if host == "127.0.0.1"
        ));
    }

    #[test]
    fn connection_info_rejects_address_without_port() {
        let config = ValkeyConfig {
            addr: "127.0.0.1".to_string(),
            password: None,
            db: 0,
        };

        assert!(connection_info(&config).is_err());
    }
}

#[async_trait]
impl StatusStore for ValkeyStore {
    async fn store_ack_result(
        &self,
        id: &str,
        result: &AckResult,
        ttl: Duration,
    ) -> Result<(), Error> {
        let payload = serde_json::to_string(result).map_err(|source| Error::Serialize {
            key: id.to_string(),
            source,
        })?;

        let mut conn = self.conn.clone();
        let outcome: Result<(), redis::RedisError> = conn
            .set_ex(id, payload, ttl.as_secs().max(1))
            .await;

        if let Err(source) = outcome {
            self.record_failure();
            return Err(Error::Command(source));
        }
        self.record_success();
        Ok(())
    }

    async fn get_ack_result(&self, id: &str) -> Result<Option<AckResult>, Error> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(id).await.map_err(|source| {
            self.record_failure();
            Error::Command(source)
        })?;
        self.record_success();

        match raw {
            None => Ok(None),
            Some(raw) => {
                let result = serde_json::from_str(&raw).map_err(|source| Error::Deserialize {
                    key: id.to_string(),
                    source,
                })?;
                Ok(Some(result))
            }
        }
    }
}
