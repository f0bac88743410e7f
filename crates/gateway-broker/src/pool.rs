//! Round-robin JetStream connection pool.
//!
//! Each slot is rebuilt lazily and in place the first time it is found
//! unhealthy — there is no background reconnect loop. `jetstream()` walks at
//! most `size` slots looking for a healthy one before giving up, mirroring
//! the original `connectionPool.GetJetStream`.

use crate::Error;
use async_nats::jetstream::{self, Context as JetStreamContext};
use async_nats::{Client, ConnectOptions};
use gateway_config::NatsConfig;
use gateway_telemetry::Metrics;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const MAX_RECONNECTS: usize = 100;
const RECONNECT_WAIT: Duration = Duration::from_secs(2);
const PING_INTERVAL: Duration = Duration::from_secs(30);
const MAX_PINGS_OUTSTANDING: usize = 3;

struct Slot {
    client: Client,
    jetstream: JetStreamContext,
}

/// A fixed-size pool of JetStream connections, selected round robin.
pub struct ConnectionPool {
    url: String,
    slots: Vec<RwLock<Option<Slot>>>,
    next_idx: AtomicUsize,
    metrics: Arc<Metrics>,
}

impl ConnectionPool {
    /// Connects `config.pool_size()` slots up front. Fails if even one
    /// initial connection cannot be established.
    pub async fn connect(config: &NatsConfig, metrics: Arc<Metrics>) -> Result<Self, Error> {
        let size = config.pool_size() as usize;
        let pool = Self {
            url: config.url.clone(),
            slots: (0..size).map(|_| RwLock::new(None)).collect(),
            next_idx: AtomicUsize::new(0),
            metrics,
        };
        for idx in 0..size {
            pool.rebuild_slot(idx).await?;
        }
        Ok(pool)
    }

    fn slot_name(idx: usize) -> String {
        format!("SNS-API-Conn-{idx}")
    }

    async fn rebuild_slot(&self, idx: usize) -> Result<(), Error> {
        let name = Self::slot_name(idx);
        let reconnect_metrics = self.metrics.clone();
        let disconnect_metrics = self.metrics.clone();
        let reconnect_name = name.clone();
        let disconnect_name = name.clone();

        let options = ConnectOptions::new()
            .max_reconnects(MAX_RECONNECTS)
            .reconnect_delay_callback(move |_attempts| RECONNECT_WAIT)
            .ping_interval(PING_INTERVAL)
            .max_pings_outstanding(MAX_PINGS_OUTSTANDING)
            .reconnect_callback(move || {
                reconnect_metrics
                    .nats_reconnect_total
                    .with_label_values(&[&reconnect_name])
                    .inc();
            })
            .disconnect_callback(move || {
                disconnect_metrics
                    .nats_disconnect_total
                    .with_label_values(&[&disconnect_name])
                    .inc();
            });

        let client = options
            .connect(&self.url)
            .await
            .map_err(|source| Error::Connect {
                url: self.url.clone(),
                message: source.to_string(),
            })?;

        let js = jetstream::new(client.clone());
        *self.slots[idx].write().await = Some(Slot {
            client,
            jetstream: js,
        });
        Ok(())
    }

    fn is_healthy(slot: &Slot) -> bool {
        matches!(
            slot.client.connection_state(),
            async_nats::connection::State::Connected
        )
    }

    /// Returns a healthy JetStream context, rebuilding at most one unhealthy
    /// slot in place along the way. Fails only once every slot has been
    /// tried and found unusable.
    pub async fn jetstream(&self) -> Result<JetStreamContext, Error> {
        let size = self.slots.len();
        for _ in 0..size {
            let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % size;

            if let Some(js) = {
                let guard = self.slots[idx].read().await;
                guard
                    .as_ref()
                    .filter(|slot| Self::is_healthy(slot))
                    .map(|slot| slot.jetstream.clone())
            } {
                return Ok(js);
            }

            if self.rebuild_slot(idx).await.is_ok() {
                if let Some(js) = self.slots[idx]
                    .read()
                    .await
                    .as_ref()
                    .map(|slot| slot.jetstream.clone())
                {
                    return Ok(js);
                }
            }
        }
        Err(Error::PoolExhausted)
    }

    /// Drains and closes every connected slot.
    pub async fn shutdown(&self) {
        for slot in &self.slots {
            if let Some(slot) = slot.write().await.take() {
                if let Err(err) = slot.client.drain().await {
                    tracing::warn!(error = %err, "error draining nats connection on shutdown");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_name_matches_original_naming_scheme() {
        assert_eq!(ConnectionPool::slot_name(0), "SNS-API-Conn-0");
        assert_eq!(ConnectionPool::slot_name(7), "SNS-API-Conn-7");
    }
}
