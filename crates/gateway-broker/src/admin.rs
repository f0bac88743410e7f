//! Stream lifecycle management: create, delete, list.
//!
//! Every created stream uses the same fixed policy, grounded in the
//! original `natsRepo.CreateStream`'s `jetstream.StreamConfig`: file
//! storage, a single replica, limits-based retention that discards the
//! oldest message once a limit is hit, no size/count ceiling beyond a
//! 96-hour max age and a 256 KiB max message size, and de-duplication
//! disabled.

use crate::Error;
use crate::pool::ConnectionPool;
use async_nats::jetstream::stream::{Config as StreamConfig, DiscardPolicy, RetentionPolicy, StorageType};
use futures::StreamExt;
use std::time::Duration;

const MAX_AGE: Duration = Duration::from_secs(96 * 3600);
const MAX_MESSAGE_SIZE: i32 = 262_144;

fn stream_config(name: &str) -> StreamConfig {
    StreamConfig {
        name: name.to_string(),
        subjects: vec![name.to_string()],
        retention: RetentionPolicy::Limits,
        storage: StorageType::File,
        num_replicas: 1,
        discard: DiscardPolicy::Old,
        max_messages: -1,
        max_messages_per_subject: -1,
        max_bytes: -1,
        max_age: MAX_AGE,
        max_message_size: MAX_MESSAGE_SIZE,
        duplicate_window: Duration::from_secs(0),
        allow_rollup: false,
        deny_delete: false,
        deny_purge: false,
        ..Default::default()
    }
}

/// Creates (or returns the existing) stream named `name`.
pub async fn create_stream(pool: &ConnectionPool, name: &str) -> Result<(), Error> {
    let js = pool.jetstream().await?;
    js.get_or_create_stream(stream_config(name))
        .await
        .map_err(|source| Error::StreamCreate {
            name: name.to_string(),
            message: source.to_string(),
        })?;
    Ok(())
}

/// Deletes the stream named `name`.
pub async fn delete_stream(pool: &ConnectionPool, name: &str) -> Result<(), Error> {
    let js = pool.jetstream().await?;
    js.delete_stream(name)
        .await
        .map_err(|source| Error::StreamDelete {
            name: name.to_string(),
            message: source.to_string(),
        })?;
    Ok(())
}

/// Lists every stream name known to the broker.
pub async fn list_stream_names(pool: &ConnectionPool) -> Result<Vec<String>, Error> {
    let js = pool.jetstream().await?;
    let mut names = js.stream_names();
    let mut result = Vec::new();
    while let Some(name) = names.next().await {
        let name = name.map_err(|source| Error::StreamList {
            message: source.to_string(),
        })?;
        result.push(name);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_config_matches_fixed_policy() {
        let config = stream_config("orders");
        assert_eq!(config.name, "orders");
        assert_eq!(config.subjects, vec!["orders".to_string()]);
        assert!(matches!(config.retention, RetentionPolicy::Limits));
        assert!(matches!(config.storage, StorageType::File));
        assert_eq!(config.num_replicas, 1);
        assert!(matches!(config.discard, DiscardPolicy::Old));
        assert_eq!(config.max_messages, -1);
        assert_eq!(config.max_messages_per_subject, -1);
        assert_eq!(config.max_bytes, -1);
        assert_eq!(config.max_age, MAX_AGE);
        assert_eq!(config.max_message_size, MAX_MESSAGE_SIZE);
        assert_eq!(config.duplicate_window, Duration::from_secs(0));
        assert!(!config.allow_rollup);
        assert!(!config.deny_delete);
        assert!(!config.deny_purge);
    }
}
