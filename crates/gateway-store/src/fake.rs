//! An in-memory [`StatusStore`] used by dispatcher/HTTP tests in place of a
//! live Valkey instance.

use crate::{AckResult, Error, StatusStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    result: AckResult,
    expires_at: Instant,
}

/// Not TTL-accurate to the millisecond, but expires entries on read, which
/// is all the dispatcher/HTTP tests need.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for InMemoryStore {
    async fn store_ack_result(
        &self,
        id: &str,
        result: &AckResult,
        ttl: Duration,
    ) -> Result<(), Error> {
        let mut entries = self.entries.lock().expect("in-memory store lock poisoned");
        entries.insert(
            id.to_string(),
            Entry {
                result: result.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get_ack_result(&self, id: &str) -> Result<Option<AckResult>, Error> {
        let mut entries = self.entries.lock().expect("in-memory store lock poisoned");
        match entries.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.result.clone())),
            Some(_) => {
                entries.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_reads_back() {
        let store = InMemoryStore::new();
        store
            .store_ack_result("id-1", &AckResult::ack(7), Duration::from_secs(30))
            .await
            .unwrap();

        let result = store.get_ack_result("id-1").await.unwrap();
        assert_eq!(result, Some(AckResult::ack(7)));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_ack_result("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_reads_back_as_none() {
        let store = InMemoryStore::new();
        store
            .store_ack_result("id-1", &AckResult::pending(), Duration::from_millis(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.get_ack_result("id-1").await.unwrap(), None);
    }
}
