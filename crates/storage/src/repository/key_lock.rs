use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Idle entries are dropped once the map grows past this many keys.
const PRUNE_THRESHOLD: usize = 1024;

type Key = (String, String);

/// Async mutex per `(player_uuid, papi)` so that read-then-write sequences
/// for one key never interleave inside this process.
#[derive(Debug, Clone, Default)]
pub struct KeyLocks {
    locks: Arc<Mutex<HashMap<Key, Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, player_uuid: &str, papi: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds a reference to an idle lock.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry((player_uuid.to_string(), papi.to_string()))
                .or_default()
                .clone()
        };
        entry.lock_owned().await
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
