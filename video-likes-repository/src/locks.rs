//! Per-item critical sections.
//!
//! Toggles on the same video are serialized; toggles on different videos run
//! concurrently. This only covers writers inside one process. Writers in other
//! processes still race against the store's last-write-wins semantics.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily created async mutex per item id.
#[derive(Debug, Default)]
pub struct ItemLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `item_id`.
    ///
    /// The item stays locked until the returned guard is dropped.
    pub async fn acquire(&self, item_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(item_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop locks that nobody holds or waits on.
    pub async fn release_idle(&self) {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of items with a live lock.
    pub async fn active_items(&self) -> usize {
        self.locks.lock().await.len()
    }
}
