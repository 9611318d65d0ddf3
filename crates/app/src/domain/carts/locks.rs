//! Per-owner operation locks.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::carts::models::CartOwner;

/// Serialises operations on the same cart owner.
///
/// Owners without a pending or running operation are pruned on each acquire.
#[derive(Debug, Clone, Default)]
pub struct OwnerLocks {
    locks: Arc<Mutex<FxHashMap<CartOwner, Arc<Mutex<()>>>>>,
}

impl OwnerLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other operation holds `owner`'s lock.
    pub async fn acquire(&self, owner: CartOwner) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;

            locks.retain(|_, lock| Arc::strong_count(lock) > 1);

            Arc::clone(locks.entry(owner).or_default())
        };

        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
