// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-pair mutation locks
//!
//! One async mutex per (assignee, chore) pair, created on first use and
//! never removed. A guard is held from validation through persist.

use chore_core::PairKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard for one locked pair
pub type PairGuard = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct PairLocks {
    locks: Mutex<HashMap<PairKey, Arc<AsyncMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, key: &PairKey) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(key.clone()).or_default())
    }

    /// Wait for exclusive access to one pair
    pub async fn acquire(&self, key: &PairKey) -> PairGuard {
        self.handle(key).lock_owned().await
    }

    /// Lock several pairs in key order so concurrent callers cannot deadlock
    pub async fn acquire_all(&self, keys: impl IntoIterator<Item = PairKey>) -> Vec<PairGuard> {
        let mut keys: Vec<PairKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in &keys {
            guards.push(self.acquire(key).await);
        }
        guards
    }

    /// Number of pairs that have ever been locked
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
