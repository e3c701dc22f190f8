// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory snapshot store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::store::{Listeners, SnapshotStore, StorageError};
use async_trait::async_trait;
use chore_core::ChoreSet;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

#[derive(Debug)]
struct MemoryState {
    persisted: Mutex<Option<ChoreSet>>,
    persist_count: AtomicUsize,
    notify_count: AtomicUsize,
    fail_persist: AtomicBool,
    listeners: Listeners,
}

/// Keeps the last persisted snapshot in memory and can simulate failures
#[derive(Debug, Clone)]
pub struct MemorySnapshotStore {
    inner: Arc<MemoryState>,
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(MemoryState {
                persisted: Mutex::new(None),
                persist_count: AtomicUsize::new(0),
                notify_count: AtomicUsize::new(0),
                fail_persist: AtomicBool::new(false),
                listeners: Listeners::new(),
            }),
        }
    }
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `set`, as if loaded from disk
    pub fn with_snapshot(set: ChoreSet) -> Self {
        let store = Self::default();
        *store.lock() = Some(set);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ChoreSet>> {
        self.inner
            .persisted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Make every following persist fail with an IO error
    pub fn fail_persists(&self, fail: bool) {
        self.inner.fail_persist.store(fail, Ordering::SeqCst);
    }

    pub fn persist_count(&self) -> usize {
        self.inner.persist_count.load(Ordering::SeqCst)
    }

    pub fn notify_count(&self) -> usize {
        self.inner.notify_count.load(Ordering::SeqCst)
    }

    pub fn last_persisted(&self) -> Option<ChoreSet> {
        self.lock().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load_snapshot(&self) -> Result<ChoreSet, StorageError> {
        Ok(self.lock().clone().unwrap_or_default())
    }

    async fn persist_snapshot(&self, set: &ChoreSet) -> Result<(), StorageError> {
        if self.inner.fail_persist.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("simulated persist failure")));
        }
        *self.lock() = Some(set.clone());
        self.inner.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn notify_listeners(&self, set: &ChoreSet) {
        self.inner.notify_count.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.notify(set);
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.listeners.subscribe()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
