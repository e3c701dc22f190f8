// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::store::{SnapshotStore, StorageError};
use async_trait::async_trait;
use chore_core::ChoreSet;
use tokio::sync::watch;
use tracing::Instrument;

/// Wrapper that adds tracing to any SnapshotStore
#[derive(Clone)]
pub struct TracedSnapshotStore<S> {
    inner: S,
}

impl<S> TracedSnapshotStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SnapshotStore> SnapshotStore for TracedSnapshotStore<S> {
    async fn load_snapshot(&self) -> Result<ChoreSet, StorageError> {
        let start = std::time::Instant::now();
        let result = self.inner.load_snapshot().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(set) => tracing::info!(
                chores = set.chores.len(),
                assignees = set.assignees.len(),
                elapsed_ms,
                "snapshot loaded"
            ),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "snapshot load failed"),
        }
        result
    }

    async fn persist_snapshot(&self, set: &ChoreSet) -> Result<(), StorageError> {
        let span = tracing::debug_span!("snapshot.persist", chores = set.chores.len());

        let start = std::time::Instant::now();
        let result = self.inner.persist_snapshot(set).instrument(span).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms, "snapshot persisted"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "snapshot persist failed"),
        }
        result
    }

    fn notify_listeners(&self, set: &ChoreSet) {
        self.inner.notify_listeners(set);
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
