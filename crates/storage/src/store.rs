// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The durable-store collaborator

use async_trait::async_trait;
use chore_core::ChoreSet;
use std::io;
use thiserror::Error;
use tokio::sync::watch;

/// Errors that can occur loading or persisting a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads and persists the full record set
///
/// Listeners are told about every persisted (or attempted) snapshot through
/// a revision counter, so readers can refresh without polling the file.
#[async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Load the last persisted snapshot; a missing store yields an empty set
    async fn load_snapshot(&self) -> Result<ChoreSet, StorageError>;

    /// Persist the whole record set, replacing the previous snapshot
    async fn persist_snapshot(&self, set: &ChoreSet) -> Result<(), StorageError>;

    /// Tell listeners the record set changed
    fn notify_listeners(&self, set: &ChoreSet);

    /// Receive a revision number each time listeners are notified
    fn subscribe(&self) -> watch::Receiver<u64>;
}

/// Shared listener plumbing for store implementations
#[derive(Debug)]
pub(crate) struct Listeners {
    revision: watch::Sender<u64>,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self { revision }
    }

    pub(crate) fn notify(&self, set: &ChoreSet) {
        self.revision.send_modify(|r| *r += 1);
        tracing::debug!(
            revision = *self.revision.borrow(),
            chores = set.chores.len(),
            "listeners notified"
        );
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
