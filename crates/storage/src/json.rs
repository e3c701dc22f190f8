// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file snapshot store

use crate::store::{Listeners, SnapshotStore, StorageError};
use async_trait::async_trait;
use chore_core::ChoreSet;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Stores the record set as one pretty-printed JSON document
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    listeners: Listeners,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            listeners: Listeners::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load_snapshot(&self) -> Result<ChoreSet, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ChoreSet::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(ChoreSet::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn persist_snapshot(&self, set: &ChoreSet) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(set)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn notify_listeners(&self, set: &ChoreSet) {
        self.listeners.notify(set);
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.listeners.subscribe()
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
