// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive claim on a snapshot file
//!
//! Whoever holds the lock is the only writer of the snapshot: `chored` for
//! its whole lifetime, or a single `chores` invocation when no daemon runs.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Lock file that sits beside the snapshot
pub fn lock_path(data_path: &Path) -> PathBuf {
    data_path.with_extension("lock")
}

/// Released on drop
#[derive(Debug)]
pub struct DataLock {
    _file: File,
    path: PathBuf,
}

impl DataLock {
    /// Take the lock if nobody holds it
    pub fn try_acquire(data_path: &Path) -> io::Result<Option<Self>> {
        let (file, path) = open(data_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file, path })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Wait until the current holder lets go
    pub async fn acquire(data_path: &Path) -> io::Result<Self> {
        let (file, path) = open(data_path)?;
        let file = tokio::task::spawn_blocking(move || file.lock_exclusive().map(|()| file))
            .await
            .map_err(io::Error::other)??;
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open(data_path: &Path) -> io::Result<(File, PathBuf)> {
    let path = lock_path(data_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)?;
    Ok((file, path))
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
