// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, ticks, shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::Duration;

use chore_core::schedule::next_local_midnight;
use chore_core::{Clock, ScanTrigger, SystemClock};
use chore_engine::{ChoreError, EventLog, Orchestrator, TickReport};
use chore_storage::{JsonSnapshotStore, TracedSnapshotStore};
use chrono::{DateTime, FixedOffset, Utc};
use fs2::FileExt;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::lock::DataLock;

/// Orchestrator with the daemon's concrete store (wrapped with tracing)
pub type DaemonOrchestrator<C = SystemClock> =
    Orchestrator<TracedSnapshotStore<JsonSnapshotStore>, C>;

/// Fallback wait when the next midnight cannot be computed
const MIDNIGHT_FALLBACK: Duration = Duration::from_secs(3600);
/// Land just past the boundary so the tick sees the new local date
const MIDNIGHT_SETTLE: Duration = Duration::from_secs(1);

/// Running daemon state
pub struct Daemon<C: Clock = SystemClock> {
    pub config: DaemonConfig,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    // Sole writer of the snapshot while running
    #[allow(dead_code)]
    data_lock: DataLock,
    pub listener: UnixListener,
    pub orchestrator: DaemonOrchestrator<C>,
    /// Set by a client's shutdown request; the main loop exits after replying
    pub shutdown_requested: bool,
}

impl<C: Clock> Daemon<C> {
    /// Run one tick; failures are logged and the tick skipped
    pub async fn tick(&self, trigger: ScanTrigger) -> Option<TickReport> {
        match self.orchestrator.run_tick(trigger).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(%trigger, "tick failed, skipping: {}", e);
                None
            }
        }
    }

    /// Time left until just after the next local midnight
    pub fn until_midnight(&self) -> Duration {
        until_next_midnight(self.orchestrator.clock().now(), self.config.engine.offset())
    }

    /// Shutdown the daemon gracefully
    pub fn shutdown(&self) {
        info!("Shutting down daemon...");

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        if self.config.pid_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.pid_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Locks are released when the daemon is dropped
        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("tick_interval must be greater than zero")]
    ZeroTickInterval,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] ChoreError),
}

/// Start the daemon on the system clock
pub async fn startup(config: &DaemonConfig) -> Result<Daemon, DaemonError> {
    startup_with_clock(config, SystemClock).await
}

/// Start the daemon on the given clock
pub async fn startup_with_clock<C: Clock>(
    config: &DaemonConfig,
    clock: C,
) -> Result<Daemon<C>, DaemonError> {
    match startup_inner(config, clock).await {
        Ok(daemon) => Ok(daemon),
        Err(e) => {
            // A held lock means another daemon owns the PID file
            if !matches!(e, DaemonError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner<C: Clock>(
    config: &DaemonConfig,
    clock: C,
) -> Result<Daemon<C>, DaemonError> {
    // 1. Create directories
    for path in [&config.pid_path, &config.data_path, &config.socket_path] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // 2. Acquire lock file FIRST - prevents two daemons ticking one snapshot
    let mut lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.pid_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(DaemonError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Wait out any `chores` run still writing the snapshot
    let data_lock = DataLock::acquire(&config.data_path).await?;

    // 4. Load the snapshot
    let store = TracedSnapshotStore::new(JsonSnapshotStore::new(&config.data_path));
    let mut orchestrator = Orchestrator::load(store, clock, config.engine.clone()).await?;

    // 5. Attach the journal
    if let Some(journal_path) = &config.journal_path {
        if let Some(parent) = journal_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        orchestrator = orchestrator.with_journal(EventLog::open(journal_path)?);
    }

    // 6. Bind the socket last; a connectable socket means ready to serve
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)?;

    info!(
        data = %config.data_path.display(),
        socket = %config.socket_path.display(),
        tick_interval = ?config.tick_interval,
        "Daemon started"
    );

    Ok(Daemon {
        config: config.clone(),
        lock_file,
        data_lock,
        listener,
        orchestrator,
        shutdown_requested: false,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &DaemonConfig) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.pid_path.exists() {
        let _ = std::fs::remove_file(&config.pid_path);
    }
}

/// Wait from `now` until just past the next local midnight
pub fn until_next_midnight(now: DateTime<Utc>, offset: FixedOffset) -> Duration {
    next_local_midnight(now, offset)
        .and_then(|midnight| (midnight - now).to_std().ok())
        .map_or(MIDNIGHT_FALLBACK, |wait| wait + MIDNIGHT_SETTLE)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
