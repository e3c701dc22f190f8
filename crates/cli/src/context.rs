// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reaching the record set for one invocation
//!
//! When `chored` serves the snapshot every operation goes over its socket.
//! Otherwise the invocation takes the snapshot lock and works in-process.

use crate::client::{timeout_connect, ClientError, DaemonClient};
use anyhow::{anyhow, bail, Context};
use chore_core::{AssigneeId, ChoreDefinition, ChoreEvent, ChoreId, Clock};
use chore_daemon::{execute, socket_path_for, DataLock, Operation, Outcome};
use chore_engine::{EngineConfig, Orchestrator};
use chore_storage::JsonSnapshotStore;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// The wall clock, or the instant given with `--now`
#[derive(Debug, Clone, Copy)]
pub struct InvocationClock {
    pinned: Option<DateTime<Utc>>,
}

impl Clock for InvocationClock {
    fn now(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }
}

pub type CliOrchestrator = Orchestrator<JsonSnapshotStore, InvocationClock>;

/// Where the snapshot lives and how this invocation sees it
pub struct Target {
    pub data: PathBuf,
    /// Daemon socket; defaults to one beside the data file
    pub socket: Option<PathBuf>,
    pub now: Option<DateTime<Utc>>,
    pub config: EngineConfig,
}

impl Target {
    pub fn socket_path(&self) -> PathBuf {
        self.socket
            .clone()
            .unwrap_or_else(|| socket_path_for(&self.data))
    }
}

enum Backend {
    Served(DaemonClient),
    Local {
        orchestrator: Box<CliOrchestrator>,
        // Held until the invocation ends
        _lock: DataLock,
    },
}

/// The household as one invocation sees it
pub struct Household {
    backend: Backend,
    announced: Vec<ChoreEvent>,
}

impl Household {
    /// Use the daemon if one answers; otherwise open the snapshot locally
    pub async fn open(target: &Target) -> anyhow::Result<Self> {
        let socket = target.socket_path();
        match DaemonClient::connect(&socket).await {
            Ok(client) => return Self::served(client, target),
            Err(ClientError::DaemonNotRunning) => {}
            Err(e) => return Err(e).context("failed to reach chored"),
        }

        let lock = DataLock::try_acquire(&target.data)
            .with_context(|| format!("failed to lock {}", target.data.display()))?;
        let Some(lock) = lock else {
            // A daemon that has the lock but has not bound its socket yet
            let client = DaemonClient::connect_with_retry(&socket, timeout_connect())
                .await
                .with_context(|| format!("{} is locked by another process", target.data.display()))?;
            return Self::served(client, target);
        };

        let orchestrator = open(&target.data, target.now, target.config.clone()).await?;
        Ok(Self {
            backend: Backend::Local {
                orchestrator: Box::new(orchestrator),
                _lock: lock,
            },
            announced: Vec::new(),
        })
    }

    fn served(client: DaemonClient, target: &Target) -> anyhow::Result<Self> {
        if target.now.is_some() {
            bail!(
                "--now cannot be used while chored serves {}",
                client.socket_path().display()
            );
        }
        Ok(Self {
            backend: Backend::Served(client),
            announced: Vec::new(),
        })
    }

    /// Apply one operation and keep the events it announced
    pub async fn run(&mut self, operation: Operation) -> anyhow::Result<Outcome> {
        let (outcome, events) = match &self.backend {
            Backend::Served(client) => client.run(operation).await?,
            Backend::Local { orchestrator, .. } => execute(&**orchestrator, operation).await?,
        };
        self.announced.extend(events);
        Ok(outcome)
    }

    /// Run an operation that only reports success
    pub async fn apply(&mut self, operation: Operation) -> anyhow::Result<()> {
        match self.run(operation).await? {
            Outcome::Done => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn definition(&mut self, chore: &ChoreId) -> anyhow::Result<Option<ChoreDefinition>> {
        let query = Operation::Definition {
            chore: chore.clone(),
        };
        match self.run(query).await? {
            Outcome::Definition { definition } => Ok(definition.map(|d| *d)),
            other => Err(unexpected(&other)),
        }
    }

    /// Every event announced by this invocation, in order
    pub fn announced(&self) -> &[ChoreEvent] {
        &self.announced
    }
}

pub fn unexpected(outcome: &Outcome) -> anyhow::Error {
    anyhow!("unexpected reply: {:?}", outcome)
}

/// Load the snapshot at `data`; a missing file is an empty household
pub async fn open(
    data: &Path,
    now: Option<DateTime<Utc>>,
    config: EngineConfig,
) -> anyhow::Result<CliOrchestrator> {
    let store = JsonSnapshotStore::new(data);
    let clock = InvocationClock { pinned: now };
    Orchestrator::load(store, clock, config)
        .await
        .with_context(|| format!("failed to load {}", data.display()))
}

/// Positional `<chore> <assignee>` pair
#[derive(clap::Args)]
pub struct PairArgs {
    /// Chore id
    pub chore: String,
    /// Assignee id
    pub assignee: String,
}

impl PairArgs {
    pub fn ids(&self) -> (ChoreId, AssigneeId) {
        (
            ChoreId::from(self.chore.as_str()),
            AssigneeId::from(self.assignee.as_str()),
        )
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
