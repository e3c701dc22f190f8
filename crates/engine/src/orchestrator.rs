// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator owning the shared chore record set
//!
//! Every mutation runs against a draft of the set under the state lock and
//! is swapped in only when it succeeds. The result is persisted before any
//! event is announced. User actions additionally hold per-pair locks from
//! validation through persist.
//!
//! A failed write keeps the change in memory and holds its events back.
//! The next write that lands, including one triggered by a mutation that
//! changed nothing, carries the change to the store and releases them.

use crate::config::EngineConfig;
use crate::error::ChoreError;
use crate::events::{EventBus, EventLog};
use crate::locks::{PairGuard, PairLocks};
use crate::mutation::Batch;
use chore_core::{
    AssigneeChoreRecord, AssigneeId, ChoreDefinition, ChoreEvent, ChoreId, ChoreSet, Clock,
    PairKey,
};
use chore_storage::SnapshotStore;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;

struct Ledger {
    set: ChoreSet,
    /// Bumped on every change that must reach the store
    revision: u64,
}

/// A successful mutation waiting for persist and announcement
pub(crate) struct Commit {
    revision: u64,
    snapshot: ChoreSet,
    events: Vec<ChoreEvent>,
}

/// Coordinates user actions and scheduled passes over one record set
pub struct Orchestrator<S: SnapshotStore, C: Clock> {
    store: S,
    clock: C,
    config: EngineConfig,
    ledger: Mutex<Ledger>,
    /// Latest revision known to be durably written
    persisted: AsyncMutex<u64>,
    /// Events of revisions whose write failed, oldest first
    held: Mutex<Vec<(u64, Vec<ChoreEvent>)>>,
    locks: PairLocks,
    bus: EventBus,
    journal: Option<Mutex<EventLog>>,
}

impl<S, C> Orchestrator<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, config: EngineConfig, mut set: ChoreSet) -> Self {
        for entry in set.chores.values_mut() {
            entry.definition.normalize_due_dates();
        }
        Self {
            store,
            clock,
            config,
            ledger: Mutex::new(Ledger { set, revision: 0 }),
            persisted: AsyncMutex::new(0),
            held: Mutex::new(Vec::new()),
            locks: PairLocks::new(),
            bus: EventBus::new(),
            journal: None,
        }
    }

    /// Create an orchestrator over the store's current snapshot
    pub async fn load(store: S, clock: C, config: EngineConfig) -> Result<Self, ChoreError> {
        let set = store.load_snapshot().await?;
        tracing::info!(
            chores = set.chores.len(),
            assignees = set.assignees.len(),
            "orchestrator loaded"
        );
        Ok(Self::new(store, clock, config, set))
    }

    /// Append every announced event to an audit log
    pub fn with_journal(mut self, journal: EventLog) -> Self {
        self.journal = Some(Mutex::new(journal));
        self
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn offset(&self) -> FixedOffset {
        self.config.offset()
    }

    /// A copy of the whole record set
    pub fn snapshot(&self) -> ChoreSet {
        self.read(ChoreSet::clone)
    }

    pub fn definition(&self, chore: &ChoreId) -> Option<ChoreDefinition> {
        self.read(|set| set.entry(chore).map(|e| e.definition.clone()))
    }

    pub fn record(&self, assignee: &AssigneeId, chore: &ChoreId) -> Option<AssigneeChoreRecord> {
        self.read(|set| set.entry(chore).and_then(|e| e.record(assignee).cloned()))
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&ChoreSet) -> T) -> T {
        let ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        f(&ledger.set)
    }

    pub(crate) async fn lock_pair(&self, assignee: &AssigneeId, chore: &ChoreId) -> PairGuard {
        self.locks
            .acquire(&PairKey::new(assignee.clone(), chore.clone()))
            .await
    }

    /// Lock every assigned pair of a chore
    pub(crate) async fn lock_chore(&self, chore: &ChoreId) -> Vec<PairGuard> {
        self.lock_chores(std::slice::from_ref(chore)).await
    }

    /// Lock every assigned pair of several chores in one ordered pass
    pub(crate) async fn lock_chores(&self, chores: &[ChoreId]) -> Vec<PairGuard> {
        let keys: Vec<PairKey> = self.read(|set| {
            chores
                .iter()
                .filter_map(|chore| set.entry(chore))
                .flat_map(|e| {
                    e.definition
                        .assigned
                        .iter()
                        .map(|a| PairKey::new(a.clone(), e.id().clone()))
                })
                .collect()
        });
        self.locks.acquire_all(keys).await
    }

    /// Lock every pair an assignee is assigned to
    pub(crate) async fn lock_assignee(&self, assignee: &AssigneeId) -> Vec<PairGuard> {
        let keys: Vec<PairKey> = self.read(|set| {
            set.chores
                .values()
                .filter(|e| e.definition.is_assigned(assignee))
                .map(|e| PairKey::new(assignee.clone(), e.id().clone()))
                .collect()
        });
        self.locks.acquire_all(keys).await
    }

    /// Apply `f` to a draft of the set; keep the draft only if `f` succeeds
    pub(crate) fn mutate<T>(
        &self,
        f: impl FnOnce(&mut ChoreSet, &mut Batch) -> Result<T, ChoreError>,
    ) -> Result<(T, Option<Commit>), ChoreError> {
        let mut ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        let mut draft = ledger.set.clone();
        let mut batch = Batch::default();
        let value = f(&mut draft, &mut batch)?;
        if !batch.dirty {
            return Ok((value, None));
        }
        ledger.revision += 1;
        ledger.set = draft;
        let commit = Commit {
            revision: ledger.revision,
            snapshot: ledger.set.clone(),
            events: batch.events,
        };
        Ok((value, Some(commit)))
    }

    /// Persist, notify listeners, then announce
    ///
    /// With no commit, a revision left unwritten by an earlier failure is
    /// flushed instead.
    pub(crate) async fn commit(&self, commit: Option<Commit>) -> Result<(), ChoreError> {
        let mut persisted = self.persisted.lock().await;
        let Some(commit) = commit.or_else(|| self.unwritten(*persisted)) else {
            return Ok(());
        };
        // A later revision may already have carried this change to the store
        if *persisted < commit.revision {
            let start = Instant::now();
            let result = self.store.persist_snapshot(&commit.snapshot).await;
            self.store.notify_listeners(&commit.snapshot);
            if let Err(e) = result {
                tracing::error!(
                    revision = commit.revision,
                    error = %e,
                    "failed to persist chore records"
                );
                self.hold(commit.revision, commit.events);
                return Err(e.into());
            }
            *persisted = commit.revision;
            tracing::debug!(
                revision = commit.revision,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "chore records persisted"
            );
        }
        let mut events = self.release(*persisted);
        events.extend(commit.events);
        self.announce(&events);
        Ok(())
    }

    /// The current set, when it is newer than the store's copy
    fn unwritten(&self, persisted: u64) -> Option<Commit> {
        let ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());
        (ledger.revision > persisted).then(|| Commit {
            revision: ledger.revision,
            snapshot: ledger.set.clone(),
            events: Vec::new(),
        })
    }

    fn hold(&self, revision: u64, events: Vec<ChoreEvent>) {
        if events.is_empty() {
            return;
        }
        tracing::warn!(revision, count = events.len(), "holding events until the next write");
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.push((revision, events));
    }

    /// Held events now covered by a durable write
    fn release(&self, persisted: u64) -> Vec<ChoreEvent> {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        let (ready, waiting): (Vec<_>, Vec<_>) =
            held.drain(..).partition(|(revision, _)| *revision <= persisted);
        *held = waiting;
        ready.into_iter().flat_map(|(_, events)| events).collect()
    }

    /// Events whose write has not landed yet
    pub fn held_event_count(&self) -> usize {
        let held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.iter().map(|(_, events)| events.len()).sum()
    }

    /// Mutate and commit in one step
    pub(crate) async fn apply<T>(
        &self,
        f: impl FnOnce(&mut ChoreSet, &mut Batch) -> Result<T, ChoreError>,
    ) -> Result<T, ChoreError> {
        let (value, commit) = self.mutate(f)?;
        self.commit(commit).await?;
        Ok(value)
    }

    fn announce(&self, events: &[ChoreEvent]) {
        let now = self.now();
        for event in events {
            if let Some(journal) = &self.journal {
                let mut journal = journal.lock().unwrap_or_else(|e| e.into_inner());
                if let Err(e) = journal.append(event, now) {
                    tracing::warn!(event = event.name(), error = %e, "failed to journal event");
                }
            }
            tracing::debug!(event = event.name(), chore = %event.chore_id(), "announcing");
            self.bus.publish(event);
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
