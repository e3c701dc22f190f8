// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use crate::{EngineConfig, EventReceiver, Orchestrator};
use chore_core::{
    Assignee, AssigneeId, ChoreDefinition, ChoreEntry, ChoreEvent, ChoreSet, FakeClock,
};
use chore_storage::MemorySnapshotStore;
use chrono::{DateTime, TimeZone, Utc};

pub(crate) type TestOrchestrator = Orchestrator<MemorySnapshotStore, FakeClock>;

/// Monday 2026-03-02 09:00 UTC
pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

/// Drive a future to completion from a synchronous test
pub(crate) fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

pub(crate) fn ids(names: &[&str]) -> Vec<AssigneeId> {
    names.iter().map(|n| AssigneeId::from(*n)).collect()
}

pub(crate) fn id(name: &str) -> AssigneeId {
    AssigneeId::from(name)
}

/// Ada, Ben and Cy plus the given chores
pub(crate) fn household(chores: Vec<ChoreDefinition>) -> ChoreSet {
    let mut set = ChoreSet::default();
    for (key, name) in [("ada", "Ada"), ("ben", "Ben"), ("cy", "Cy")] {
        set.assignees.insert(
            key.into(),
            Assignee {
                id: key.into(),
                name: name.into(),
            },
        );
    }
    for definition in chores {
        set.chores
            .insert(definition.id.clone(), ChoreEntry::new(definition));
    }
    set
}

pub(crate) struct Harness {
    pub orch: TestOrchestrator,
    pub store: MemorySnapshotStore,
    pub clock: FakeClock,
    pub events: EventReceiver,
}

impl Harness {
    pub fn new(chores: Vec<ChoreDefinition>) -> Self {
        Self::with_config(chores, EngineConfig::default())
    }

    pub fn with_config(chores: Vec<ChoreDefinition>, config: EngineConfig) -> Self {
        let store = MemorySnapshotStore::new();
        let clock = FakeClock::at(t0());
        let orch = Orchestrator::new(store.clone(), clock.clone(), config, household(chores));
        let events = orch.bus().watch_all();
        Self {
            orch,
            store,
            clock,
            events,
        }
    }

    /// Events announced since the last drain
    pub fn drain(&mut self) -> Vec<ChoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn drain_names(&mut self) -> Vec<&'static str> {
        self.drain().iter().map(ChoreEvent::name).collect()
    }
}
