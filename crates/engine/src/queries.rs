// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only queries over the derived chore state

use crate::error::ChoreError;
use crate::orchestrator::Orchestrator;
use chore_core::{
    can_approve, can_claim, global_state, AssigneeId, BlockReason, ChoreEntry, ChoreId, ChoreSet,
    ChoreState, Clock, GlobalState, LockReason,
};
use chore_storage::SnapshotStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a status view needs for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreStatus {
    pub chore_id: ChoreId,
    pub assignee_id: AssigneeId,
    pub state: ChoreState,
    pub lock_reason: Option<LockReason>,
    pub global_state: GlobalState,
    pub due_date: Option<DateTime<Utc>>,
    pub due_window_start: Option<DateTime<Utc>>,
    /// Why a claim would be refused right now
    pub claim_block: Option<BlockReason>,
    pub pending_claims: u32,
    pub streak: u32,
}

/// A claim waiting for an approver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingApproval {
    pub chore_id: ChoreId,
    pub assignee_id: AssigneeId,
    pub claimed_at: Option<DateTime<Utc>>,
    pub pending_claims: u32,
}

fn entry<'a>(set: &'a ChoreSet, chore: &ChoreId) -> Result<&'a ChoreEntry, ChoreError> {
    set.entry(chore)
        .ok_or_else(|| ChoreError::ChoreNotFound(chore.clone()))
}

fn status(entry: &ChoreEntry, assignee: &AssigneeId, now: DateTime<Utc>) -> ChoreStatus {
    let definition = &entry.definition;
    let (state, lock_reason) = entry.resolve(assignee, now);
    let record = entry.record(assignee);
    ChoreStatus {
        chore_id: definition.id.clone(),
        assignee_id: assignee.clone(),
        state,
        lock_reason,
        global_state: global_state(entry, now),
        due_date: definition.due_date_for(assignee),
        due_window_start: definition.due_window_start_for(assignee),
        claim_block: can_claim(entry, assignee, now).err(),
        pending_claims: record.map_or(0, |r| r.pending_claim_count),
        streak: record.map_or(0, |r| r.current_streak),
    }
}

impl<S, C> Orchestrator<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    pub fn can_claim(&self, assignee: &AssigneeId, chore: &ChoreId) -> Result<(), ChoreError> {
        let now = self.now();
        self.read(|set| Ok(can_claim(entry(set, chore)?, assignee, now)?))
    }

    pub fn can_approve(&self, assignee: &AssigneeId, chore: &ChoreId) -> Result<(), ChoreError> {
        self.read(|set| Ok(can_approve(entry(set, chore)?, assignee)?))
    }

    /// Derived status for every assigned pair, optionally for one assignee
    pub fn get_chore_status_context(&self, assignee: Option<&AssigneeId>) -> Vec<ChoreStatus> {
        let now = self.now();
        self.read(|set| {
            set.chores
                .values()
                .flat_map(|e| {
                    e.definition
                        .assigned
                        .iter()
                        .filter(|a| assignee.map_or(true, |only| only == *a))
                        .map(move |a| status(e, a, now))
                })
                .collect()
        })
    }

    /// The due date that applies to an assignee
    pub fn get_due_date(
        &self,
        chore: &ChoreId,
        assignee: &AssigneeId,
    ) -> Result<Option<DateTime<Utc>>, ChoreError> {
        self.read(|set| Ok(entry(set, chore)?.definition.due_date_for(assignee)))
    }

    pub fn get_due_window_start(
        &self,
        chore: &ChoreId,
        assignee: &AssigneeId,
    ) -> Result<Option<DateTime<Utc>>, ChoreError> {
        self.read(|set| Ok(entry(set, chore)?.definition.due_window_start_for(assignee)))
    }

    /// Claims waiting for approval, oldest first
    pub fn get_pending_approvals(&self) -> Vec<PendingApproval> {
        let mut pending: Vec<PendingApproval> = self.read(|set| {
            set.chores
                .values()
                .flat_map(|e| {
                    e.records
                        .iter()
                        .filter(|(a, r)| r.has_pending_claim() && e.definition.is_assigned(a))
                        .map(|(a, r)| PendingApproval {
                            chore_id: e.id().clone(),
                            assignee_id: a.clone(),
                            claimed_at: r.last_claimed,
                            pending_claims: r.pending_claim_count,
                        })
                })
                .collect()
        });
        pending.sort_by_key(|p| p.claimed_at);
        pending
    }
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
