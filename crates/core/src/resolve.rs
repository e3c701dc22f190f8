// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side state resolution and claim/approve checks
//!
//! Rotation turns, due-window locks, and missed locks are not visible in a
//! record's stored state. They are folded in here, on every read.

use crate::chore::{ChoreDefinition, OverdueHandling};
use crate::id::AssigneeId;
use crate::record::ChoreState;
use crate::snapshot::ChoreEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a pair cannot currently be claimed, independent of other assignees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    WaitingForWindow,
    NotMyTurn,
    Missed,
}

/// A refused claim or approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    #[error("assignee is not assigned to this chore")]
    NotAssigned,
    #[error("chore is already claimed")]
    AlreadyClaimed,
    #[error("a claim is already waiting for approval")]
    PendingClaimExists,
    #[error("chore was already approved this period")]
    AlreadyApprovedInPeriod,
    #[error("chore was claimed or completed by another assignee")]
    CompletedByOther,
    #[error("chore cannot be claimed before its due window opens")]
    WaitingForWindow,
    #[error("it is another assignee's turn")]
    NotMyTurn,
    #[error("chore was missed and is locked until the next reset")]
    Missed,
}

impl From<LockReason> for BlockReason {
    fn from(reason: LockReason) -> Self {
        match reason {
            LockReason::WaitingForWindow => BlockReason::WaitingForWindow,
            LockReason::NotMyTurn => BlockReason::NotMyTurn,
            LockReason::Missed => BlockReason::Missed,
        }
    }
}

/// Stored facts about one pair that resolution depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairFacts {
    pub stored: ChoreState,
    pub approved_in_period: bool,
    pub pending_claim: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub due_window_start: Option<DateTime<Utc>>,
}

impl PairFacts {
    pub fn for_assignee(entry: &ChoreEntry, assignee: &AssigneeId) -> Self {
        let record = entry.record(assignee);
        Self {
            stored: record.map(|r| r.state).unwrap_or_default(),
            approved_in_period: record.is_some_and(|r| r.is_approved_in_period()),
            pending_claim: record.is_some_and(|r| r.has_pending_claim()),
            due_date: entry.definition.due_date_for(assignee),
            due_window_start: entry.definition.due_window_start_for(assignee),
        }
    }
}

/// Locks that apply regardless of what other assignees did
pub fn lock_reason(
    definition: &ChoreDefinition,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
    facts: &PairFacts,
) -> Option<LockReason> {
    if facts.stored == ChoreState::Missed
        && definition.overdue_handling == OverdueHandling::MarkMissedAndLock
    {
        return Some(LockReason::Missed);
    }
    if definition.criteria.is_rotation()
        && !definition.is_cycle_open(now)
        && definition.rotation.turn.as_ref() != Some(assignee)
    {
        return Some(LockReason::NotMyTurn);
    }
    if definition.claim_locked_until_window
        && facts.due_window_start.is_some_and(|start| now < start)
    {
        return Some(LockReason::WaitingForWindow);
    }
    None
}

/// Resolve the state an assignee sees, plus any lock on claiming
pub fn resolve_assignee_chore_state(
    definition: &ChoreDefinition,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
    facts: &PairFacts,
) -> (ChoreState, Option<LockReason>) {
    if facts.approved_in_period {
        return (ChoreState::Approved, None);
    }
    if facts.pending_claim {
        return (ChoreState::Claimed, None);
    }
    match lock_reason(definition, assignee, now, facts) {
        Some(LockReason::Missed) => return (ChoreState::Missed, Some(LockReason::Missed)),
        Some(LockReason::NotMyTurn) => return (ChoreState::NotMyTurn, Some(LockReason::NotMyTurn)),
        Some(LockReason::WaitingForWindow) => {
            return (ChoreState::Waiting, Some(LockReason::WaitingForWindow))
        }
        None => {}
    }
    match facts.stored {
        ChoreState::Overdue | ChoreState::Missed => (facts.stored, None),
        _ if definition.overdue_handling.marks_overdue()
            && facts.due_date.is_some_and(|due| now >= due) =>
        {
            (ChoreState::Overdue, None)
        }
        _ => (ChoreState::Pending, None),
    }
}

impl ChoreEntry {
    /// Resolved state for one assignee
    pub fn resolve(
        &self,
        assignee: &AssigneeId,
        now: DateTime<Utc>,
    ) -> (ChoreState, Option<LockReason>) {
        let facts = PairFacts::for_assignee(self, assignee);
        resolve_assignee_chore_state(&self.definition, assignee, now, &facts)
    }

    /// Another assignee holds the claim or approval on a single-claimer chore
    ///
    /// Computed on read; never stored.
    pub fn completed_by_other(&self, assignee: &AssigneeId) -> bool {
        self.definition.criteria.is_single_claimer()
            && self
                .definition
                .assigned
                .iter()
                .filter(|a| *a != assignee)
                .any(|a| self.is_approved_in_period(a) || self.has_pending_claim(a))
    }
}

/// Whether `assignee` may claim the chore now
pub fn can_claim(
    entry: &ChoreEntry,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
) -> Result<(), BlockReason> {
    let definition = &entry.definition;
    if !definition.is_assigned(assignee) {
        return Err(BlockReason::NotAssigned);
    }
    let facts = PairFacts::for_assignee(entry, assignee);
    let multi = definition.approval_reset.allows_multiple_claims();

    if entry.completed_by_other(assignee) {
        return Err(BlockReason::CompletedByOther);
    }
    if facts.pending_claim && !multi {
        return Err(if facts.stored == ChoreState::Claimed {
            BlockReason::AlreadyClaimed
        } else {
            BlockReason::PendingClaimExists
        });
    }
    if facts.approved_in_period && !multi {
        return Err(BlockReason::AlreadyApprovedInPeriod);
    }
    if let Some(reason) = lock_reason(definition, assignee, now, &facts) {
        return Err(reason.into());
    }
    Ok(())
}

/// Whether an approver may approve `assignee`'s chore now
///
/// A multi-claim chore that is already approved may be approved again only
/// while another claim is waiting.
pub fn can_approve(entry: &ChoreEntry, assignee: &AssigneeId) -> Result<(), BlockReason> {
    let definition = &entry.definition;
    if !definition.is_assigned(assignee) {
        return Err(BlockReason::NotAssigned);
    }
    let facts = PairFacts::for_assignee(entry, assignee);
    let multi = definition.approval_reset.allows_multiple_claims();

    if facts.approved_in_period && !(multi && facts.pending_claim) {
        return Err(BlockReason::AlreadyApprovedInPeriod);
    }
    if entry.completed_by_other(assignee) {
        return Err(BlockReason::CompletedByOther);
    }
    Ok(())
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
