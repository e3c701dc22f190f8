// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record-set mutations shared by user actions and scheduled passes
//!
//! Everything here runs against the in-memory set while the orchestrator
//! holds its state lock. Nothing here awaits, persists, or announces; events
//! are collected into a `Batch` and announced after the write lands.

use crate::error::ChoreError;
use chore_core::schedule::{self, local_date};
use chore_core::{
    calculate_streak, calculate_transition, can_approve, can_claim, decide_reset,
    select_next_turn, Action, ApprovalOrigin, AssigneeId, BlockReason, ChoreEntry, ChoreEvent,
    ChoreId, ChoreSet, ChoreState, CompletionCriteria, Ownership, ResetContext, ResetDecision,
    ResetTrigger, TransitionContext, TransitionEffect, UndoSnapshot,
};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;

/// Changes made under one state lock, waiting to be persisted and announced
#[derive(Debug, Default)]
pub(crate) struct Batch {
    pub events: Vec<ChoreEvent>,
    pub dirty: bool,
}

impl Batch {
    pub fn emit(&mut self, event: ChoreEvent) {
        self.dirty = true;
        self.events.push(event);
    }

    /// Mark the set changed without an announcement
    pub fn touch(&mut self) {
        self.dirty = true;
    }
}

/// Which records a reset clears
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResetScope {
    /// One independent assignee
    Pair(AssigneeId),
    /// Every assignee of a chore-level chore
    Chore,
}

pub(crate) fn display_name(set: &ChoreSet, assignee: &AssigneeId) -> String {
    set.assignee_name(assignee)
        .map(str::to_string)
        .unwrap_or_else(|| assignee.to_string())
}

pub(crate) fn entry_mut<'a>(
    set: &'a mut ChoreSet,
    chore: &ChoreId,
) -> Result<&'a mut ChoreEntry, ChoreError> {
    set.entry_mut(chore)
        .ok_or_else(|| ChoreError::ChoreNotFound(chore.clone()))
}

/// Refuse unknown people before any chore-level check
pub(crate) fn ensure_known(
    set: &ChoreSet,
    chore: &ChoreId,
    assignee: &AssigneeId,
) -> Result<(), ChoreError> {
    let entry = set
        .entry(chore)
        .ok_or_else(|| ChoreError::ChoreNotFound(chore.clone()))?;
    if !set.assignees.contains_key(assignee) && !entry.definition.is_assigned(assignee) {
        return Err(ChoreError::AssigneeNotFound(assignee.clone()));
    }
    Ok(())
}

fn own(existing: Option<Ownership>, name: &str, shared: bool) -> Ownership {
    match (shared, existing) {
        (true, Some(owners)) => owners.with(name),
        (true, None) => Ownership::Many(vec![name.to_string()]),
        (false, _) => Ownership::One(name.to_string()),
    }
}

pub(crate) fn apply_effects(entry: &mut ChoreEntry, effects: &[TransitionEffect]) {
    let shared = entry.definition.criteria == CompletionCriteria::Shared;
    for effect in effects {
        let record = entry.record_mut(&effect.assignee);
        if let Some(state) = effect.new_state {
            record.state = state;
        }
        if effect.clear_claimed_by {
            record.claimed_by = None;
        }
        if effect.clear_completed_by {
            record.completed_by = None;
        }
        if let Some(name) = &effect.set_claimed_by {
            record.claimed_by = Some(own(record.claimed_by.take(), name, shared));
        }
        if let Some(name) = &effect.set_completed_by {
            record.completed_by = Some(own(record.completed_by.take(), name, shared));
        }
    }
}

fn is_past_due(entry: &ChoreEntry, assignee: &AssigneeId, now: DateTime<Utc>) -> bool {
    entry
        .definition
        .due_date_for(assignee)
        .is_some_and(|due| now >= due)
}

/// Move a due date to the next occurrence after `now`
///
/// Non-recurring chores lose their due date.
pub(crate) fn reschedule_due(entry: &mut ChoreEntry, scope: &ResetScope, now: DateTime<Utc>) {
    let definition = &mut entry.definition;
    let current = match scope {
        ResetScope::Pair(assignee) => definition.due_date_for(assignee),
        ResetScope::Chore => definition.due_date,
    };
    let Some(due) = current else {
        return;
    };
    let next = schedule::next_due_after(due, &definition.recurrence, now);
    if next.is_none() && definition.recurrence.is_recurring() {
        tracing::warn!(chore = %definition.id, %due, "next due date out of range, clearing");
    }
    match scope {
        ResetScope::Pair(assignee) => definition.set_due_date_for(assignee, next),
        ResetScope::Chore => definition.due_date = next,
    }
}

/// Return the scope's records to pending and start a new approval period
pub(crate) fn reset_scope(
    entry: &mut ChoreEntry,
    scope: &ResetScope,
    now: DateTime<Utc>,
    reschedule: bool,
    batch: &mut Batch,
) -> Vec<AssigneeId> {
    let targets = match scope {
        ResetScope::Pair(assignee) => vec![assignee.clone()],
        ResetScope::Chore => entry.definition.assigned.clone(),
    };
    if *scope == ResetScope::Chore {
        entry.definition.approval_period_start = Some(now);
    }
    for assignee in &targets {
        let record = entry.record_mut(assignee);
        if record.is_dirty() {
            batch.emit(ChoreEvent::StatusReset {
                assignee_id: assignee.clone(),
                chore_id: entry.definition.id.clone(),
            });
        } else {
            batch.touch();
        }
        entry.record_mut(assignee).reset_to_pending(now);
    }
    if reschedule {
        reschedule_due(entry, scope, now);
    }
    targets
}

/// Hand the rotation turn on from `from`
pub(crate) fn advance_rotation(entry: &mut ChoreEntry, from: &AssigneeId, batch: &mut Batch) {
    let stats = entry.completion_stats();
    let Some((next, method)) = select_next_turn(&entry.definition, from, &stats) else {
        return;
    };
    let rotation = &mut entry.definition.rotation;
    let previous = rotation.turn.replace(next.clone());
    rotation.cycle_override = false;
    tracing::info!(chore = %entry.definition.id, %next, %method, "rotation advanced");
    batch.emit(ChoreEvent::RotationAdvanced {
        chore_id: entry.definition.id.clone(),
        previous_assignee_id: previous,
        new_assignee_id: Some(next),
        method,
    });
}

pub(crate) fn claim_pair(
    set: &mut ChoreSet,
    chore: &ChoreId,
    assignee: &AssigneeId,
    actor_name: &str,
    now: DateTime<Utc>,
    batch: &mut Batch,
) -> Result<(), ChoreError> {
    ensure_known(set, chore, assignee)?;
    let owner = display_name(set, assignee);
    let entry = entry_mut(set, chore)?;
    can_claim(entry, assignee, now)?;

    let current = entry.record(assignee).map(|r| r.state).unwrap_or_default();
    let effects = calculate_transition(
        &entry.definition,
        assignee,
        Action::Claim,
        TransitionContext {
            current,
            actor_name: &owner,
            is_past_due: is_past_due(entry, assignee, now),
        },
    );
    if effects.is_empty() {
        return Err(ChoreError::IllegalTransition {
            action: "claim",
            state: current,
        });
    }
    apply_effects(entry, &effects);

    let record = entry.record_mut(assignee);
    record.pending_claim_count = record.pending_claim_count.saturating_add(1);
    record.last_claimed = Some(now);

    tracing::info!(%chore, %assignee, actor_name, "chore claimed");
    batch.emit(ChoreEvent::Claimed {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        actor_name: actor_name.to_string(),
    });
    Ok(())
}

/// Parameters of one approval
#[derive(Debug, Clone, Copy)]
pub(crate) struct ApprovalRequest<'a> {
    pub assignee: &'a AssigneeId,
    pub approver_name: &'a str,
    pub points_override: Option<f64>,
    pub origin: ApprovalOrigin,
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    /// Apply the approval-time reset policy afterwards
    pub run_reset_policy: bool,
}

/// Approve one pair; returns false when it was already approved
pub(crate) fn approve_pair(
    set: &mut ChoreSet,
    chore: &ChoreId,
    req: &ApprovalRequest<'_>,
    batch: &mut Batch,
) -> Result<bool, ChoreError> {
    let assignee = req.assignee;
    ensure_known(set, chore, assignee)?;
    let owner = display_name(set, assignee);
    let entry = entry_mut(set, chore)?;

    match can_approve(entry, assignee) {
        Ok(()) => {}
        Err(BlockReason::AlreadyApprovedInPeriod) => {
            tracing::debug!(%chore, %assignee, "already approved, ignoring duplicate approval");
            return Ok(false);
        }
        Err(reason) => return Err(reason.into()),
    }

    let (previous_state, _) = entry.resolve(assignee, req.now);
    let record = entry.record(assignee).cloned().unwrap_or_default();
    // Streaks and due math use when the work happened, not when it was approved
    let work_ts = match record.last_claimed {
        Some(claimed) if record.has_pending_claim() => claimed,
        _ => req.now,
    };
    let due = entry.definition.due_date_for(assignee);

    let effects = calculate_transition(
        &entry.definition,
        assignee,
        Action::Approve,
        TransitionContext {
            current: record.state,
            actor_name: &owner,
            is_past_due: due.is_some_and(|d| req.now >= d),
        },
    );
    if effects.is_empty() {
        return Err(match record.state {
            ChoreState::Missed => BlockReason::Missed.into(),
            state => ChoreError::IllegalTransition {
                action: "approve",
                state,
            },
        });
    }
    apply_effects(entry, &effects);

    let definition = &entry.definition;
    let criteria = definition.criteria;
    let recurrence = definition.recurrence;
    let points = req.points_override.unwrap_or(definition.points);
    let is_multi_claim = definition.approval_reset.allows_multiple_claims();
    let work_date = local_date(work_ts, req.offset);

    let record = entry.record_mut(assignee);
    record.undo = Some(UndoSnapshot {
        streak: record.current_streak,
        longest_streak: record.longest_streak,
        missed_streak: record.current_missed_streak,
        last_completed: record.last_completed,
        points,
    });
    let previous_date = record.last_completed.map(|t| local_date(t, req.offset));
    record.current_streak =
        calculate_streak(record.current_streak, previous_date, work_date, &recurrence);
    record.longest_streak = record.longest_streak.max(record.current_streak);
    record.current_missed_streak = 0;
    record.total_completions = record.total_completions.saturating_add(1);
    record.pending_claim_count = record.pending_claim_count.saturating_sub(1);
    record.last_approved = Some(work_ts);
    record.last_completed = Some(work_ts);

    tracing::info!(
        %chore,
        %assignee,
        approver = req.approver_name,
        origin = ?req.origin,
        streak = record.current_streak,
        "chore approved"
    );
    batch.emit(ChoreEvent::Approved {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        approver_name: req.approver_name.to_string(),
        base_points: points,
        is_shared: criteria == CompletionCriteria::Shared,
        is_multi_claim,
        previous_state,
        effective_work_date: work_date,
        approval_origin: req.origin,
        notify_assignee: req.origin != ApprovalOrigin::AutoReset,
    });

    let completed: Option<Vec<AssigneeId>> = match criteria {
        CompletionCriteria::Shared => entry
            .all_approved()
            .then(|| entry.definition.assigned.clone()),
        _ => Some(vec![assignee.clone()]),
    };
    if let Some(assignee_ids) = completed {
        let streak_tallies: BTreeMap<AssigneeId, u32> = assignee_ids
            .iter()
            .map(|a| (a.clone(), entry.record(a).map_or(0, |r| r.current_streak)))
            .collect();
        batch.emit(ChoreEvent::Completed {
            chore_id: chore.clone(),
            assignee_ids,
            effective_date: work_date,
            streak_tallies,
        });
    }

    if req.run_reset_policy {
        apply_approval_reset(entry, assignee, work_ts, req.now, batch);
    }
    Ok(true)
}

/// Reset right after an approval when the policy says so
fn apply_approval_reset(
    entry: &mut ChoreEntry,
    approver: &AssigneeId,
    work_ts: DateTime<Utc>,
    now: DateTime<Utc>,
    batch: &mut Batch,
) {
    let definition = &entry.definition;
    let criteria = definition.criteria;
    let scope = if criteria == CompletionCriteria::Independent {
        ResetScope::Pair(approver.clone())
    } else {
        ResetScope::Chore
    };
    let has_pending_claim = match &scope {
        ResetScope::Pair(a) => entry.has_pending_claim(a),
        ResetScope::Chore => definition.assigned.iter().any(|a| entry.has_pending_claim(a)),
    };
    let ctx = ResetContext {
        trigger: ResetTrigger::Approval,
        reset_type: definition.approval_reset,
        overdue_handling: definition.overdue_handling,
        criteria,
        all_others_approved: entry.all_approved(),
        is_late: definition
            .due_date_for(approver)
            .is_some_and(|due| work_ts > due),
        has_pending_claim,
        disposition: definition.pending_claim_disposition,
    };

    let reschedule = match decide_reset(&ctx) {
        ResetDecision::ResetAndReschedule => true,
        ResetDecision::ResetOnly => false,
        ResetDecision::Hold | ResetDecision::AutoApprovePending => return,
    };
    if criteria.is_rotation() {
        advance_rotation(entry, approver, batch);
    }
    reset_scope(entry, &scope, now, reschedule, batch);
    tracing::info!(chore = %entry.definition.id, "reset on approval");
}

pub(crate) fn disapprove_pair(
    set: &mut ChoreSet,
    chore: &ChoreId,
    assignee: &AssigneeId,
    approver_name: &str,
    reason: Option<String>,
    now: DateTime<Utc>,
    batch: &mut Batch,
) -> Result<(), ChoreError> {
    ensure_known(set, chore, assignee)?;
    let owner = display_name(set, assignee);
    let entry = entry_mut(set, chore)?;
    if !entry.definition.is_assigned(assignee) {
        return Err(BlockReason::NotAssigned.into());
    }
    if !entry.has_pending_claim(assignee) {
        return Err(ChoreError::NoPendingClaim {
            assignee: assignee.clone(),
            chore: chore.clone(),
        });
    }

    let past_due = is_past_due(entry, assignee, now);
    let multi = entry.definition.approval_reset.allows_multiple_claims();
    let record = entry.record_mut(assignee);
    record.pending_claim_count -= 1;
    record.last_disapproved = Some(now);
    let remaining = record.pending_claim_count;
    let current = record.state;
    // A multi-claim pair keeps an approval it already earned this period
    let approved_earlier = multi && record.approved_since_period_start();

    if remaining == 0 {
        let effects = calculate_transition(
            &entry.definition,
            assignee,
            Action::Disapprove,
            TransitionContext {
                current,
                actor_name: &owner,
                is_past_due: past_due,
            },
        );
        apply_effects(entry, &effects);
        if approved_earlier {
            entry.record_mut(assignee).state = ChoreState::Approved;
        }
    }

    tracing::info!(%chore, %assignee, approver = approver_name, remaining, "claim disapproved");
    batch.emit(ChoreEvent::Disapproved {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        approver_name: approver_name.to_string(),
        reason,
    });
    Ok(())
}

pub(crate) fn undo_approval(
    set: &mut ChoreSet,
    chore: &ChoreId,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
    batch: &mut Batch,
) -> Result<f64, ChoreError> {
    ensure_known(set, chore, assignee)?;
    let owner = display_name(set, assignee);
    let entry = entry_mut(set, chore)?;
    if !entry.is_approved_in_period(assignee) {
        return Err(ChoreError::NotApproved {
            assignee: assignee.clone(),
            chore: chore.clone(),
        });
    }

    let effects = calculate_transition(
        &entry.definition,
        assignee,
        Action::Undo,
        TransitionContext {
            current: ChoreState::Approved,
            actor_name: &owner,
            is_past_due: is_past_due(entry, assignee, now),
        },
    );
    apply_effects(entry, &effects);

    let base_points = entry.definition.points;
    let record = entry.record_mut(assignee);
    let points = match record.undo.take() {
        Some(snapshot) => {
            record.current_streak = snapshot.streak;
            record.longest_streak = snapshot.longest_streak;
            record.current_missed_streak = snapshot.missed_streak;
            record.last_completed = snapshot.last_completed;
            record.last_approved = snapshot.last_completed;
            snapshot.points
        }
        None => base_points,
    };
    record.total_completions = record.total_completions.saturating_sub(1);

    batch.emit(ChoreEvent::Undone {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        points_to_reclaim: points,
    });
    Ok(points)
}

pub(crate) fn undo_claim(
    set: &mut ChoreSet,
    chore: &ChoreId,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
    batch: &mut Batch,
) -> Result<(), ChoreError> {
    ensure_known(set, chore, assignee)?;
    let owner = display_name(set, assignee);
    let entry = entry_mut(set, chore)?;
    if !entry.has_pending_claim(assignee) {
        return Err(ChoreError::NoPendingClaim {
            assignee: assignee.clone(),
            chore: chore.clone(),
        });
    }

    let past_due = is_past_due(entry, assignee, now);
    let multi = entry.definition.approval_reset.allows_multiple_claims();
    let record = entry.record_mut(assignee);
    record.pending_claim_count -= 1;
    if record.pending_claim_count == 0 {
        let current = record.state;
        let approved_earlier = multi && record.approved_since_period_start();
        let effects = calculate_transition(
            &entry.definition,
            assignee,
            Action::Undo,
            TransitionContext {
                current,
                actor_name: &owner,
                is_past_due: past_due,
            },
        );
        apply_effects(entry, &effects);
        if approved_earlier {
            entry.record_mut(assignee).state = ChoreState::Approved;
        }
    }

    batch.emit(ChoreEvent::StatusReset {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
    });
    Ok(())
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
