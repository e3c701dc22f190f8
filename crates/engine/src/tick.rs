// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled passes: boundary resets, overdue marking, due-soon notices
//!
//! Passes take no pair locks; they run from one scheduler context and
//! re-check every pair against the live set right before changing it, so
//! re-running a pass after a partial failure changes nothing twice.

use crate::error::ChoreError;
use crate::mutation::{self, entry_mut, ApprovalRequest, Batch, ResetScope};
use crate::orchestrator::Orchestrator;
use crate::scanner::{is_actionable, scan_time_checks, ScanEntry, TimeScan};
use chore_core::schedule::days_overdue;
use chore_core::{
    boundary_category, calculate_transition, decide_reset, is_reset_eligible, Action,
    ApprovalOrigin, AssigneeId, BoundaryCategory, ChoreEntry, ChoreEvent, ChoreId, ChoreSet,
    ChoreState, Clock, CompletionCriteria, DueNoticeKind, OverdueHandling, PairKey,
    ResetContext, ResetDecision, ResetTrigger, ScanTrigger, TransitionContext,
};
use chore_storage::SnapshotStore;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What the reset pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Pairs returned to pending
    pub reset_pairs: BTreeSet<PairKey>,
    /// Waiting claims approved before their reset
    pub auto_approved: usize,
    /// Misses recorded at the boundary
    pub missed: usize,
}

/// What the overdue pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverdueOutcome {
    pub overdue: usize,
    pub missed: usize,
}

/// Counts from one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub trigger: ScanTrigger,
    pub reset_pairs: usize,
    pub auto_approved: usize,
    pub overdue: usize,
    pub missed: usize,
    pub due_notices: usize,
}

struct BoundaryCtx<'a> {
    trigger: ScanTrigger,
    now: DateTime<Utc>,
    offset: FixedOffset,
    approver_name: &'a str,
}

fn unit_due(entry: &ChoreEntry, scope: &ResetScope) -> Option<DateTime<Utc>> {
    match scope {
        ResetScope::Pair(a) => entry.definition.due_date_for(a),
        ResetScope::Chore => entry.definition.due_date,
    }
}

/// The unit's completion condition for boundary purposes
fn unit_approved(entry: &ChoreEntry, scope: &ResetScope) -> bool {
    match scope {
        ResetScope::Pair(a) => entry.is_approved_in_period(a),
        ResetScope::Chore => match entry.definition.criteria {
            CompletionCriteria::Shared => entry.all_approved(),
            _ => entry.any_approved(),
        },
    }
}

fn unit_members(entry: &ChoreEntry, scope: &ResetScope) -> Vec<AssigneeId> {
    match scope {
        ResetScope::Pair(a) => vec![a.clone()],
        ResetScope::Chore => entry.definition.assigned.clone(),
    }
}

/// Who is charged with a miss when an unfinished unit is cleared
fn missers(entry: &ChoreEntry, scope: &ResetScope) -> Vec<AssigneeId> {
    let definition = &entry.definition;
    match scope {
        ResetScope::Pair(a) => vec![a.clone()],
        ResetScope::Chore => match definition.criteria {
            CompletionCriteria::RotationSimple | CompletionCriteria::RotationSmart => {
                definition.turn_holder().cloned().into_iter().collect()
            }
            CompletionCriteria::Shared => definition
                .assigned
                .iter()
                .filter(|a| !entry.is_approved_in_period(a))
                .cloned()
                .collect(),
            _ => definition.assigned.clone(),
        },
    }
}

fn category_decision(category: BoundaryCategory) -> ResetDecision {
    match category {
        BoundaryCategory::Hold => ResetDecision::Hold,
        BoundaryCategory::ClearOnly => ResetDecision::ResetOnly,
        BoundaryCategory::ClearAndReschedule => ResetDecision::ResetAndReschedule,
    }
}

fn record_miss(
    entry: &mut ChoreEntry,
    assignee: &AssigneeId,
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    reason: &str,
    batch: &mut Batch,
) {
    let record = entry.record_mut(assignee);
    record.record_missed(now);
    let tally = record.current_missed_streak;
    tracing::info!(chore = %entry.definition.id, %assignee, tally, reason, "chore missed");
    batch.emit(ChoreEvent::Missed {
        assignee_id: assignee.clone(),
        chore_id: entry.definition.id.clone(),
        missed_streak_tally: tally,
        due_date: due,
        reason: Some(reason.to_string()),
    });
}

/// Apply the boundary policy to one reset unit
fn reset_unit(
    set: &mut ChoreSet,
    chore: &ChoreId,
    scope: &ResetScope,
    ctx: &BoundaryCtx<'_>,
    outcome: &mut ResetOutcome,
    batch: &mut Batch,
) -> Result<(), ChoreError> {
    let now = ctx.now;
    let entry = entry_mut(set, chore)?;
    if let ResetScope::Pair(a) = scope {
        if !entry.definition.is_assigned(a) {
            return Ok(());
        }
    }
    let definition = &entry.definition;
    let due = unit_due(entry, scope);
    let handling = definition.overdue_handling;
    if !is_reset_eligible(definition.approval_reset, handling, ctx.trigger, due, now) {
        tracing::debug!(%chore, "no longer reset-eligible, skipping");
        return Ok(());
    }

    let mut approved = unit_approved(entry, scope);
    let members = unit_members(entry, scope);
    let reset_ctx = ResetContext {
        trigger: ResetTrigger::Boundary(boundary_category(
            handling,
            ctx.trigger,
            approved,
            due,
            now,
        )),
        reset_type: definition.approval_reset,
        overdue_handling: handling,
        criteria: definition.criteria,
        all_others_approved: entry.all_approved(),
        is_late: false,
        has_pending_claim: members.iter().any(|a| entry.has_pending_claim(a)),
        disposition: definition.pending_claim_disposition,
    };
    let mut decision = decide_reset(&reset_ctx);

    if decision == ResetDecision::AutoApprovePending {
        for assignee in &members {
            let req = ApprovalRequest {
                assignee,
                approver_name: ctx.approver_name,
                points_override: None,
                origin: ApprovalOrigin::AutoReset,
                now,
                offset: ctx.offset,
                run_reset_policy: false,
            };
            while set.entry(chore).is_some_and(|e| e.has_pending_claim(assignee)) {
                if !mutation::approve_pair(set, chore, &req, batch)? {
                    break;
                }
                outcome.auto_approved += 1;
            }
        }
        let entry = entry_mut(set, chore)?;
        approved = unit_approved(entry, scope);
        decision = category_decision(boundary_category(handling, ctx.trigger, approved, due, now));
    }

    let reschedule = match decision {
        ResetDecision::ResetOnly => false,
        ResetDecision::ResetAndReschedule => true,
        ResetDecision::Hold | ResetDecision::AutoApprovePending => return Ok(()),
    };

    let entry = entry_mut(set, chore)?;
    let past_due = due.is_some_and(|d| now >= d);
    if handling.records_missed() && past_due && !approved {
        for assignee in missers(entry, scope) {
            let stored = entry.record(&assignee).map(|r| r.state);
            // Already charged when the due date passed
            if stored == Some(ChoreState::Missed) {
                continue;
            }
            record_miss(entry, &assignee, due, now, "not completed before reset", batch);
            outcome.missed += 1;
        }
    }

    if entry.definition.criteria.is_rotation() {
        let from = if approved {
            entry.approver().cloned()
        } else if ctx.trigger == ScanTrigger::Midnight
            && handling == OverdueHandling::MarkMissedAndLock
            && past_due
        {
            entry.definition.turn_holder().cloned()
        } else {
            None
        };
        if let Some(from) = from {
            mutation::advance_rotation(entry, &from, batch);
        }
    }

    let cleared = mutation::reset_scope(entry, scope, now, reschedule, batch);
    outcome
        .reset_pairs
        .extend(cleared.into_iter().map(|a| PairKey::new(a, chore.clone())));
    tracing::info!(%chore, reschedule, trigger = %ctx.trigger, "boundary reset");
    Ok(())
}

/// Mark one scanned pair overdue, or missed under mark-missed-and-lock
fn overdue_pair(
    set: &mut ChoreSet,
    scanned: &ScanEntry,
    now: DateTime<Utc>,
    outcome: &mut OverdueOutcome,
    batch: &mut Batch,
) -> Result<(), ChoreError> {
    let chore = &scanned.chore_id;
    let assignee = &scanned.assignee_id;
    let owner = mutation::display_name(set, assignee);
    let entry = entry_mut(set, chore)?;
    let definition = &entry.definition;
    let Some(due) = definition.due_date_for(assignee) else {
        return Ok(());
    };
    if due != scanned.due_date || now < due || !definition.is_assigned(assignee) {
        return Ok(());
    }
    let stored = entry.record(assignee).map(|r| r.state).unwrap_or_default();
    if matches!(stored, ChoreState::Overdue | ChoreState::Missed) {
        tracing::debug!(%chore, %assignee, state = %stored, "already past due, skipping");
        return Ok(());
    }
    if !is_actionable(entry, assignee, now) {
        return Ok(());
    }

    let effects = calculate_transition(
        definition,
        assignee,
        Action::Overdue,
        TransitionContext {
            current: stored,
            actor_name: &owner,
            is_past_due: true,
        },
    );
    if effects.is_empty() {
        return Ok(());
    }
    mutation::apply_effects(entry, &effects);

    if entry.definition.overdue_handling == OverdueHandling::MarkMissedAndLock {
        record_miss(entry, assignee, Some(due), now, "due date passed", batch);
        outcome.missed += 1;
        return Ok(());
    }
    entry.record_mut(assignee).last_overdue = Some(now);
    let days = days_overdue(due, now);
    tracing::info!(%chore, %assignee, days, "chore overdue");
    batch.emit(ChoreEvent::Overdue {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        days_overdue: days,
        due_date: due,
    });
    outcome.overdue += 1;
    Ok(())
}

/// Announce a due-soon notice once per due date; returns whether it fired
fn notify_pair(
    set: &mut ChoreSet,
    scanned: &ScanEntry,
    kind: DueNoticeKind,
    now: DateTime<Utc>,
    batch: &mut Batch,
) -> Result<bool, ChoreError> {
    let chore = &scanned.chore_id;
    let assignee = &scanned.assignee_id;
    let entry = entry_mut(set, chore)?;
    if entry.definition.due_date_for(assignee) != Some(scanned.due_date)
        || !is_actionable(entry, assignee, now)
    {
        return Ok(false);
    }
    let record = entry.record_mut(assignee);
    let notified = match kind {
        DueNoticeKind::DueWindow => &mut record.due_window_notified,
        DueNoticeKind::Reminder => &mut record.reminder_notified,
    };
    if *notified == Some(scanned.due_date) {
        return Ok(false);
    }
    *notified = Some(scanned.due_date);
    batch.emit(ChoreEvent::DueSoon {
        assignee_id: assignee.clone(),
        chore_id: chore.clone(),
        due_date: scanned.due_date,
        kind,
    });
    Ok(true)
}

/// Run `f` for one unit, undoing its partial changes if it fails
fn isolated<T>(
    set: &mut ChoreSet,
    batch: &mut Batch,
    chore: &ChoreId,
    f: impl FnOnce(&mut ChoreSet, &mut Batch) -> Result<T, ChoreError>,
) -> Option<T> {
    let saved = set.entry(chore).cloned();
    let mark = batch.events.len();
    match f(set, batch) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%chore, error = %e, "skipping chore in scheduled pass");
            if let Some(entry) = saved {
                set.chores.insert(chore.clone(), entry);
            }
            batch.events.truncate(mark);
            None
        }
    }
}

impl<S, C> Orchestrator<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    /// Scan the current set without changing it
    pub fn process_time_checks(&self, now: DateTime<Utc>, trigger: ScanTrigger) -> TimeScan {
        self.read(|set| scan_time_checks(set, now, trigger))
    }

    /// Clear every reset-eligible unit the boundary policy allows
    ///
    /// Persists once, then announces.
    pub async fn process_approval_resets(
        &self,
        scan: &TimeScan,
        now: DateTime<Utc>,
        trigger: ScanTrigger,
    ) -> Result<ResetOutcome, ChoreError> {
        let approver_name = self.config().auto_approver_name.clone();
        let ctx = BoundaryCtx {
            trigger,
            now,
            offset: self.offset(),
            approver_name: &approver_name,
        };
        let units = scan
            .reset_shared
            .iter()
            .map(|c| (c.clone(), ResetScope::Chore))
            .chain(
                scan.reset_independent
                    .iter()
                    .map(|k| (k.chore.clone(), ResetScope::Pair(k.assignee.clone()))),
            );

        self.apply(|set, batch| {
            let mut outcome = ResetOutcome::default();
            for (chore, scope) in units {
                isolated(set, batch, &chore, |set, batch| {
                    reset_unit(set, &chore, &scope, &ctx, &mut outcome, batch)
                });
            }
            Ok(outcome)
        })
        .await
    }

    /// Mark scanned pairs overdue; pairs in `skip` were just reset
    ///
    /// Idempotent: pairs already overdue or missed are left alone.
    pub async fn process_overdue(
        &self,
        entries: &[ScanEntry],
        now: DateTime<Utc>,
        skip: &BTreeSet<PairKey>,
    ) -> Result<OverdueOutcome, ChoreError> {
        self.apply(|set, batch| {
            let mut outcome = OverdueOutcome::default();
            for scanned in entries.iter().filter(|e| !skip.contains(&e.key())) {
                isolated(set, batch, &scanned.chore_id, |set, batch| {
                    overdue_pair(set, scanned, now, &mut outcome, batch)
                });
            }
            Ok(outcome)
        })
        .await
    }

    /// Announce due-window and reminder notices not yet sent
    pub async fn process_due_notices(
        &self,
        scan: &TimeScan,
        now: DateTime<Utc>,
    ) -> Result<usize, ChoreError> {
        let entries = scan
            .due_window
            .iter()
            .map(|e| (e, DueNoticeKind::DueWindow))
            .chain(scan.reminders.iter().map(|e| (e, DueNoticeKind::Reminder)));
        self.apply(|set, batch| {
            let mut sent = 0;
            for (scanned, kind) in entries {
                let fired = isolated(set, batch, &scanned.chore_id, |set, batch| {
                    notify_pair(set, scanned, kind, now, batch)
                });
                if fired == Some(true) {
                    sent += 1;
                }
            }
            Ok(sent)
        })
        .await
    }

    /// One scheduler tick: scan, resets, overdue, due notices
    pub async fn run_tick(&self, trigger: ScanTrigger) -> Result<TickReport, ChoreError> {
        let now = self.now();
        let scan = self.process_time_checks(now, trigger);
        let resets = self.process_approval_resets(&scan, now, trigger).await?;
        let overdue = self
            .process_overdue(&scan.overdue, now, &resets.reset_pairs)
            .await?;
        let due_notices = self.process_due_notices(&scan, now).await?;

        let report = TickReport {
            trigger,
            reset_pairs: resets.reset_pairs.len(),
            auto_approved: resets.auto_approved,
            overdue: overdue.overdue,
            missed: resets.missed + overdue.missed,
            due_notices,
        };
        tracing::info!(
            %trigger,
            reset_pairs = report.reset_pairs,
            auto_approved = report.auto_approved,
            overdue = report.overdue,
            missed = report.missed,
            due_notices = report.due_notices,
            "tick complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
