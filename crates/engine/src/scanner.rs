// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass time scan over every chore
//!
//! The scan only reads. It sorts actionable pairs into at most one notice
//! bucket and, independently, lists the units a reset boundary may clear.

use chore_core::{
    is_reset_eligible, AssigneeId, ChoreEntry, ChoreId, ChoreSet, ChoreState, PairKey,
    ScanTrigger,
};
use chrono::{DateTime, Utc};

/// One pair placed in a notice bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub chore_id: ChoreId,
    pub assignee_id: AssigneeId,
    pub due_date: DateTime<Utc>,
}

impl ScanEntry {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.assignee_id.clone(), self.chore_id.clone())
    }
}

/// Result of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeScan {
    pub overdue: Vec<ScanEntry>,
    pub due_window: Vec<ScanEntry>,
    pub reminders: Vec<ScanEntry>,
    /// Chore-level units eligible for a reset (every criteria but independent)
    pub reset_shared: Vec<ChoreId>,
    /// Independent pairs eligible for a reset
    pub reset_independent: Vec<PairKey>,
}

impl TimeScan {
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty()
            && self.due_window.is_empty()
            && self.reminders.is_empty()
            && self.reset_shared.is_empty()
            && self.reset_independent.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Overdue,
    Reminder,
    DueWindow,
}

/// Open work: not claimed, approved, locked, or taken by someone else
pub(crate) fn is_actionable(
    entry: &ChoreEntry,
    assignee: &AssigneeId,
    now: DateTime<Utc>,
) -> bool {
    let (state, lock) = entry.resolve(assignee, now);
    matches!(state, ChoreState::Pending | ChoreState::Overdue)
        && lock.is_none()
        && !entry.completed_by_other(assignee)
}

fn bucket(
    entry: &ChoreEntry,
    assignee: &AssigneeId,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Bucket> {
    let definition = &entry.definition;
    if now >= due {
        return definition
            .overdue_handling
            .marks_overdue()
            .then_some(Bucket::Overdue);
    }
    if definition.reminder_at_for(assignee).is_some_and(|at| now >= at) {
        return Some(Bucket::Reminder);
    }
    if definition
        .due_window_start_for(assignee)
        .is_some_and(|start| now >= start)
    {
        return Some(Bucket::DueWindow);
    }
    None
}

/// Classify every assigned pair for one tick
pub fn scan_time_checks(set: &ChoreSet, now: DateTime<Utc>, trigger: ScanTrigger) -> TimeScan {
    let mut scan = TimeScan::default();

    for entry in set.chores.values() {
        let definition = &entry.definition;

        for assignee in &definition.assigned {
            let Some(due) = definition.due_date_for(assignee) else {
                continue;
            };
            if !is_actionable(entry, assignee, now) {
                continue;
            }
            let scan_entry = ScanEntry {
                chore_id: definition.id.clone(),
                assignee_id: assignee.clone(),
                due_date: due,
            };
            match bucket(entry, assignee, due, now) {
                Some(Bucket::Overdue) => scan.overdue.push(scan_entry),
                Some(Bucket::Reminder) => scan.reminders.push(scan_entry),
                Some(Bucket::DueWindow) => scan.due_window.push(scan_entry),
                None => {}
            }
        }

        let eligible = |due: Option<DateTime<Utc>>| {
            is_reset_eligible(
                definition.approval_reset,
                definition.overdue_handling,
                trigger,
                due,
                now,
            )
        };
        if definition.criteria.uses_chore_level_schedule() {
            if eligible(definition.due_date) {
                scan.reset_shared.push(definition.id.clone());
            }
        } else {
            scan.reset_independent.extend(
                definition
                    .assigned
                    .iter()
                    .filter(|a| eligible(definition.due_date_for(a)))
                    .map(|a| PairKey::new(a.clone(), definition.id.clone())),
            );
        }
    }

    tracing::debug!(
        %trigger,
        overdue = scan.overdue.len(),
        due_window = scan.due_window.len(),
        reminders = scan.reminders.len(),
        reset_shared = scan.reset_shared.len(),
        reset_independent = scan.reset_independent.len(),
        "time scan"
    );
    scan
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
