// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative operations: due dates, manual resets, rotation, assignment

use crate::error::ChoreError;
use crate::mutation::{self, entry_mut, Batch, ResetScope};
use crate::orchestrator::Orchestrator;
use chore_core::rotation::reconcile_turn;
use chore_core::schedule::next_due_after;
use chore_core::{
    Assignee, AssigneeId, ChoreDefinition, ChoreEntry, ChoreEvent, ChoreId, ChoreState, Clock,
    RotationMethod,
};
use chore_storage::SnapshotStore;
use chrono::{DateTime, Utc};

/// Assignees an admin operation targets: one, or all for a chore-wide request
fn targets(
    entry: &ChoreEntry,
    assignee: Option<&AssigneeId>,
) -> Result<Vec<AssigneeId>, ChoreError> {
    match assignee {
        Some(a) if !entry.definition.is_assigned(a) => {
            Err(chore_core::BlockReason::NotAssigned.into())
        }
        Some(a) => Ok(vec![a.clone()]),
        None => Ok(entry.definition.assigned.clone()),
    }
}

/// Scopes to reset for the targeted assignees
fn scopes(entry: &ChoreEntry, assignees: &[AssigneeId]) -> Vec<ResetScope> {
    if entry.definition.criteria.uses_chore_level_schedule() {
        vec![ResetScope::Chore]
    } else {
        assignees.iter().cloned().map(ResetScope::Pair).collect()
    }
}

fn is_overdue_or_missed(entry: &ChoreEntry, assignee: &AssigneeId, now: DateTime<Utc>) -> bool {
    let stored = entry.record(assignee).map(|r| r.state).unwrap_or_default();
    matches!(stored, ChoreState::Overdue | ChoreState::Missed)
        || entry.resolve(assignee, now).0 == ChoreState::Overdue
}

/// Return overdue or missed pairs whose due date moved into the future to pending
fn reopen_moved_pairs(
    entry: &mut ChoreEntry,
    assignees: &[AssigneeId],
    now: DateTime<Utc>,
    batch: &mut Batch,
) {
    for assignee in assignees {
        let due = entry.definition.due_date_for(assignee);
        let stored = entry.record(assignee).map(|r| r.state);
        if !matches!(stored, Some(ChoreState::Overdue | ChoreState::Missed)) {
            continue;
        }
        if due.is_some_and(|d| d <= now) {
            continue;
        }
        entry.record_mut(assignee).state = ChoreState::Pending;
        batch.emit(ChoreEvent::StatusReset {
            assignee_id: assignee.clone(),
            chore_id: entry.definition.id.clone(),
        });
    }
}

impl<S, C> Orchestrator<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    /// Set or clear a due date
    ///
    /// Without an assignee, an independent chore's due date changes for
    /// every assignee.
    pub async fn set_due_date(
        &self,
        chore: &ChoreId,
        assignee: Option<&AssigneeId>,
        due: Option<DateTime<Utc>>,
    ) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        let now = self.now();
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            let assignees = targets(entry, assignee)?;
            if entry.definition.criteria.uses_chore_level_schedule() {
                entry.definition.due_date = due;
            } else {
                for a in &assignees {
                    entry.definition.set_due_date_for(a, due);
                }
            }
            batch.touch();
            reopen_moved_pairs(entry, &assignees, now, batch);
            tracing::info!(%chore, due = ?due, "due date set");
            Ok(())
        })
        .await
    }

    /// Advance the due date one occurrence past both itself and now
    pub async fn skip_due_date(
        &self,
        chore: &ChoreId,
        assignee: Option<&AssigneeId>,
    ) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        let now = self.now();
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            if !entry.definition.recurrence.is_recurring() {
                return Err(ChoreError::NotRecurring(chore.clone()));
            }
            let assignees = targets(entry, assignee)?;
            let definition = &mut entry.definition;
            let recurrence = definition.recurrence;
            let skip = |due: DateTime<Utc>| next_due_after(due, &recurrence, due.max(now));
            if definition.criteria.uses_chore_level_schedule() {
                if let Some(due) = definition.due_date {
                    definition.due_date = skip(due);
                    batch.touch();
                }
            } else {
                for a in &assignees {
                    let Some(due) = definition.due_date_for(a) else {
                        tracing::debug!(%chore, assignee = %a, "no due date to skip");
                        continue;
                    };
                    definition.set_due_date_for(a, skip(due));
                    batch.touch();
                }
            }
            reopen_moved_pairs(entry, &assignees, now, batch);
            tracing::info!(%chore, "due date skipped");
            Ok(())
        })
        .await
    }

    /// Clear claims and approvals without touching the due date
    pub async fn reset_chore_to_pending(
        &self,
        chore: &ChoreId,
        assignee: Option<&AssigneeId>,
    ) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        let now = self.now();
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            let assignees = targets(entry, assignee)?;
            for scope in scopes(entry, &assignees) {
                mutation::reset_scope(entry, &scope, now, false, batch);
            }
            tracing::info!(%chore, "chore reset to pending");
            Ok(())
        })
        .await
    }

    /// Reset every overdue or missed pair and move its due date forward
    ///
    /// Limited to one chore when `chore` is given. Returns the number of
    /// reset units.
    pub async fn reset_overdue_chores(
        &self,
        chore: Option<&ChoreId>,
    ) -> Result<usize, ChoreError> {
        let ids: Vec<ChoreId> = match chore {
            Some(id) => vec![id.clone()],
            None => self.read(|set| set.chores.keys().cloned().collect()),
        };
        let _guards = self.lock_chores(&ids).await;
        let now = self.now();
        self.apply(|set, batch| {
            let mut count = 0;
            for id in &ids {
                let entry = match set.entry_mut(id) {
                    Some(entry) => entry,
                    None if chore.is_some() => return Err(ChoreError::ChoreNotFound(id.clone())),
                    None => continue,
                };
                let overdue: Vec<AssigneeId> = entry
                    .definition
                    .assigned
                    .iter()
                    .filter(|a| is_overdue_or_missed(entry, a, now))
                    .cloned()
                    .collect();
                if overdue.is_empty() {
                    continue;
                }
                for scope in scopes(entry, &overdue) {
                    mutation::reset_scope(entry, &scope, now, true, batch);
                    count += 1;
                }
            }
            tracing::info!(count, "overdue chores reset");
            Ok(count)
        })
        .await
    }

    /// Hand the rotation turn to a specific assignee
    pub async fn set_rotation_turn(
        &self,
        chore: &ChoreId,
        assignee: &AssigneeId,
    ) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            if !entry.definition.criteria.is_rotation() {
                return Err(ChoreError::NotRotation(chore.clone()));
            }
            if !entry.definition.is_assigned(assignee) {
                return Err(chore_core::BlockReason::NotAssigned.into());
            }
            set_turn(entry, Some(assignee.clone()), RotationMethod::Manual, batch);
            Ok(())
        })
        .await
    }

    /// Give the turn back to the first assignee in order
    pub async fn reset_rotation(&self, chore: &ChoreId) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            if !entry.definition.criteria.is_rotation() {
                return Err(ChoreError::NotRotation(chore.clone()));
            }
            let first = entry.definition.assigned.first().cloned();
            set_turn(entry, first, RotationMethod::Reset, batch);
            Ok(())
        })
        .await
    }

    /// Let any assignee claim until the rotation next advances
    pub async fn open_rotation_cycle(&self, chore: &ChoreId) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            if !entry.definition.criteria.is_rotation() {
                return Err(ChoreError::NotRotation(chore.clone()));
            }
            if !entry.definition.rotation.cycle_override {
                entry.definition.rotation.cycle_override = true;
                batch.touch();
                tracing::info!(%chore, "rotation cycle opened");
            }
            Ok(())
        })
        .await
    }

    /// Register or rename a person
    pub async fn upsert_assignee(
        &self,
        id: AssigneeId,
        name: impl Into<String>,
    ) -> Result<(), ChoreError> {
        let name = name.into();
        self.apply(|set, batch| {
            let assignee = Assignee { id: id.clone(), name };
            if set.assignees.get(&id) != Some(&assignee) {
                set.assignees.insert(id, assignee);
                batch.touch();
            }
            Ok(())
        })
        .await
    }

    /// Create or replace a chore definition, keeping existing records
    ///
    /// The rotation turn is reconciled against the previous assignment and
    /// records of assignees no longer assigned are dropped.
    pub async fn upsert_chore(&self, mut definition: ChoreDefinition) -> Result<(), ChoreError> {
        let chore = definition.id.clone();
        let _guards = self.lock_chore(&chore).await;
        definition.normalize_due_dates();
        definition.validate()?;
        self.apply(|set, batch| {
            match set.chores.get_mut(&chore) {
                Some(entry) => {
                    if definition.approval_period_start.is_none() {
                        definition.approval_period_start = entry.definition.approval_period_start;
                    }
                    if definition.criteria.is_rotation() {
                        let turn = definition
                            .rotation
                            .turn
                            .clone()
                            .or_else(|| entry.definition.rotation.turn.clone());
                        definition.rotation.turn = reconcile_turn(
                            &entry.definition.assigned,
                            &definition.assigned,
                            turn.as_ref(),
                        );
                    }
                    entry.definition = definition;
                    entry.prune_records();
                    tracing::info!(%chore, "chore updated");
                }
                None => {
                    if definition.criteria.is_rotation() && definition.rotation.turn.is_none() {
                        definition.rotation.turn = definition.assigned.first().cloned();
                    }
                    set.chores.insert(chore.clone(), ChoreEntry::new(definition));
                    tracing::info!(%chore, "chore added");
                }
            }
            batch.touch();
            Ok(())
        })
        .await
    }

    /// Replace a chore's assignment list
    pub async fn update_assignees(
        &self,
        chore: &ChoreId,
        assigned: Vec<AssigneeId>,
    ) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        self.apply(|set, batch| {
            let entry = entry_mut(set, chore)?;
            let previous = std::mem::replace(&mut entry.definition.assigned, assigned);
            reassign_turn(entry, &previous);
            entry.definition.validate()?;
            let assigned = entry.definition.assigned.clone();
            entry
                .definition
                .assignee_due_dates
                .retain(|a, _| assigned.contains(a));
            entry.prune_records();
            batch.touch();
            tracing::info!(%chore, count = entry.definition.assigned.len(), "assignees updated");
            Ok(())
        })
        .await
    }

    pub async fn remove_chore(&self, chore: &ChoreId) -> Result<(), ChoreError> {
        let _guards = self.lock_chore(chore).await;
        self.apply(|set, batch| {
            set.chores
                .remove(chore)
                .ok_or_else(|| ChoreError::ChoreNotFound(chore.clone()))?;
            batch.touch();
            tracing::info!(%chore, "chore removed");
            Ok(())
        })
        .await
    }

    /// Remove a person from the household and from every chore
    pub async fn remove_assignee(&self, assignee: &AssigneeId) -> Result<(), ChoreError> {
        let _guards = self.lock_assignee(assignee).await;
        self.apply(|set, batch| {
            let known = set.assignees.remove(assignee).is_some();
            let mut assigned_anywhere = false;
            for entry in set.chores.values_mut() {
                if !entry.definition.is_assigned(assignee) {
                    continue;
                }
                assigned_anywhere = true;
                let previous = entry.definition.assigned.clone();
                entry.definition.assigned.retain(|a| a != assignee);
                entry.definition.assignee_due_dates.remove(assignee);
                reassign_turn(entry, &previous);
                entry.prune_records();
                if entry.definition.criteria.is_rotation() && entry.definition.assigned.len() < 2 {
                    tracing::warn!(
                        chore = %entry.definition.id,
                        remaining = entry.definition.assigned.len(),
                        "rotation chore has fewer than two assignees"
                    );
                }
            }
            if !known && !assigned_anywhere {
                return Err(ChoreError::AssigneeNotFound(assignee.clone()));
            }
            batch.touch();
            tracing::info!(%assignee, "assignee removed");
            Ok(())
        })
        .await
    }
}

/// Set the turn explicitly and announce it
fn set_turn(
    entry: &mut ChoreEntry,
    turn: Option<AssigneeId>,
    method: RotationMethod,
    batch: &mut Batch,
) {
    let rotation = &mut entry.definition.rotation;
    let previous = std::mem::replace(&mut rotation.turn, turn.clone());
    rotation.cycle_override = false;
    tracing::info!(chore = %entry.definition.id, turn = ?turn, %method, "rotation turn set");
    batch.emit(ChoreEvent::RotationAdvanced {
        chore_id: entry.definition.id.clone(),
        previous_assignee_id: previous,
        new_assignee_id: turn,
        method,
    });
}

/// Keep the turn on an assigned member after the list changed; silent
fn reassign_turn(entry: &mut ChoreEntry, previous: &[AssigneeId]) {
    let definition = &mut entry.definition;
    if !definition.criteria.is_rotation() {
        return;
    }
    let turn = reconcile_turn(previous, &definition.assigned, definition.rotation.turn.as_ref());
    if turn != definition.rotation.turn {
        tracing::debug!(chore = %definition.id, turn = ?turn, "rotation turn reassigned");
    }
    if turn.is_none() {
        definition.rotation.cycle_override = false;
    }
    definition.rotation.turn = turn;
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
