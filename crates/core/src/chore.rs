// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore definitions: the shared, per-chore configuration
//!
//! A definition is authored outside the workflow core. The core only
//! mutates its rotation turn, due dates, and chore-level approval period.

use crate::id::{AssigneeId, ChoreId};
use crate::schedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// How multiple assignees on one chore interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCriteria {
    /// Every assignee does their own copy of the chore
    Independent,
    /// Every assignee must complete it before it counts as done
    Shared,
    /// The first assignee to claim it owns it for the period
    SharedFirst,
    /// Turns pass to the next assignee in list order
    RotationSimple,
    /// Turns pass to the assignee with the fewest completions
    RotationSmart,
}

impl CompletionCriteria {
    pub fn is_rotation(self) -> bool {
        matches!(self, Self::RotationSimple | Self::RotationSmart)
    }

    /// Only one assignee may hold a claim or approval per period
    pub fn is_single_claimer(self) -> bool {
        matches!(
            self,
            Self::SharedFirst | Self::RotationSimple | Self::RotationSmart
        )
    }

    /// Due date and approval period live on the chore rather than per assignee
    pub fn uses_chore_level_schedule(self) -> bool {
        !matches!(self, Self::Independent)
    }
}

/// Recurrence cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

/// Unit for custom recurrence intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

/// When a chore repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub custom_interval: Option<u32>,
    #[serde(default)]
    pub custom_unit: IntervalUnit,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            custom_interval: None,
            custom_unit: IntervalUnit::Days,
        }
    }

    pub fn custom(every: u32, unit: IntervalUnit) -> Self {
        Self {
            frequency: Frequency::Custom,
            custom_interval: Some(every),
            custom_unit: unit,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.step().is_some()
    }

    /// One cadence step, or None for a chore that does not repeat
    pub fn step(&self) -> Option<schedule::Step> {
        use schedule::Step;
        match self.frequency {
            Frequency::None => None,
            Frequency::Daily => Some(Step::Days(1)),
            Frequency::Weekly => Some(Step::Days(7)),
            Frequency::Biweekly => Some(Step::Days(14)),
            Frequency::Monthly => Some(Step::Months(1)),
            Frequency::Custom => match (self.custom_interval, self.custom_unit) {
                (None | Some(0), _) => None,
                (Some(n), IntervalUnit::Days) => Some(Step::Days(i64::from(n))),
                (Some(n), IntervalUnit::Weeks) => Some(Step::Days(i64::from(n) * 7)),
                (Some(n), IntervalUnit::Months) => Some(Step::Months(n)),
            },
        }
    }
}

/// When an approval stops counting and the chore becomes claimable again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalReset {
    #[default]
    AtMidnightOnce,
    AtMidnightMulti,
    AtDueDateOnce,
    AtDueDateMulti,
    UponCompletion,
}

impl ApprovalReset {
    /// More than one claim per period is allowed
    pub fn allows_multiple_claims(self) -> bool {
        matches!(
            self,
            Self::AtMidnightMulti | Self::AtDueDateMulti | Self::UponCompletion
        )
    }

    pub fn resets_at_midnight(self) -> bool {
        matches!(self, Self::AtMidnightOnce | Self::AtMidnightMulti)
    }

    pub fn resets_at_due_date(self) -> bool {
        matches!(self, Self::AtDueDateOnce | Self::AtDueDateMulti)
    }
}

/// What happens when the due date passes without an approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdueHandling {
    /// Becomes overdue at the due date and stays so until completed
    #[default]
    AtDueDate,
    /// Never marked overdue
    NeverOverdue,
    /// Marked missed at the due date and locked until the next midnight
    MarkMissedAndLock,
    /// Cleared and recorded as missed at the next reset boundary
    ClearAndMarkMissed,
    /// A late approval resets immediately; unfinished work is cleared at the boundary
    ClearImmediateOnLate,
    /// Overdue rotation chores open to every assignee
    AllowSteal,
}

impl OverdueHandling {
    pub fn marks_overdue(self) -> bool {
        !matches!(self, Self::NeverOverdue)
    }

    /// Clearing an unfinished, past-due pair counts as a miss
    pub fn records_missed(self) -> bool {
        matches!(
            self,
            Self::MarkMissedAndLock | Self::ClearAndMarkMissed | Self::ClearImmediateOnLate
        )
    }
}

/// What a scheduled reset does with a claim still awaiting approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingClaimDisposition {
    #[default]
    Hold,
    Clear,
    AutoApprove,
}

/// Rotation turn bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotationState {
    /// Assignee currently entitled to claim
    #[serde(default)]
    pub turn: Option<AssigneeId>,
    /// Opens the rotation to everyone until the next advancement
    #[serde(default)]
    pub cycle_override: bool,
}

/// Violations of definition invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("chore id must not be empty")]
    EmptyId,
    #[error("rotation chore {chore} needs at least two assignees, has {count}")]
    RotationNeedsTwoAssignees { chore: ChoreId, count: usize },
    #[error("rotation turn holder {assignee} is not assigned to chore {chore}")]
    TurnHolderNotAssigned { chore: ChoreId, assignee: AssigneeId },
    #[error("assignee {assignee} is listed twice on chore {chore}")]
    DuplicateAssignee { chore: ChoreId, assignee: AssigneeId },
}

/// Shared configuration for one chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreDefinition {
    pub id: ChoreId,
    #[serde(default)]
    pub name: String,
    pub criteria: CompletionCriteria,
    /// Ordered; rotation follows this order
    pub assigned: Vec<AssigneeId>,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Chore-level due date (every criteria except independent)
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Per-assignee due dates (independent chores)
    #[serde(default)]
    pub assignee_due_dates: BTreeMap<AssigneeId, DateTime<Utc>>,
    #[serde(default, with = "humantime_serde")]
    pub due_window: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub reminder_offset: Option<Duration>,
    /// Refuse claims until the due window opens
    #[serde(default)]
    pub claim_locked_until_window: bool,
    #[serde(default)]
    pub approval_reset: ApprovalReset,
    #[serde(default)]
    pub overdue_handling: OverdueHandling,
    #[serde(default)]
    pub pending_claim_disposition: PendingClaimDisposition,
    /// Claims are approved on the spot
    #[serde(default)]
    pub auto_approve: bool,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub rotation: RotationState,
    /// Chore-level approval period start (mirrored into records)
    #[serde(default)]
    pub approval_period_start: Option<DateTime<Utc>>,
}

impl ChoreDefinition {
    pub fn new(
        id: impl Into<ChoreId>,
        criteria: CompletionCriteria,
        assigned: Vec<AssigneeId>,
    ) -> Self {
        let id = id.into();
        let turn = if criteria.is_rotation() {
            assigned.first().cloned()
        } else {
            None
        };
        Self {
            name: id.0.clone(),
            id,
            criteria,
            assigned,
            recurrence: Recurrence::default(),
            due_date: None,
            assignee_due_dates: BTreeMap::new(),
            due_window: None,
            reminder_offset: None,
            claim_locked_until_window: false,
            approval_reset: ApprovalReset::default(),
            overdue_handling: OverdueHandling::default(),
            pending_claim_disposition: PendingClaimDisposition::default(),
            auto_approve: false,
            points: 0.0,
            rotation: RotationState {
                turn,
                cycle_override: false,
            },
            approval_period_start: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Set the due date; independent chores get it for every assignee
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        if self.criteria.uses_chore_level_schedule() {
            self.due_date = Some(due);
        } else {
            for assignee in &self.assigned {
                self.assignee_due_dates.insert(assignee.clone(), due);
            }
        }
        self
    }

    pub fn with_due_window(mut self, window: Duration) -> Self {
        self.due_window = Some(window);
        self
    }

    pub fn with_reminder_offset(mut self, offset: Duration) -> Self {
        self.reminder_offset = Some(offset);
        self
    }

    pub fn with_approval_reset(mut self, reset: ApprovalReset) -> Self {
        self.approval_reset = reset;
        self
    }

    pub fn with_overdue_handling(mut self, handling: OverdueHandling) -> Self {
        self.overdue_handling = handling;
        self
    }

    pub fn with_pending_claim_disposition(mut self, disposition: PendingClaimDisposition) -> Self {
        self.pending_claim_disposition = disposition;
        self
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_claim_locked_until_window(mut self, locked: bool) -> Self {
        self.claim_locked_until_window = locked;
        self
    }

    pub fn is_assigned(&self, assignee: &AssigneeId) -> bool {
        self.assigned.contains(assignee)
    }

    /// The due date that applies to one assignee
    pub fn due_date_for(&self, assignee: &AssigneeId) -> Option<DateTime<Utc>> {
        if self.criteria.uses_chore_level_schedule() {
            self.due_date
        } else {
            self.assignee_due_dates.get(assignee).copied()
        }
    }

    /// Spread a chore-level due date over the assignees of an independent chore
    ///
    /// Assignees that already have their own due date keep it.
    pub fn normalize_due_dates(&mut self) {
        if self.criteria.uses_chore_level_schedule() {
            return;
        }
        let Some(due) = self.due_date.take() else {
            return;
        };
        for assignee in &self.assigned {
            self.assignee_due_dates.entry(assignee.clone()).or_insert(due);
        }
    }

    pub fn set_due_date_for(&mut self, assignee: &AssigneeId, due: Option<DateTime<Utc>>) {
        if self.criteria.uses_chore_level_schedule() {
            self.due_date = due;
            return;
        }
        match due {
            Some(due) => {
                self.assignee_due_dates.insert(assignee.clone(), due);
            }
            None => {
                self.assignee_due_dates.remove(assignee);
            }
        }
    }

    pub fn due_window_start_for(&self, assignee: &AssigneeId) -> Option<DateTime<Utc>> {
        let due = self.due_date_for(assignee)?;
        schedule::offset_before(due, self.due_window?)
    }

    pub fn reminder_at_for(&self, assignee: &AssigneeId) -> Option<DateTime<Utc>> {
        let due = self.due_date_for(assignee)?;
        schedule::offset_before(due, self.reminder_offset?)
    }

    /// An open rotation cycle lets any assignee claim, shared-first style
    pub fn is_cycle_open(&self, now: DateTime<Utc>) -> bool {
        if !self.criteria.is_rotation() {
            return false;
        }
        if self.rotation.cycle_override {
            return true;
        }
        self.overdue_handling == OverdueHandling::AllowSteal
            && self.due_date.is_some_and(|due| now >= due)
    }

    /// The assignee whose turn it is, for rotation chores
    pub fn turn_holder(&self) -> Option<&AssigneeId> {
        if self.criteria.is_rotation() {
            self.rotation.turn.as_ref()
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.0.is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        for (i, assignee) in self.assigned.iter().enumerate() {
            if self.assigned[..i].contains(assignee) {
                return Err(DefinitionError::DuplicateAssignee {
                    chore: self.id.clone(),
                    assignee: assignee.clone(),
                });
            }
        }
        if self.criteria.is_rotation() {
            if self.assigned.len() < 2 {
                return Err(DefinitionError::RotationNeedsTwoAssignees {
                    chore: self.id.clone(),
                    count: self.assigned.len(),
                });
            }
            if let Some(turn) = &self.rotation.turn {
                if !self.is_assigned(turn) {
                    return Err(DefinitionError::TurnHolderNotAssigned {
                        chore: self.id.clone(),
                        assignee: turn.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "chore_tests.rs"]
mod tests;
