// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events announced to collaborators after a successful persist

use crate::id::{AssigneeId, ChoreId};
use crate::record::ChoreState;
use crate::rotation::RotationMethod;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an approval came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalOrigin {
    /// An approver pressed approve
    Manual,
    /// The chore approves its own claims
    AutoApprove,
    /// A reset boundary approved a waiting claim
    AutoReset,
}

/// Which advance notice a due-soon event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueNoticeKind {
    DueWindow,
    Reminder,
}

/// Events consumed by the economy, notification, and gamification layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChoreEvent {
    Claimed {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        actor_name: String,
    },
    Approved {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        approver_name: String,
        base_points: f64,
        is_shared: bool,
        is_multi_claim: bool,
        previous_state: ChoreState,
        effective_work_date: NaiveDate,
        approval_origin: ApprovalOrigin,
        notify_assignee: bool,
    },
    Disapproved {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        approver_name: String,
        reason: Option<String>,
    },
    Undone {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        points_to_reclaim: f64,
    },
    Overdue {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        days_overdue: i64,
        due_date: DateTime<Utc>,
    },
    Missed {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        missed_streak_tally: u32,
        due_date: Option<DateTime<Utc>>,
        reason: Option<String>,
    },
    StatusReset {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
    },
    RotationAdvanced {
        chore_id: ChoreId,
        previous_assignee_id: Option<AssigneeId>,
        new_assignee_id: Option<AssigneeId>,
        method: RotationMethod,
    },
    Completed {
        chore_id: ChoreId,
        assignee_ids: Vec<AssigneeId>,
        effective_date: NaiveDate,
        streak_tallies: BTreeMap<AssigneeId, u32>,
    },
    DueSoon {
        assignee_id: AssigneeId,
        chore_id: ChoreId,
        due_date: DateTime<Utc>,
        kind: DueNoticeKind,
    },
}

impl ChoreEvent {
    /// Get the event name for pattern matching
    /// Format: "chore:action"
    pub fn name(&self) -> &'static str {
        match self {
            ChoreEvent::Claimed { .. } => "chore:claimed",
            ChoreEvent::Approved { .. } => "chore:approved",
            ChoreEvent::Disapproved { .. } => "chore:disapproved",
            ChoreEvent::Undone { .. } => "chore:undone",
            ChoreEvent::Overdue { .. } => "chore:overdue",
            ChoreEvent::Missed { .. } => "chore:missed",
            ChoreEvent::StatusReset { .. } => "chore:status_reset",
            ChoreEvent::RotationAdvanced { .. } => "chore:rotation_advanced",
            ChoreEvent::Completed { .. } => "chore:completed",
            ChoreEvent::DueSoon { .. } => "chore:due_soon",
        }
    }

    pub fn chore_id(&self) -> &ChoreId {
        match self {
            ChoreEvent::Claimed { chore_id, .. }
            | ChoreEvent::Approved { chore_id, .. }
            | ChoreEvent::Disapproved { chore_id, .. }
            | ChoreEvent::Undone { chore_id, .. }
            | ChoreEvent::Overdue { chore_id, .. }
            | ChoreEvent::Missed { chore_id, .. }
            | ChoreEvent::StatusReset { chore_id, .. }
            | ChoreEvent::RotationAdvanced { chore_id, .. }
            | ChoreEvent::Completed { chore_id, .. }
            | ChoreEvent::DueSoon { chore_id, .. } => chore_id,
        }
    }

    /// The single assignee the event concerns, if there is one
    pub fn assignee_id(&self) -> Option<&AssigneeId> {
        match self {
            ChoreEvent::Claimed { assignee_id, .. }
            | ChoreEvent::Approved { assignee_id, .. }
            | ChoreEvent::Disapproved { assignee_id, .. }
            | ChoreEvent::Undone { assignee_id, .. }
            | ChoreEvent::Overdue { assignee_id, .. }
            | ChoreEvent::Missed { assignee_id, .. }
            | ChoreEvent::StatusReset { assignee_id, .. }
            | ChoreEvent::DueSoon { assignee_id, .. } => Some(assignee_id),
            ChoreEvent::RotationAdvanced { .. } | ChoreEvent::Completed { .. } => None,
        }
    }

    /// Whether the event names `assignee` anywhere
    pub fn involves(&self, assignee: &AssigneeId) -> bool {
        match self {
            ChoreEvent::Completed { assignee_ids, .. } => assignee_ids.contains(assignee),
            ChoreEvent::RotationAdvanced {
                previous_assignee_id,
                new_assignee_id,
                ..
            } => {
                previous_assignee_id.as_ref() == Some(assignee)
                    || new_assignee_id.as_ref() == Some(assignee)
            }
            _ => self.assignee_id() == Some(assignee),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
