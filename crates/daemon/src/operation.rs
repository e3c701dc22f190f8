// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Household operations as data
//!
//! `chored` runs these for clients over its socket; `chores` runs them
//! in-process when no daemon owns the snapshot. Both paths go through
//! [`execute`], so a command behaves the same either way.

use chore_core::{AssigneeId, ChoreDefinition, ChoreEvent, ChoreId, Clock, ScanTrigger};
use chore_engine::{ChoreError, ChoreStatus, EventFilter, Orchestrator, PendingApproval, TickReport};
use chore_storage::SnapshotStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    UpsertAssignee {
        id: AssigneeId,
        name: String,
    },
    RemoveAssignee {
        id: AssigneeId,
    },
    UpsertChore {
        definition: Box<ChoreDefinition>,
    },
    UpdateAssignees {
        chore: ChoreId,
        assigned: Vec<AssigneeId>,
    },
    RemoveChore {
        chore: ChoreId,
    },
    Claim {
        chore: ChoreId,
        assignee: AssigneeId,
        actor: String,
    },
    Approve {
        chore: ChoreId,
        assignee: AssigneeId,
        approver: String,
        points: Option<f64>,
    },
    Disapprove {
        chore: ChoreId,
        assignee: AssigneeId,
        approver: String,
        reason: Option<String>,
    },
    Undo {
        chore: ChoreId,
        assignee: AssigneeId,
        approver: String,
    },
    UndoClaim {
        chore: ChoreId,
        assignee: AssigneeId,
    },
    SetDueDate {
        chore: ChoreId,
        assignee: Option<AssigneeId>,
        due: Option<DateTime<Utc>>,
    },
    SkipDueDate {
        chore: ChoreId,
        assignee: Option<AssigneeId>,
    },
    ResetToPending {
        chore: ChoreId,
        assignee: Option<AssigneeId>,
    },
    ResetOverdue {
        chore: Option<ChoreId>,
    },
    SetRotationTurn {
        chore: ChoreId,
        assignee: AssigneeId,
    },
    ResetRotation {
        chore: ChoreId,
    },
    OpenRotationCycle {
        chore: ChoreId,
    },
    Status {
        assignee: Option<AssigneeId>,
    },
    PendingApprovals,
    Definition {
        chore: ChoreId,
    },
    Tick {
        trigger: ScanTrigger,
    },
}

impl Operation {
    /// Reads never write the snapshot
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::PendingApprovals | Self::Definition { .. }
        )
    }
}

/// What an operation produced besides its events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Done,
    /// False when the chore was already approved
    Approved {
        newly: bool,
    },
    /// Points the ledger should take back after an undo
    Reclaim {
        points: f64,
    },
    Cleared {
        count: usize,
    },
    Statuses {
        statuses: Vec<ChoreStatus>,
    },
    Pending {
        approvals: Vec<PendingApproval>,
    },
    Definition {
        definition: Option<Box<ChoreDefinition>>,
    },
    Tick {
        report: TickReport,
    },
}

/// Run one operation and collect the events it announced
///
/// Callers run operations one at a time, so everything published while
/// this runs belongs to it.
pub async fn execute<S, C>(
    orchestrator: &Orchestrator<S, C>,
    operation: Operation,
) -> Result<(Outcome, Vec<ChoreEvent>), ChoreError>
where
    S: SnapshotStore,
    C: Clock,
{
    let (watch, mut announced) = orchestrator.bus().subscribe(EventFilter::all());
    let result = run(orchestrator, operation).await;
    orchestrator.bus().unsubscribe(watch);

    let outcome = result?;
    let mut events = Vec::new();
    while let Ok(event) = announced.try_recv() {
        events.push(event);
    }
    Ok((outcome, events))
}

async fn run<S, C>(
    orchestrator: &Orchestrator<S, C>,
    operation: Operation,
) -> Result<Outcome, ChoreError>
where
    S: SnapshotStore,
    C: Clock,
{
    let outcome = match operation {
        Operation::UpsertAssignee { id, name } => {
            orchestrator.upsert_assignee(id, name).await?;
            Outcome::Done
        }
        Operation::RemoveAssignee { id } => {
            orchestrator.remove_assignee(&id).await?;
            Outcome::Done
        }
        Operation::UpsertChore { definition } => {
            orchestrator.upsert_chore(*definition).await?;
            Outcome::Done
        }
        Operation::UpdateAssignees { chore, assigned } => {
            orchestrator.update_assignees(&chore, assigned).await?;
            Outcome::Done
        }
        Operation::RemoveChore { chore } => {
            orchestrator.remove_chore(&chore).await?;
            Outcome::Done
        }
        Operation::Claim {
            chore,
            assignee,
            actor,
        } => {
            orchestrator.claim(&assignee, &chore, &actor).await?;
            Outcome::Done
        }
        Operation::Approve {
            chore,
            assignee,
            approver,
            points,
        } => {
            let newly = orchestrator
                .approve(&approver, &assignee, &chore, points)
                .await?;
            Outcome::Approved { newly }
        }
        Operation::Disapprove {
            chore,
            assignee,
            approver,
            reason,
        } => {
            orchestrator
                .disapprove(&approver, &assignee, &chore, reason)
                .await?;
            Outcome::Done
        }
        Operation::Undo {
            chore,
            assignee,
            approver,
        } => {
            let points = orchestrator.undo(&assignee, &chore, &approver).await?;
            Outcome::Reclaim { points }
        }
        Operation::UndoClaim { chore, assignee } => {
            orchestrator.undo_claim(&assignee, &chore).await?;
            Outcome::Done
        }
        Operation::SetDueDate {
            chore,
            assignee,
            due,
        } => {
            orchestrator
                .set_due_date(&chore, assignee.as_ref(), due)
                .await?;
            Outcome::Done
        }
        Operation::SkipDueDate { chore, assignee } => {
            orchestrator.skip_due_date(&chore, assignee.as_ref()).await?;
            Outcome::Done
        }
        Operation::ResetToPending { chore, assignee } => {
            orchestrator
                .reset_chore_to_pending(&chore, assignee.as_ref())
                .await?;
            Outcome::Done
        }
        Operation::ResetOverdue { chore } => {
            let count = orchestrator.reset_overdue_chores(chore.as_ref()).await?;
            Outcome::Cleared { count }
        }
        Operation::SetRotationTurn { chore, assignee } => {
            orchestrator.set_rotation_turn(&chore, &assignee).await?;
            Outcome::Done
        }
        Operation::ResetRotation { chore } => {
            orchestrator.reset_rotation(&chore).await?;
            Outcome::Done
        }
        Operation::OpenRotationCycle { chore } => {
            orchestrator.open_rotation_cycle(&chore).await?;
            Outcome::Done
        }
        Operation::Status { assignee } => Outcome::Statuses {
            statuses: orchestrator.get_chore_status_context(assignee.as_ref()),
        },
        Operation::PendingApprovals => Outcome::Pending {
            approvals: orchestrator.get_pending_approvals(),
        },
        Operation::Definition { chore } => Outcome::Definition {
            definition: orchestrator.definition(&chore).map(Box::new),
        },
        Operation::Tick { trigger } => Outcome::Tick {
            report: orchestrator.run_tick(trigger).await?,
        },
    };
    Ok(outcome)
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
