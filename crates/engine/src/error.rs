// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the chore workflow

use chore_core::{AssigneeId, BlockReason, ChoreId, ChoreState, DefinitionError};
use chore_storage::StorageError;
use thiserror::Error;

/// Errors surfaced to callers of the orchestrator
#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("chore not found: {0}")]
    ChoreNotFound(ChoreId),
    #[error("assignee not found: {0}")]
    AssigneeNotFound(AssigneeId),
    #[error("{0}")]
    Blocked(#[from] BlockReason),
    #[error("invalid chore definition: {0}")]
    Definition(#[from] DefinitionError),
    #[error("no claim is waiting for approval for {assignee} on {chore}")]
    NoPendingClaim { assignee: AssigneeId, chore: ChoreId },
    #[error("{assignee} has no approval to undo on {chore}")]
    NotApproved { assignee: AssigneeId, chore: ChoreId },
    #[error("cannot {action} a chore that is {state}")]
    IllegalTransition {
        action: &'static str,
        state: ChoreState,
    },
    #[error("chore {0} does not rotate")]
    NotRotation(ChoreId),
    #[error("chore {0} does not recur")]
    NotRecurring(ChoreId),
    #[error("failed to persist snapshot: {0}")]
    Persist(#[from] StorageError),
}
