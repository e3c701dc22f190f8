// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-triggered chore actions

use crate::error::ChoreError;
use crate::mutation::{self, ApprovalRequest};
use crate::orchestrator::Orchestrator;
use chore_core::{ApprovalOrigin, AssigneeId, ChoreId, Clock};
use chore_storage::SnapshotStore;

impl<S, C> Orchestrator<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    /// Claim a chore for an assignee
    ///
    /// Auto-approve chores are approved in the same write.
    pub async fn claim(
        &self,
        assignee: &AssigneeId,
        chore: &ChoreId,
        actor_name: &str,
    ) -> Result<(), ChoreError> {
        let _guard = self.lock_pair(assignee, chore).await;
        let now = self.now();
        let offset = self.offset();
        let auto_approver = self.config().auto_approver_name.clone();

        self.apply(|set, batch| {
            mutation::claim_pair(set, chore, assignee, actor_name, now, batch)?;
            let auto = set.entry(chore).is_some_and(|e| e.definition.auto_approve);
            if auto {
                let req = ApprovalRequest {
                    assignee,
                    approver_name: &auto_approver,
                    points_override: None,
                    origin: ApprovalOrigin::AutoApprove,
                    now,
                    offset,
                    run_reset_policy: true,
                };
                mutation::approve_pair(set, chore, &req, batch)?;
            }
            Ok(())
        })
        .await
    }

    /// Approve an assignee's chore
    ///
    /// Returns false when it was already approved; a concurrent duplicate
    /// approval is not an error.
    pub async fn approve(
        &self,
        approver_name: &str,
        assignee: &AssigneeId,
        chore: &ChoreId,
        points_override: Option<f64>,
    ) -> Result<bool, ChoreError> {
        let _guard = self.lock_pair(assignee, chore).await;
        let req = ApprovalRequest {
            assignee,
            approver_name,
            points_override,
            origin: ApprovalOrigin::Manual,
            now: self.now(),
            offset: self.offset(),
            run_reset_policy: true,
        };
        self.apply(|set, batch| mutation::approve_pair(set, chore, &req, batch))
            .await
    }

    /// Reject a claim waiting for approval
    pub async fn disapprove(
        &self,
        approver_name: &str,
        assignee: &AssigneeId,
        chore: &ChoreId,
        reason: Option<String>,
    ) -> Result<(), ChoreError> {
        let _guard = self.lock_pair(assignee, chore).await;
        let now = self.now();
        self.apply(|set, batch| {
            mutation::disapprove_pair(set, chore, assignee, approver_name, reason, now, batch)
        })
        .await
    }

    /// Reverse an approval; returns the points the ledger should reclaim
    pub async fn undo(
        &self,
        assignee: &AssigneeId,
        chore: &ChoreId,
        approver_name: &str,
    ) -> Result<f64, ChoreError> {
        let _guard = self.lock_pair(assignee, chore).await;
        let now = self.now();
        let points = self
            .apply(|set, batch| mutation::undo_approval(set, chore, assignee, now, batch))
            .await?;
        tracing::info!(%chore, %assignee, approver = approver_name, points, "approval undone");
        Ok(points)
    }

    /// Withdraw a claim that has not been approved
    pub async fn undo_claim(
        &self,
        assignee: &AssigneeId,
        chore: &ChoreId,
    ) -> Result<(), ChoreError> {
        let _guard = self.lock_pair(assignee, chore).await;
        let now = self.now();
        self.apply(|set, batch| mutation::undo_claim(set, chore, assignee, now, batch))
            .await?;
        tracing::info!(%chore, %assignee, "claim withdrawn");
        Ok(())
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
