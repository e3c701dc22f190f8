// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only status commands

use crate::context::{unexpected, Household};
use crate::output::{pending_table, print_lines, status_table};
use chore_core::AssigneeId;
use chore_daemon::{Operation, Outcome};
use clap::Args;

#[derive(Args)]
pub struct StatusArgs {
    /// Only this assignee's chores
    #[arg(long)]
    pub assignee: Option<String>,
}

pub async fn status(household: &mut Household, args: StatusArgs) -> anyhow::Result<()> {
    let assignee = args.assignee.as_deref().map(AssigneeId::from);
    match household.run(Operation::Status { assignee }).await? {
        Outcome::Statuses { statuses } => print_lines(&status_table(&statuses)),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

pub async fn pending(household: &mut Household) -> anyhow::Result<()> {
    match household.run(Operation::PendingApprovals).await? {
        Outcome::Pending { approvals } => print_lines(&pending_table(&approvals)),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}
