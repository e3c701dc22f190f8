// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Due-date and reset commands

use crate::context::{unexpected, Household};
use crate::output::{due_dates, print_lines};
use chore_core::{AssigneeId, ChoreId};
use chore_daemon::{Operation, Outcome};
use chrono::{DateTime, Utc};
use clap::Args;

#[derive(Args)]
pub struct ChoreScopeArgs {
    /// Chore id
    pub chore: String,
    /// Limit to one assignee (independent chores)
    #[arg(long)]
    pub assignee: Option<String>,
}

impl ChoreScopeArgs {
    fn ids(&self) -> (ChoreId, Option<AssigneeId>) {
        (
            ChoreId::from(self.chore.as_str()),
            self.assignee.as_deref().map(AssigneeId::from),
        )
    }
}

#[derive(Args)]
pub struct SetDueArgs {
    #[command(flatten)]
    pub scope: ChoreScopeArgs,
    /// New due date (RFC 3339)
    #[arg(required_unless_present = "clear")]
    pub due: Option<DateTime<Utc>>,
    /// Remove the due date instead
    #[arg(long, conflicts_with = "due")]
    pub clear: bool,
}

#[derive(Args)]
pub struct ResetOverdueArgs {
    /// Only this chore
    pub chore: Option<String>,
}

pub async fn set_due(household: &mut Household, args: SetDueArgs) -> anyhow::Result<()> {
    let (chore, assignee) = args.scope.ids();
    household
        .apply(Operation::SetDueDate {
            chore: chore.clone(),
            assignee,
            due: args.due,
        })
        .await?;
    println!("Updated due date for {}", chore);
    print_due_dates(household, &chore).await
}

pub async fn skip_due(household: &mut Household, args: ChoreScopeArgs) -> anyhow::Result<()> {
    let (chore, assignee) = args.ids();
    household
        .apply(Operation::SkipDueDate {
            chore: chore.clone(),
            assignee,
        })
        .await?;
    println!("Skipped {} to its next due date", chore);
    print_due_dates(household, &chore).await
}

pub async fn reset(household: &mut Household, args: ChoreScopeArgs) -> anyhow::Result<()> {
    let (chore, assignee) = args.ids();
    household
        .apply(Operation::ResetToPending {
            chore: chore.clone(),
            assignee: assignee.clone(),
        })
        .await?;
    match assignee {
        Some(assignee) => println!("Reset {} to pending for {}", chore, assignee),
        None => println!("Reset {} to pending", chore),
    }
    Ok(())
}

pub async fn reset_overdue(
    household: &mut Household,
    args: ResetOverdueArgs,
) -> anyhow::Result<()> {
    let chore = args.chore.as_deref().map(ChoreId::from);
    match household.run(Operation::ResetOverdue { chore }).await? {
        Outcome::Cleared { count } => println!("Reset {} overdue pair(s)", count),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

async fn print_due_dates(household: &mut Household, chore: &ChoreId) -> anyhow::Result<()> {
    if let Some(definition) = household.definition(chore).await? {
        print_lines(&due_dates(&definition));
    }
    Ok(())
}
