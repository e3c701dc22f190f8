// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Household member commands

use crate::context::Household;
use chore_daemon::Operation;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AssigneeArgs {
    #[command(subcommand)]
    pub command: AssigneeCommand,
}

#[derive(Subcommand)]
pub enum AssigneeCommand {
    /// Register a person or change their display name
    Add {
        /// Assignee id
        id: String,
        /// Display name
        name: String,
    },
    /// Remove a person from the household and every chore
    Remove {
        /// Assignee id
        id: String,
    },
}

pub async fn handle(household: &mut Household, args: AssigneeArgs) -> anyhow::Result<()> {
    match args.command {
        AssigneeCommand::Add { id, name } => {
            household
                .apply(Operation::UpsertAssignee {
                    id: id.as_str().into(),
                    name: name.clone(),
                })
                .await?;
            println!("Saved assignee {} ({})", id, name);
        }
        AssigneeCommand::Remove { id } => {
            household
                .apply(Operation::RemoveAssignee {
                    id: id.as_str().into(),
                })
                .await?;
            println!("Removed assignee {}", id);
        }
    }
    Ok(())
}
