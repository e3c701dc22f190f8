// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore definition commands

use crate::context::Household;
use anyhow::Context;
use chore_core::{AssigneeId, ChoreDefinition};
use chore_daemon::Operation;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ChoreArgs {
    #[command(subcommand)]
    pub command: ChoreCommand,
}

#[derive(Subcommand)]
pub enum ChoreCommand {
    /// Create or replace a chore from a JSON definition file
    Add {
        /// Path to the definition
        file: PathBuf,
    },
    /// Replace a chore's ordered assignee list
    Assign {
        /// Chore id
        chore: String,
        /// Assignee ids, in rotation order
        #[arg(required = true)]
        assignees: Vec<String>,
    },
    /// Delete a chore and its records
    Remove {
        /// Chore id
        chore: String,
    },
}

pub async fn handle(household: &mut Household, args: ChoreArgs) -> anyhow::Result<()> {
    match args.command {
        ChoreCommand::Add { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let definition: ChoreDefinition = serde_json::from_str(&text)
                .with_context(|| format!("invalid chore definition in {}", file.display()))?;
            let id = definition.id.clone();
            household
                .apply(Operation::UpsertChore {
                    definition: Box::new(definition),
                })
                .await?;
            println!("Saved chore {}", id);
        }
        ChoreCommand::Assign { chore, assignees } => {
            let assigned = assignees
                .iter()
                .map(|a| AssigneeId::from(a.as_str()))
                .collect();
            household
                .apply(Operation::UpdateAssignees {
                    chore: chore.as_str().into(),
                    assigned,
                })
                .await?;
            println!("Assigned {} to {}", chore, assignees.join(", "));
        }
        ChoreCommand::Remove { chore } => {
            household
                .apply(Operation::RemoveChore {
                    chore: chore.as_str().into(),
                })
                .await?;
            println!("Removed chore {}", chore);
        }
    }
    Ok(())
}
