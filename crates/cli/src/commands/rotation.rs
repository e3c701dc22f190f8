// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation turn commands

use crate::context::Household;
use chore_core::ChoreId;
use chore_daemon::Operation;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct RotationArgs {
    #[command(subcommand)]
    pub command: RotationCommand,
}

#[derive(Subcommand)]
pub enum RotationCommand {
    /// Hand the turn to an assignee
    Set {
        /// Chore id
        chore: String,
        /// Assignee id
        assignee: String,
    },
    /// Give the turn back to the first assignee
    Reset {
        /// Chore id
        chore: String,
    },
    /// Let every assignee claim until the next approval
    Open {
        /// Chore id
        chore: String,
    },
}

pub async fn handle(household: &mut Household, args: RotationArgs) -> anyhow::Result<()> {
    match args.command {
        RotationCommand::Set { chore, assignee } => {
            household
                .apply(Operation::SetRotationTurn {
                    chore: chore.as_str().into(),
                    assignee: assignee.as_str().into(),
                })
                .await?;
            println!("Turn for {} is now {}", chore, assignee);
        }
        RotationCommand::Reset { chore } => {
            let id = ChoreId::from(chore.as_str());
            household
                .apply(Operation::ResetRotation { chore: id.clone() })
                .await?;
            let turn = household
                .definition(&id)
                .await?
                .and_then(|d| d.rotation.turn)
                .map_or_else(|| "-".to_string(), |a| a.to_string());
            println!("Rotation for {} reset; turn is {}", chore, turn);
        }
        RotationCommand::Open { chore } => {
            household
                .apply(Operation::OpenRotationCycle {
                    chore: chore.as_str().into(),
                })
                .await?;
            println!("Rotation for {} open to everyone", chore);
        }
    }
    Ok(())
}
