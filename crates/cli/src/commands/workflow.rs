// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim and approval commands

use crate::context::{unexpected, Household, PairArgs};
use chore_daemon::{Operation, Outcome};
use clap::Args;

#[derive(Args)]
pub struct ApproveArgs {
    #[command(flatten)]
    pub pair: PairArgs,
    /// Award these points instead of the chore's default
    #[arg(long)]
    pub points: Option<f64>,
}

#[derive(Args)]
pub struct DisapproveArgs {
    #[command(flatten)]
    pub pair: PairArgs,
    /// Why the claim was rejected
    #[arg(long)]
    pub reason: Option<String>,
}

pub async fn claim(household: &mut Household, pair: PairArgs, actor: &str) -> anyhow::Result<()> {
    let (chore, assignee) = pair.ids();
    household
        .apply(Operation::Claim {
            chore: chore.clone(),
            assignee: assignee.clone(),
            actor: actor.to_string(),
        })
        .await?;
    println!("Claimed {} for {}", chore, assignee);
    Ok(())
}

pub async fn approve(
    household: &mut Household,
    args: ApproveArgs,
    actor: &str,
) -> anyhow::Result<()> {
    let (chore, assignee) = args.pair.ids();
    let operation = Operation::Approve {
        chore: chore.clone(),
        assignee: assignee.clone(),
        approver: actor.to_string(),
        points: args.points,
    };
    match household.run(operation).await? {
        Outcome::Approved { newly: true } => println!("Approved {} for {}", chore, assignee),
        Outcome::Approved { newly: false } => {
            println!("{} was already approved for {}", chore, assignee)
        }
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

pub async fn disapprove(
    household: &mut Household,
    args: DisapproveArgs,
    actor: &str,
) -> anyhow::Result<()> {
    let (chore, assignee) = args.pair.ids();
    household
        .apply(Operation::Disapprove {
            chore: chore.clone(),
            assignee: assignee.clone(),
            approver: actor.to_string(),
            reason: args.reason,
        })
        .await?;
    println!("Disapproved {} for {}", chore, assignee);
    Ok(())
}

pub async fn undo(household: &mut Household, pair: PairArgs, actor: &str) -> anyhow::Result<()> {
    let (chore, assignee) = pair.ids();
    let operation = Operation::Undo {
        chore: chore.clone(),
        assignee: assignee.clone(),
        approver: actor.to_string(),
    };
    match household.run(operation).await? {
        Outcome::Reclaim { points } => {
            println!("Undid {} for {} (reclaim {} points)", chore, assignee, points)
        }
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

pub async fn undo_claim(household: &mut Household, pair: PairArgs) -> anyhow::Result<()> {
    let (chore, assignee) = pair.ids();
    household
        .apply(Operation::UndoClaim {
            chore: chore.clone(),
            assignee: assignee.clone(),
        })
        .await?;
    println!("Withdrew claim on {} for {}", chore, assignee);
    Ok(())
}
