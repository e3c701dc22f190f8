// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One scheduler pass on demand

use crate::context::{unexpected, Household};
use crate::output::tick_summary;
use chore_core::ScanTrigger;
use chore_daemon::{Operation, Outcome};
use clap::Args;

#[derive(Args)]
pub struct TickArgs {
    /// Run the local-midnight pass instead of the due-date pass
    #[arg(long)]
    pub midnight: bool,
}

pub async fn handle(household: &mut Household, args: TickArgs) -> anyhow::Result<()> {
    let trigger = if args.midnight {
        ScanTrigger::Midnight
    } else {
        ScanTrigger::DueDate
    };
    match household.run(Operation::Tick { trigger }).await? {
        Outcome::Tick { report } => println!("{}", tick_summary(&report)),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}
