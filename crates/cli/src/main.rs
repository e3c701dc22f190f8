// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chores - household chore workflow CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod context;
mod output;

use anyhow::Result;
use chore_engine::EngineConfig;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use commands::{assignee, chore, daemon, rotation, schedule, status, tick, workflow};
use std::path::PathBuf;

use crate::context::{Household, PairArgs, Target};

#[derive(Parser)]
#[command(name = "chores", version, about = "Household chore workflow")]
struct Cli {
    /// Snapshot file holding the chore record set
    #[arg(long, global = true, default_value = "chores.json")]
    data: PathBuf,

    /// Socket of a chored serving the data file (defaults to one beside it)
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    /// Evaluate as if it were this instant (RFC 3339)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Name recorded as the claimer or approver
    #[arg(long = "as", global = true, default_value = "cli")]
    actor: String,

    /// Household offset from UTC, in minutes; chored uses its own setting
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    utc_offset: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Household members
    Assignee(assignee::AssigneeArgs),
    /// Chore definitions
    Chore(chore::ChoreArgs),
    /// Claim a chore for an assignee
    Claim(PairArgs),
    /// Approve an assignee's chore
    Approve(workflow::ApproveArgs),
    /// Reject a claim waiting for approval
    Disapprove(workflow::DisapproveArgs),
    /// Reverse an approval
    Undo(PairArgs),
    /// Withdraw a claim before it is approved
    UndoClaim(PairArgs),
    /// Set or clear a due date
    SetDue(schedule::SetDueArgs),
    /// Move a recurring chore to its next due date
    SkipDue(schedule::ChoreScopeArgs),
    /// Return a chore to pending
    Reset(schedule::ChoreScopeArgs),
    /// Reset overdue pairs and reschedule them
    ResetOverdue(schedule::ResetOverdueArgs),
    /// Rotation turn management
    Rotation(rotation::RotationArgs),
    /// Derived state of every assigned pair
    Status(status::StatusArgs),
    /// Claims waiting for approval, oldest first
    Pending,
    /// Run one scheduler pass
    Tick(tick::TickArgs),
    /// Background daemon control
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let target = Target {
        data: cli.data,
        socket: cli.socket,
        now: cli.now,
        config: EngineConfig {
            utc_offset_minutes: cli.utc_offset,
            ..EngineConfig::default()
        },
    };
    let command = match cli.command {
        Commands::Daemon(args) => return daemon::handle(&target, args).await,
        command => command,
    };

    let mut household = Household::open(&target).await?;
    let h = &mut household;
    let actor = cli.actor.as_str();

    match command {
        Commands::Assignee(args) => assignee::handle(h, args).await?,
        Commands::Chore(args) => chore::handle(h, args).await?,
        Commands::Claim(pair) => workflow::claim(h, pair, actor).await?,
        Commands::Approve(args) => workflow::approve(h, args, actor).await?,
        Commands::Disapprove(args) => workflow::disapprove(h, args, actor).await?,
        Commands::Undo(pair) => workflow::undo(h, pair, actor).await?,
        Commands::UndoClaim(pair) => workflow::undo_claim(h, pair).await?,
        Commands::SetDue(args) => schedule::set_due(h, args).await?,
        Commands::SkipDue(args) => schedule::skip_due(h, args).await?,
        Commands::Reset(args) => schedule::reset(h, args).await?,
        Commands::ResetOverdue(args) => schedule::reset_overdue(h, args).await?,
        Commands::Rotation(args) => rotation::handle(h, args).await?,
        Commands::Status(args) => status::status(h, args).await?,
        Commands::Pending => status::pending(h).await?,
        Commands::Tick(args) => tick::handle(h, args).await?,
        Commands::Daemon(_) => {}
    }

    output::print_lines(&output::event_lines(household.announced()));
    Ok(())
}

/// Diagnostics go to stderr
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
