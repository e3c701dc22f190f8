// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chore-engine: the chore workflow orchestrator
//!
//! Owns the shared record set, serializes mutations per (assignee, chore)
//! pair, persists before announcing, and runs the scheduled time passes.

mod actions;
mod admin;
mod config;
mod error;
pub mod events;
mod locks;
mod mutation;
mod orchestrator;
mod queries;
mod scanner;
mod tick;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use error::ChoreError;
pub use events::{
    EventBus, EventFilter, EventLog, EventReceiver, EventRecord, EventSender, SubscriberId,
};
pub use locks::{PairGuard, PairLocks};
pub use orchestrator::Orchestrator;
pub use queries::{ChoreStatus, PendingApproval};
pub use scanner::{scan_time_checks, ScanEntry, TimeScan};
pub use tick::{OverdueOutcome, ResetOutcome, TickReport};
