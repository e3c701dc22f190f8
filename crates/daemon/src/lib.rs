// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chore-daemon: owns a household's snapshot and serves it to `chores`
//!
//! Loads `chored.toml`, holds the PID and snapshot locks, runs the periodic
//! due-date tick and the local-midnight tick, and applies client operations
//! received over a Unix socket.

mod config;
mod lifecycle;
mod lock;
mod operation;
pub mod protocol;
mod server;

pub use config::{socket_path_for, state_dir, DaemonConfig};
pub use lifecycle::{
    startup, startup_with_clock, until_next_midnight, Daemon, DaemonError, DaemonOrchestrator,
};
pub use lock::{lock_path, DataLock};
pub use operation::{execute, Operation, Outcome};
pub use protocol::{Request, Response};
pub use server::{handle_connection, handle_request, ServerError};
