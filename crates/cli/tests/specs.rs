//! Behavioral specifications for the chores CLI.
//!
//! These tests are black-box: they invoke the CLI binary against a
//! temporary snapshot file and verify stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/daemon.rs"]
mod cli_daemon;
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// household/
#[path = "specs/household/setup.rs"]
mod household_setup;

// workflow/
#[path = "specs/workflow/claims.rs"]
mod workflow_claims;
#[path = "specs/workflow/rotation.rs"]
mod workflow_rotation;

// schedule/
#[path = "specs/schedule/due_dates.rs"]
mod schedule_due_dates;
#[path = "specs/schedule/ticks.rs"]
mod schedule_ticks;
