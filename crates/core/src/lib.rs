// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chore-core: pure domain model for the chore workflow
//!
//! This crate provides:
//! - Chore definitions and per-assignee records
//! - The state engine (transition table, read-side resolution, claim checks)
//! - Streak, schedule, and rotation arithmetic
//! - The approval reset policy and derived global state
//! - Events announced after state changes persist

pub mod clock;
pub mod id;

// Definitions and records (order matters for dependencies)
pub mod chore;
pub mod record;
pub mod schedule;
pub mod snapshot;

// State engine
pub mod aggregate;
pub mod event;
pub mod reset;
pub mod resolve;
pub mod rotation;
pub mod streak;
pub mod transition;

// Re-exports
pub use aggregate::{global_state, GlobalState};
pub use chore::{
    ApprovalReset, ChoreDefinition, CompletionCriteria, DefinitionError, Frequency, IntervalUnit,
    OverdueHandling, PendingClaimDisposition, Recurrence, RotationState,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{ApprovalOrigin, ChoreEvent, DueNoticeKind};
pub use id::{AssigneeId, ChoreId, PairKey};
pub use record::{AssigneeChoreRecord, ChoreState, Ownership, UndoSnapshot};
pub use reset::{
    boundary_category, decide_reset, is_reset_eligible, BoundaryCategory, ResetContext,
    ResetDecision, ResetTrigger, ScanTrigger,
};
pub use resolve::{
    can_approve, can_claim, resolve_assignee_chore_state, BlockReason, LockReason, PairFacts,
};
pub use rotation::{select_next_turn, CompletionStats, RotationMethod};
pub use snapshot::{Assignee, ChoreEntry, ChoreSet};
pub use streak::calculate_streak;
pub use transition::{calculate_transition, Action, TransitionContext, TransitionEffect};
