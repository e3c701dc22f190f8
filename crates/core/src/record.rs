// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-assignee chore records
//!
//! One record exists per (assignee, chore) pair, created lazily on first
//! interaction. Streak counters live here so that pruning of historical
//! statistics elsewhere cannot corrupt them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of one assignee's copy of a chore
///
/// `NotMyTurn` and `Waiting` are only ever resolved on read; they are never
/// written to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreState {
    #[default]
    Pending,
    Claimed,
    Approved,
    Overdue,
    Missed,
    NotMyTurn,
    Waiting,
}

impl fmt::Display for ChoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChoreState::Pending => "pending",
            ChoreState::Claimed => "claimed",
            ChoreState::Approved => "approved",
            ChoreState::Overdue => "overdue",
            ChoreState::Missed => "missed",
            ChoreState::NotMyTurn => "not_my_turn",
            ChoreState::Waiting => "waiting",
        };
        f.write_str(s)
    }
}

/// Who claimed or completed a chore
///
/// A single name for independent and single-claimer chores, a list for shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ownership {
    One(String),
    Many(Vec<String>),
}

impl Ownership {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Ownership::One(name) => vec![name.as_str()],
            Ownership::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }

    /// Add a name, turning a single owner into a list
    pub fn with(self, name: &str) -> Self {
        let mut names: Vec<String> = match self {
            Ownership::One(existing) => vec![existing],
            Ownership::Many(existing) => existing,
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        Ownership::Many(names)
    }
}

/// Values captured at approval time so an undo can restore them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoSnapshot {
    pub streak: u32,
    pub longest_streak: u32,
    pub missed_streak: u32,
    pub last_completed: Option<DateTime<Utc>>,
    pub points: f64,
}

/// State for one (assignee, chore) pair
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssigneeChoreRecord {
    pub state: ChoreState,
    /// Claims awaiting approval; more than one only for multi-claim chores
    pub pending_claim_count: u32,
    /// Per assignee for independent chores, mirrored from the chore otherwise
    pub approval_period_start: Option<DateTime<Utc>>,
    pub last_claimed: Option<DateTime<Utc>>,
    /// Work timestamp of the latest approval
    pub last_approved: Option<DateTime<Utc>>,
    pub last_completed: Option<DateTime<Utc>>,
    pub last_disapproved: Option<DateTime<Utc>>,
    pub last_overdue: Option<DateTime<Utc>>,
    pub last_missed: Option<DateTime<Utc>>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub current_missed_streak: u32,
    pub total_completions: u32,
    pub total_missed: u32,
    pub claimed_by: Option<Ownership>,
    pub completed_by: Option<Ownership>,
    pub undo: Option<UndoSnapshot>,
    /// Due date a due-window notice was already announced for
    pub due_window_notified: Option<DateTime<Utc>>,
    /// Due date a reminder was already announced for
    pub reminder_notified: Option<DateTime<Utc>>,
}

impl AssigneeChoreRecord {
    pub fn has_pending_claim(&self) -> bool {
        self.pending_claim_count > 0
    }

    /// Approved and not yet cleared by a reset boundary
    ///
    /// A multi-claim pair that claims again after approval leaves the
    /// approved state but keeps the approval it earned this period.
    pub fn is_approved_in_period(&self) -> bool {
        self.state == ChoreState::Approved || self.approved_since_period_start()
    }

    /// An approval's work time falls after the current period began
    pub fn approved_since_period_start(&self) -> bool {
        self.last_approved.is_some_and(|approved| {
            self.approval_period_start
                .map_or(true, |start| approved > start)
        })
    }

    /// Return to pending at the start of a new approval period
    pub fn reset_to_pending(&mut self, period_start: DateTime<Utc>) {
        self.state = ChoreState::Pending;
        self.pending_claim_count = 0;
        self.claimed_by = None;
        self.completed_by = None;
        self.undo = None;
        self.approval_period_start = Some(period_start);
    }

    /// Count a miss: breaks the completion streak, extends the missed one
    pub fn record_missed(&mut self, now: DateTime<Utc>) {
        self.last_missed = Some(now);
        self.current_missed_streak = self.current_missed_streak.saturating_add(1);
        self.total_missed = self.total_missed.saturating_add(1);
        self.current_streak = 0;
    }

    /// Whether a reset would change this assignee's own state
    ///
    /// Ownership copied from another assignee's action does not count.
    pub fn is_dirty(&self) -> bool {
        self.state != ChoreState::Pending
            || self.pending_claim_count > 0
            || self.is_approved_in_period()
    }
}
