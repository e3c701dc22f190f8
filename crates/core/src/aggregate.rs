// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived chore-wide ("global") state
//!
//! Never stored: recomputed from the per-assignee records on every read.

use crate::chore::CompletionCriteria;
use crate::record::ChoreState;
use crate::snapshot::ChoreEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chore-wide state combining every assignee's record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalState {
    Pending,
    Claimed,
    Approved,
    Overdue,
    Missed,
    ClaimedInPart,
    ApprovedInPart,
    /// Independent assignees are in different states
    Independent,
}

impl fmt::Display for GlobalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GlobalState::Pending => "pending",
            GlobalState::Claimed => "claimed",
            GlobalState::Approved => "approved",
            GlobalState::Overdue => "overdue",
            GlobalState::Missed => "missed",
            GlobalState::ClaimedInPart => "claimed_in_part",
            GlobalState::ApprovedInPart => "approved_in_part",
            GlobalState::Independent => "independent",
        };
        f.write_str(s)
    }
}

impl From<ChoreState> for GlobalState {
    fn from(state: ChoreState) -> Self {
        match state {
            ChoreState::Claimed => GlobalState::Claimed,
            ChoreState::Approved => GlobalState::Approved,
            ChoreState::Overdue => GlobalState::Overdue,
            ChoreState::Missed => GlobalState::Missed,
            ChoreState::Pending | ChoreState::NotMyTurn | ChoreState::Waiting => {
                GlobalState::Pending
            }
        }
    }
}

/// Most advanced state wins; used by single-claimer chores
fn first_wins(states: &[GlobalState]) -> GlobalState {
    [
        GlobalState::Approved,
        GlobalState::Claimed,
        GlobalState::Overdue,
        GlobalState::Missed,
    ]
    .into_iter()
    .find(|s| states.contains(s))
    .unwrap_or(GlobalState::Pending)
}

/// Combine all assignee states under the chore's completion criteria
pub fn global_state(entry: &ChoreEntry, now: DateTime<Utc>) -> GlobalState {
    let definition = &entry.definition;
    let states: Vec<GlobalState> = definition
        .assigned
        .iter()
        .map(|a| GlobalState::from(entry.resolve(a, now).0))
        .collect();

    let Some(first) = states.first().copied() else {
        return GlobalState::Pending;
    };
    if states.iter().all(|s| *s == first) {
        return first;
    }

    match definition.criteria {
        CompletionCriteria::Independent => GlobalState::Independent,
        CompletionCriteria::Shared => {
            if states.contains(&GlobalState::Approved) {
                GlobalState::ApprovedInPart
            } else if states.contains(&GlobalState::Claimed) {
                GlobalState::ClaimedInPart
            } else {
                first_wins(&states)
            }
        }
        CompletionCriteria::SharedFirst => first_wins(&states),
        CompletionCriteria::RotationSimple | CompletionCriteria::RotationSmart => {
            if definition.is_cycle_open(now) {
                return first_wins(&states);
            }
            definition
                .rotation
                .turn
                .as_ref()
                .and_then(|turn| definition.assigned.iter().position(|a| a == turn))
                .and_then(|i| states.get(i).copied())
                .unwrap_or(GlobalState::Pending)
        }
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
