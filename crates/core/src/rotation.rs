// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation turn selection and reconciliation

use crate::chore::{ChoreDefinition, CompletionCriteria};
use crate::id::AssigneeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a rotation turn changed hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMethod {
    Simple,
    Smart,
    Manual,
    Reset,
}

impl fmt::Display for RotationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RotationMethod::Simple => "simple",
            RotationMethod::Smart => "smart",
            RotationMethod::Manual => "manual",
            RotationMethod::Reset => "reset",
        };
        f.write_str(s)
    }
}

/// Lifetime completion figures used by smart rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionStats {
    pub completions: u32,
    pub last_completed: Option<DateTime<Utc>>,
}

/// The assignee after `from` in list order, wrapping
///
/// When `from` is not in the list the first assignee gets the turn.
pub fn next_turn_simple(assigned: &[AssigneeId], from: &AssigneeId) -> Option<AssigneeId> {
    let next = match assigned.iter().position(|a| a == from) {
        Some(i) => (i + 1) % assigned.len(),
        None => 0,
    };
    assigned.get(next).cloned()
}

/// The assignee with the fewest completions, oldest last completion first
///
/// Returns None when no statistics exist, so callers can fall back to simple.
pub fn next_turn_smart(
    assigned: &[AssigneeId],
    stats: &BTreeMap<AssigneeId, CompletionStats>,
) -> Option<AssigneeId> {
    if stats.is_empty() {
        return None;
    }
    assigned
        .iter()
        .min_by_key(|a| {
            let s = stats.get(*a).copied().unwrap_or_default();
            (s.completions, s.last_completed)
        })
        .cloned()
}

/// Pick the next turn holder after `from` finished or missed
pub fn select_next_turn(
    definition: &ChoreDefinition,
    from: &AssigneeId,
    stats: &BTreeMap<AssigneeId, CompletionStats>,
) -> Option<(AssigneeId, RotationMethod)> {
    match definition.criteria {
        CompletionCriteria::RotationSimple => {
            next_turn_simple(&definition.assigned, from).map(|a| (a, RotationMethod::Simple))
        }
        CompletionCriteria::RotationSmart => {
            match next_turn_smart(&definition.assigned, stats) {
                Some(next) => Some((next, RotationMethod::Smart)),
                None => {
                    next_turn_simple(&definition.assigned, from).map(|a| (a, RotationMethod::Simple))
                }
            }
        }
        _ => None,
    }
}

/// Keep the turn valid after the assignment list changed
///
/// A holder who left passes the turn to the first remaining assignee found by
/// walking the previous order forward from the holder's old position.
pub fn reconcile_turn(
    previous: &[AssigneeId],
    current: &[AssigneeId],
    turn: Option<&AssigneeId>,
) -> Option<AssigneeId> {
    let first = current.first()?;
    let Some(turn) = turn else {
        return Some(first.clone());
    };
    if current.contains(turn) {
        return Some(turn.clone());
    }
    let Some(pos) = previous.iter().position(|a| a == turn) else {
        return Some(first.clone());
    };
    previous[pos + 1..]
        .iter()
        .chain(previous[..pos].iter())
        .find(|a| current.contains(a))
        .or(Some(first))
        .cloned()
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
