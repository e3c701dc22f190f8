// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event filters for collaborators that only care about part of the household

use chore_core::{AssigneeId, ChoreEvent, ChoreId};
use serde::{Deserialize, Serialize};

/// Which announced events a subscriber or journal query wants
///
/// Every field that is set must match. No kinds means every kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// Event names such as `chore:approved`
    pub kinds: Vec<String>,
    pub chore: Option<ChoreId>,
    /// Also matches completions and turn changes that name the assignee
    pub assignee: Option<AssigneeId>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn for_chore(mut self, chore: impl Into<ChoreId>) -> Self {
        self.chore = Some(chore.into());
        self
    }

    pub fn for_assignee(mut self, assignee: impl Into<AssigneeId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn matches(&self, event: &ChoreEvent) -> bool {
        let kind = event.name();
        (self.kinds.is_empty() || self.kinds.iter().any(|k| k == kind))
            && self.chore.as_ref().map_or(true, |c| c == event.chore_id())
            && self.assignee.as_ref().map_or(true, |a| event.involves(a))
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
