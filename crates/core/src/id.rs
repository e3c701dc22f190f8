// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for assignees, chores, and the pairs that join them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a person who can be assigned chores
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssigneeId(pub String);

impl AssigneeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssigneeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssigneeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssigneeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a chore
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoreId(pub String);

impl ChoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ChoreId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChoreId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An (assignee, chore) pair; the unit of locking and per-person state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub assignee: AssigneeId,
    pub chore: ChoreId,
}

impl PairKey {
    pub fn new(assignee: impl Into<AssigneeId>, chore: impl Into<ChoreId>) -> Self {
        Self {
            assignee: assignee.into(),
            chore: chore.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.assignee, self.chore)
    }
}
