// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The full chore/assignee record set, as loaded and persisted

use crate::chore::ChoreDefinition;
use crate::id::{AssigneeId, ChoreId};
use crate::record::AssigneeChoreRecord;
use crate::rotation::CompletionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A person who can be assigned chores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: AssigneeId,
    pub name: String,
}

/// One chore's definition together with its per-assignee records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreEntry {
    pub definition: ChoreDefinition,
    #[serde(default)]
    pub records: BTreeMap<AssigneeId, AssigneeChoreRecord>,
}

impl ChoreEntry {
    pub fn new(definition: ChoreDefinition) -> Self {
        Self {
            definition,
            records: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &ChoreId {
        &self.definition.id
    }

    pub fn record(&self, assignee: &AssigneeId) -> Option<&AssigneeChoreRecord> {
        self.records.get(assignee)
    }

    /// The record for a pair, created on first access
    pub fn record_mut(&mut self, assignee: &AssigneeId) -> &mut AssigneeChoreRecord {
        let period_start = self.period_start_for(assignee);
        self.records
            .entry(assignee.clone())
            .or_insert_with(|| AssigneeChoreRecord {
                approval_period_start: period_start,
                ..Default::default()
            })
    }

    pub fn period_start_for(&self, assignee: &AssigneeId) -> Option<DateTime<Utc>> {
        if self.definition.criteria.uses_chore_level_schedule() {
            self.definition.approval_period_start
        } else {
            self.records
                .get(assignee)
                .and_then(|r| r.approval_period_start)
        }
    }

    pub fn is_approved_in_period(&self, assignee: &AssigneeId) -> bool {
        self.record(assignee)
            .is_some_and(AssigneeChoreRecord::is_approved_in_period)
    }

    pub fn has_pending_claim(&self, assignee: &AssigneeId) -> bool {
        self.record(assignee)
            .is_some_and(AssigneeChoreRecord::has_pending_claim)
    }

    /// Every assigned assignee is approved in the current period
    pub fn all_approved(&self) -> bool {
        !self.definition.assigned.is_empty()
            && self
                .definition
                .assigned
                .iter()
                .all(|a| self.is_approved_in_period(a))
    }

    pub fn any_approved(&self) -> bool {
        self.definition
            .assigned
            .iter()
            .any(|a| self.is_approved_in_period(a))
    }

    /// First assigned assignee approved in the current period
    pub fn approver(&self) -> Option<&AssigneeId> {
        self.definition
            .assigned
            .iter()
            .find(|a| self.is_approved_in_period(a))
    }

    /// Lifetime completion statistics for assigned assignees with records
    pub fn completion_stats(&self) -> BTreeMap<AssigneeId, CompletionStats> {
        self.definition
            .assigned
            .iter()
            .filter_map(|a| {
                let record = self.records.get(a)?;
                Some((
                    a.clone(),
                    CompletionStats {
                        completions: record.total_completions,
                        last_completed: record.last_completed,
                    },
                ))
            })
            .collect()
    }

    /// Drop records of assignees no longer assigned
    pub fn prune_records(&mut self) {
        let assigned = &self.definition.assigned;
        self.records.retain(|a, _| assigned.contains(a));
    }
}

/// The whole record set shared by the scan and action paths
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoreSet {
    #[serde(default)]
    pub assignees: BTreeMap<AssigneeId, Assignee>,
    #[serde(default)]
    pub chores: BTreeMap<ChoreId, ChoreEntry>,
}

impl ChoreSet {
    pub fn assignee_name(&self, id: &AssigneeId) -> Option<&str> {
        self.assignees.get(id).map(|a| a.name.as_str())
    }

    pub fn entry(&self, chore: &ChoreId) -> Option<&ChoreEntry> {
        self.chores.get(chore)
    }

    pub fn entry_mut(&mut self, chore: &ChoreId) -> Option<&mut ChoreEntry> {
        self.chores.get_mut(chore)
    }
}
