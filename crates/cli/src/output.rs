// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text formatting for CLI output

use chore_core::{ChoreDefinition, ChoreEvent};
use chore_engine::{ChoreStatus, PendingApproval, TickReport};
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 to the second, or `-`
pub fn timestamp(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "-".to_string(),
        |t| t.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

pub fn status_table(statuses: &[ChoreStatus]) -> Vec<String> {
    if statuses.is_empty() {
        return vec!["No chores".to_string()];
    }

    let mut lines = vec![format!(
        "{:<16} {:<12} {:<12} {:<17} {:<7} DUE",
        "CHORE", "ASSIGNEE", "STATE", "GLOBAL", "STREAK"
    )];
    for s in statuses {
        lines.push(format!(
            "{:<16} {:<12} {:<12} {:<17} {:<7} {}",
            s.chore_id.to_string(),
            s.assignee_id.to_string(),
            s.state.to_string(),
            s.global_state.to_string(),
            s.streak,
            timestamp(s.due_date)
        ));
    }
    lines
}

pub fn pending_table(pending: &[PendingApproval]) -> Vec<String> {
    if pending.is_empty() {
        return vec!["No pending approvals".to_string()];
    }

    let mut lines = vec![format!("{:<16} {:<12} {:<7} CLAIMED", "CHORE", "ASSIGNEE", "CLAIMS")];
    for p in pending {
        lines.push(format!(
            "{:<16} {:<12} {:<7} {}",
            p.chore_id.to_string(),
            p.assignee_id.to_string(),
            p.pending_claims,
            timestamp(p.claimed_at)
        ));
    }
    lines
}

/// Per-assignee due dates after a schedule change
pub fn due_dates(definition: &ChoreDefinition) -> Vec<String> {
    definition
        .assigned
        .iter()
        .map(|a| format!("  {}: {}", a, timestamp(definition.due_date_for(a))))
        .collect()
}

pub fn tick_summary(report: &TickReport) -> String {
    format!(
        "{} tick: {} reset, {} auto-approved, {} overdue, {} missed, {} due notices",
        report.trigger,
        report.reset_pairs,
        report.auto_approved,
        report.overdue,
        report.missed,
        report.due_notices
    )
}

pub fn event_line(event: &ChoreEvent) -> String {
    match event.assignee_id() {
        Some(assignee) => format!("event: {} {}/{}", event.name(), event.chore_id(), assignee),
        None => format!("event: {} {}", event.name(), event.chore_id()),
    }
}

/// Events in the order they were announced
pub fn event_lines(events: &[ChoreEvent]) -> Vec<String> {
    events.iter().map(event_line).collect()
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
