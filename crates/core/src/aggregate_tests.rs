// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::chore::{ChoreDefinition, OverdueHandling};
use crate::id::AssigneeId;
use chrono::{Duration, TimeZone};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap()
}

fn entry(criteria: CompletionCriteria, names: &[&str]) -> ChoreEntry {
    let assigned = names.iter().map(|n| AssigneeId::from(*n)).collect();
    ChoreEntry::new(ChoreDefinition::new("dishes", criteria, assigned))
}

fn set_state(entry: &mut ChoreEntry, who: &str, state: ChoreState) {
    let record = entry.record_mut(&who.into());
    record.state = state;
    if state == ChoreState::Claimed {
        record.pending_claim_count = 1;
    }
}

#[test]
fn uniform_states_pass_through() {
    let mut e = entry(CompletionCriteria::Shared, &["a", "b"]);
    assert_eq!(global_state(&e, now()), GlobalState::Pending);
    set_state(&mut e, "a", ChoreState::Approved);
    set_state(&mut e, "b", ChoreState::Approved);
    assert_eq!(global_state(&e, now()), GlobalState::Approved);
}

#[test]
fn shared_reports_partial_progress() {
    let mut e = entry(CompletionCriteria::Shared, &["a", "b", "c"]);
    set_state(&mut e, "a", ChoreState::Claimed);
    assert_eq!(global_state(&e, now()), GlobalState::ClaimedInPart);
    set_state(&mut e, "b", ChoreState::Approved);
    assert_eq!(global_state(&e, now()), GlobalState::ApprovedInPart);
}

#[test]
fn independent_mixed_states() {
    let mut e = entry(CompletionCriteria::Independent, &["a", "b"]);
    set_state(&mut e, "a", ChoreState::Approved);
    assert_eq!(global_state(&e, now()), GlobalState::Independent);
}

#[test]
fn shared_first_takes_the_claimer_state() {
    let mut e = entry(CompletionCriteria::SharedFirst, &["a", "b"]);
    set_state(&mut e, "b", ChoreState::Claimed);
    assert_eq!(global_state(&e, now()), GlobalState::Claimed);
}

#[test]
fn rotation_follows_the_turn_holder() {
    let mut e = entry(CompletionCriteria::RotationSimple, &["a", "b"]);
    // b is locked out; a holds the turn and is still pending
    assert_eq!(global_state(&e, now()), GlobalState::Pending);
    set_state(&mut e, "a", ChoreState::Claimed);
    assert_eq!(global_state(&e, now()), GlobalState::Claimed);
}

#[test]
fn rotation_with_open_cycle_uses_first_wins() {
    let mut e = entry(CompletionCriteria::RotationSmart, &["a", "b"]);
    e.definition.overdue_handling = OverdueHandling::AllowSteal;
    e.definition.due_date = Some(now() - Duration::hours(1));
    set_state(&mut e, "b", ChoreState::Approved);
    assert_eq!(global_state(&e, now()), GlobalState::Approved);
}

#[test]
fn overdue_shared_chore() {
    let mut e = entry(CompletionCriteria::Shared, &["a", "b"]);
    e.definition.due_date = Some(now() - Duration::minutes(5));
    assert_eq!(global_state(&e, now()), GlobalState::Overdue);
}

#[test]
fn empty_assignment_is_pending() {
    let e = entry(CompletionCriteria::Shared, &[]);
    assert_eq!(global_state(&e, now()), GlobalState::Pending);
}
