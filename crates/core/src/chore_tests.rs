// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn ids(names: &[&str]) -> Vec<AssigneeId> {
    names.iter().map(|n| AssigneeId::from(*n)).collect()
}

fn due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap()
}

#[test]
fn rotation_starts_with_first_assignee() {
    let def = ChoreDefinition::new("trash", CompletionCriteria::RotationSimple, ids(&["a", "b"]));
    assert_eq!(def.turn_holder(), Some(&"a".into()));

    let shared = ChoreDefinition::new("trash", CompletionCriteria::Shared, ids(&["a", "b"]));
    assert!(shared.turn_holder().is_none());
}

#[test]
fn independent_due_dates_are_per_assignee() {
    let mut def = ChoreDefinition::new("beds", CompletionCriteria::Independent, ids(&["a", "b"]))
        .with_due_date(due());
    assert!(def.due_date.is_none());
    assert_eq!(def.due_date_for(&"b".into()), Some(due()));

    def.set_due_date_for(&"a".into(), None);
    assert_eq!(def.due_date_for(&"a".into()), None);
    assert_eq!(def.due_date_for(&"b".into()), Some(due()));
}

#[test]
fn chore_level_due_date_spreads_to_independent_assignees() {
    let early = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let mut def = ChoreDefinition::new("beds", CompletionCriteria::Independent, ids(&["a", "b"]));
    def.due_date = Some(due());
    def.assignee_due_dates.insert("b".into(), early);

    def.normalize_due_dates();

    assert!(def.due_date.is_none());
    assert_eq!(def.due_date_for(&"a".into()), Some(due()));
    assert_eq!(def.due_date_for(&"b".into()), Some(early));
}

#[test]
fn chore_level_due_date_stays_on_shared_chores() {
    let mut def = ChoreDefinition::new("dishes", CompletionCriteria::Shared, ids(&["a", "b"]));
    def.due_date = Some(due());

    def.normalize_due_dates();

    assert_eq!(def.due_date, Some(due()));
    assert!(def.assignee_due_dates.is_empty());
}

#[test]
fn shared_due_date_is_chore_level() {
    let mut def =
        ChoreDefinition::new("dishes", CompletionCriteria::Shared, ids(&["a", "b"])).with_due_date(due());
    assert_eq!(def.due_date_for(&"a".into()), Some(due()));
    assert!(def.assignee_due_dates.is_empty());

    def.set_due_date_for(&"b".into(), None);
    assert_eq!(def.due_date_for(&"a".into()), None);
}

#[test]
fn window_and_reminder_are_offsets_from_due() {
    let def = ChoreDefinition::new("dishes", CompletionCriteria::Shared, ids(&["a"]))
        .with_due_date(due())
        .with_due_window(std::time::Duration::from_secs(2 * 3600))
        .with_reminder_offset(std::time::Duration::from_secs(30 * 60));
    assert_eq!(
        def.due_window_start_for(&"a".into()),
        Some(Utc.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap())
    );
    assert_eq!(
        def.reminder_at_for(&"a".into()),
        Some(Utc.with_ymd_and_hms(2026, 3, 10, 17, 30, 0).unwrap())
    );
}

#[test]
fn allow_steal_opens_cycle_after_due() {
    let def = ChoreDefinition::new("trash", CompletionCriteria::RotationSimple, ids(&["a", "b"]))
        .with_due_date(due())
        .with_overdue_handling(OverdueHandling::AllowSteal);
    assert!(!def.is_cycle_open(due() - chrono::Duration::minutes(1)));
    assert!(def.is_cycle_open(due()));
}

#[test]
fn cycle_override_opens_rotation() {
    let mut def = ChoreDefinition::new("trash", CompletionCriteria::RotationSmart, ids(&["a", "b"]));
    assert!(!def.is_cycle_open(due()));
    def.rotation.cycle_override = true;
    assert!(def.is_cycle_open(due()));
}

#[parameterized(
    daily = { Recurrence::new(Frequency::Daily), Some(schedule::Step::Days(1)) },
    weekly = { Recurrence::new(Frequency::Weekly), Some(schedule::Step::Days(7)) },
    biweekly = { Recurrence::new(Frequency::Biweekly), Some(schedule::Step::Days(14)) },
    monthly = { Recurrence::new(Frequency::Monthly), Some(schedule::Step::Months(1)) },
    custom_weeks = { Recurrence::custom(3, IntervalUnit::Weeks), Some(schedule::Step::Days(21)) },
    custom_months = { Recurrence::custom(2, IntervalUnit::Months), Some(schedule::Step::Months(2)) },
    custom_zero = { Recurrence::custom(0, IntervalUnit::Days), None },
    none = { Recurrence::default(), None },
)]
fn recurrence_step(recurrence: Recurrence, expected: Option<schedule::Step>) {
    assert_eq!(recurrence.step(), expected);
    assert_eq!(recurrence.is_recurring(), expected.is_some());
}

#[parameterized(
    midnight_once = { ApprovalReset::AtMidnightOnce, false, true, false },
    midnight_multi = { ApprovalReset::AtMidnightMulti, true, true, false },
    due_once = { ApprovalReset::AtDueDateOnce, false, false, true },
    due_multi = { ApprovalReset::AtDueDateMulti, true, false, true },
    upon_completion = { ApprovalReset::UponCompletion, true, false, false },
)]
fn approval_reset_flags(reset: ApprovalReset, multi: bool, midnight: bool, due_date: bool) {
    assert_eq!(reset.allows_multiple_claims(), multi);
    assert_eq!(reset.resets_at_midnight(), midnight);
    assert_eq!(reset.resets_at_due_date(), due_date);
}

#[test]
fn rotation_needs_two_assignees() {
    let def = ChoreDefinition::new("trash", CompletionCriteria::RotationSimple, ids(&["a"]));
    assert_eq!(
        def.validate(),
        Err(DefinitionError::RotationNeedsTwoAssignees {
            chore: "trash".into(),
            count: 1
        })
    );
}

#[test]
fn turn_holder_must_be_assigned() {
    let mut def = ChoreDefinition::new("trash", CompletionCriteria::RotationSimple, ids(&["a", "b"]));
    def.rotation.turn = Some("z".into());
    assert!(matches!(
        def.validate(),
        Err(DefinitionError::TurnHolderNotAssigned { .. })
    ));
}

#[test]
fn duplicate_and_empty_ids_are_rejected() {
    let def = ChoreDefinition::new("dishes", CompletionCriteria::Shared, ids(&["a", "a"]));
    assert!(matches!(
        def.validate(),
        Err(DefinitionError::DuplicateAssignee { .. })
    ));

    let def = ChoreDefinition::new("", CompletionCriteria::Shared, ids(&["a"]));
    assert_eq!(def.validate(), Err(DefinitionError::EmptyId));
}

#[test]
fn definition_loads_with_defaults_and_humantime_offsets() {
    let json = r#"{
        "id": "dishes",
        "criteria": "shared_first",
        "assigned": ["a", "b"],
        "due_window": "2h",
        "recurrence": { "frequency": "weekly" }
    }"#;
    let def: ChoreDefinition = serde_json::from_str(json).unwrap();
    assert_eq!(def.criteria, CompletionCriteria::SharedFirst);
    assert_eq!(def.due_window, Some(std::time::Duration::from_secs(7200)));
    assert_eq!(def.approval_reset, ApprovalReset::AtMidnightOnce);
    assert_eq!(def.overdue_handling, OverdueHandling::AtDueDate);
    assert_eq!(def.recurrence.frequency, Frequency::Weekly);
    assert!(def.validate().is_ok());
}
