//! Scheduler tick specs
//!
//! `chores tick` runs the same pass the daemon runs on its interval, and
//! `--midnight` the one it runs at each local midnight.

use crate::prelude::*;

fn household_with(definition: serde_json::Value) -> Household {
    let household = Household::with_people();
    household.chore(definition);
    household
}

#[test]
fn past_due_chore_is_announced_overdue_once() {
    let household = household_with(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
        "due_date": "2026-03-02T18:00:00Z",
    }));

    household
        .chores()
        .at("2026-03-02T19:00:00Z")
        .args(&["tick"])
        .passes()
        .stdout_eq(
            "due_date tick: 0 reset, 0 auto-approved, 1 overdue, 0 missed, 0 due notices\n\
             event: chore:overdue dishes/ada\n",
        );

    household
        .chores()
        .at("2026-03-02T19:05:00Z")
        .args(&["tick"])
        .passes()
        .stdout_lacks("event:");
}

#[test]
fn missed_chore_is_locked() {
    let household = household_with(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
        "due_date": "2026-03-02T18:00:00Z",
        "overdue_handling": "mark_missed_and_lock",
    }));

    household
        .chores()
        .at("2026-03-02T19:00:00Z")
        .args(&["tick"])
        .passes()
        .stdout_has("event: chore:missed dishes/ada");

    household
        .chores()
        .at("2026-03-02T20:00:00Z")
        .args(&["claim", "dishes", "ada"])
        .fails()
        .stderr_has("chore was missed and is locked until the next reset");
}

#[test]
fn midnight_resets_an_approved_daily_chore() {
    let household = household_with(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
        "recurrence": {"frequency": "daily"},
        "due_date": "2026-03-02T18:00:00Z",
    }));
    household
        .chores()
        .at("2026-03-02T12:00:00Z")
        .args(&["approve", "dishes", "ada"])
        .passes();

    household
        .chores()
        .at("2026-03-03T00:00:01Z")
        .args(&["tick", "--midnight"])
        .passes()
        .stdout_has("midnight tick: 1 reset")
        .stdout_has("event: chore:status_reset dishes/ada");

    household
        .chores()
        .at("2026-03-03T08:00:00Z")
        .args(&["status"])
        .passes()
        .stdout_has("dishes           ada          pending")
        .stdout_has("2026-03-03T18:00:00Z");
}

#[test]
fn due_window_notice_is_sent_once() {
    let household = household_with(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
        "due_date": "2026-03-02T18:00:00Z",
        "due_window": "6h",
    }));

    household
        .chores()
        .at("2026-03-02T13:00:00Z")
        .args(&["tick"])
        .passes()
        .stdout_has("1 due notices")
        .stdout_has("event: chore:due_soon dishes/ada");

    household
        .chores()
        .at("2026-03-02T13:30:00Z")
        .args(&["tick"])
        .passes()
        .stdout_has("0 due notices");
}

#[test]
fn tick_on_an_empty_household_does_nothing() {
    let household = Household::empty();

    household.chores().args(&["tick", "--midnight"]).passes().stdout_eq(
        "midnight tick: 0 reset, 0 auto-approved, 0 overdue, 0 missed, 0 due notices\n",
    );
}
