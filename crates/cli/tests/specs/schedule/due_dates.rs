//! Due-date specs
//!
//! Setting, clearing and skipping due dates, and resetting overdue work.

use crate::prelude::*;

#[test]
fn independent_due_dates_are_per_assignee() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));

    household
        .chores()
        .args(&["set-due", "dishes", "2026-03-05T18:00:00Z", "--assignee", "ben"])
        .passes()
        .stdout_eq(
            "Updated due date for dishes\n  ada: -\n  ben: 2026-03-05T18:00:00Z\n",
        );
}

#[test]
fn clearing_removes_the_due_date() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "car",
        "criteria": "shared",
        "assigned": ["ada", "ben"],
        "due_date": "2026-03-02T18:00:00Z",
    }));

    household
        .chores()
        .args(&["set-due", "car", "--clear"])
        .passes()
        .stdout_eq("Updated due date for car\n  ada: -\n  ben: -\n");
}

#[test]
fn set_due_needs_a_date_or_clear() {
    let household = Household::with_people();

    household
        .chores()
        .args(&["set-due", "car"])
        .fails()
        .stderr_has("required");
}

#[test]
fn skip_moves_to_the_next_occurrence() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "car",
        "criteria": "shared",
        "assigned": ["ada", "ben"],
        "recurrence": {"frequency": "weekly"},
        "due_date": "2026-03-02T18:00:00Z",
    }));

    household.chores().args(&["skip-due", "car"]).passes().stdout_eq(
        "Skipped car to its next due date\n  ada: 2026-03-09T18:00:00Z\n  ben: 2026-03-09T18:00:00Z\n",
    );
}

#[test]
fn skip_needs_a_recurring_chore() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "car",
        "criteria": "shared",
        "assigned": ["ada", "ben"],
        "due_date": "2026-03-02T18:00:00Z",
    }));

    household
        .chores()
        .args(&["skip-due", "car"])
        .fails()
        .stderr_has("chore car does not recur");
}

#[test]
fn reset_overdue_reopens_and_reschedules() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
        "recurrence": {"frequency": "daily"},
        "due_date": "2026-03-02T18:00:00Z",
    }));
    household
        .chores()
        .at("2026-03-02T19:00:00Z")
        .args(&["tick"])
        .passes();

    household
        .chores()
        .at("2026-03-02T19:05:00Z")
        .args(&["reset-overdue"])
        .passes()
        .stdout_has("Reset 1 overdue pair(s)");

    household
        .chores()
        .at("2026-03-02T19:10:00Z")
        .args(&["status"])
        .passes()
        .stdout_has("dishes           ada          pending")
        .stdout_has("2026-03-03T18:00:00Z");
}

#[test]
fn manual_reset_returns_a_claim_to_pending() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));
    household.chores().args(&["claim", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["reset", "dishes", "--assignee", "ada"])
        .passes()
        .stdout_has("Reset dishes to pending for ada");

    household
        .chores()
        .args(&["pending"])
        .passes()
        .stdout_eq("No pending approvals\n");
}
