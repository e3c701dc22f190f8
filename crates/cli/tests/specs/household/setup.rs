//! Household setup specs
//!
//! People and chore definitions are managed through the CLI and land in
//! the snapshot file.

use crate::prelude::*;

#[test]
fn empty_household_has_no_chores() {
    let household = Household::empty();

    household.chores().args(&["status"]).passes().stdout_eq("No chores\n");
}

#[test]
fn adding_an_assignee_writes_the_snapshot() {
    let household = Household::empty();

    household
        .chores()
        .args(&["assignee", "add", "ada", "Ada"])
        .passes()
        .stdout_eq("Saved assignee ada (Ada)\n");

    assert_eq!(household.snapshot()["assignees"]["ada"]["name"], "Ada");
}

#[test]
fn new_chore_starts_pending_for_everyone() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));

    household.chores().args(&["status"]).passes().stdout_eq(
        "CHORE            ASSIGNEE     STATE        GLOBAL            STREAK  DUE\n\
         dishes           ada          pending      pending           0       -\n\
         dishes           ben          pending      pending           0       -\n",
    );
}

#[test]
fn rotation_needs_two_assignees() {
    let household = Household::with_people();
    let path = household.file(
        "trash.json",
        &json!({"id": "trash", "criteria": "rotation_simple", "assigned": ["ada"]}).to_string(),
    );

    household
        .chores()
        .args(&["chore", "add", path.to_str().unwrap()])
        .fails()
        .stderr_has("invalid chore definition");
}

#[test]
fn reassigning_drops_the_old_records() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));
    household.chores().args(&["claim", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["chore", "assign", "dishes", "ben", "cy"])
        .passes()
        .stdout_has("Assigned dishes to ben, cy");

    household
        .chores()
        .args(&["pending"])
        .passes()
        .stdout_eq("No pending approvals\n");
}

#[test]
fn removing_an_assignee_unassigns_them_everywhere() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));

    household
        .chores()
        .args(&["assignee", "remove", "ada"])
        .passes();

    household
        .chores()
        .args(&["status"])
        .passes()
        .stdout_lacks(" ada ")
        .stdout_has("dishes           ben");
}

#[test]
fn removed_chore_is_gone() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
    }));

    household.chores().args(&["chore", "remove", "dishes"]).passes();

    household
        .chores()
        .args(&["chore", "remove", "dishes"])
        .fails()
        .stderr_has("chore not found: dishes");
}
