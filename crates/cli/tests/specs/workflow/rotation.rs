//! Rotation specs
//!
//! Only the turn holder may claim; the turn passes on completion and can be
//! moved by hand.

use crate::prelude::*;

fn household_with_trash() -> Household {
    let household = Household::with_people();
    household.chore(json!({
        "id": "trash",
        "criteria": "rotation_simple",
        "assigned": ["ada", "ben"],
        "approval_reset": "upon_completion",
    }));
    household
}

#[test]
fn only_the_turn_holder_may_claim() {
    let household = household_with_trash();

    household
        .chores()
        .args(&["claim", "trash", "ben"])
        .fails()
        .stderr_has("it is another assignee's turn");
    household
        .chores()
        .args(&["status", "--assignee", "ben"])
        .passes()
        .stdout_has("trash            ben          not_my_turn");
}

#[test]
fn completion_passes_the_turn() {
    let household = household_with_trash();
    household.chores().args(&["claim", "trash", "ada"]).passes();

    household
        .chores()
        .args(&["approve", "trash", "ada"])
        .passes()
        .stdout_has("event: chore:rotation_advanced trash");

    household
        .chores()
        .args(&["claim", "trash", "ada"])
        .fails()
        .stderr_has("it is another assignee's turn");
    household.chores().args(&["claim", "trash", "ben"]).passes();
}

#[test]
fn turn_can_be_set_and_reset() {
    let household = household_with_trash();

    household
        .chores()
        .args(&["rotation", "set", "trash", "ben"])
        .passes()
        .stdout_has("Turn for trash is now ben")
        .stdout_has("event: chore:rotation_advanced trash");
    household.chores().args(&["claim", "trash", "ben"]).passes();

    household
        .chores()
        .args(&["rotation", "reset", "trash"])
        .passes()
        .stdout_has("Rotation for trash reset; turn is ada");
}

#[test]
fn open_cycle_lets_anyone_claim() {
    let household = household_with_trash();

    household
        .chores()
        .args(&["rotation", "open", "trash"])
        .passes()
        .stdout_has("Rotation for trash open to everyone");

    household.chores().args(&["claim", "trash", "ben"]).passes();
}

#[test]
fn rotation_commands_need_a_rotation_chore() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada"],
    }));

    household
        .chores()
        .args(&["rotation", "open", "dishes"])
        .fails()
        .stderr_has("chore dishes does not rotate");
}
