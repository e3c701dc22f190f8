//! CLI error specs
//!
//! Refusals exit non-zero with the reason on stderr and leave the
//! snapshot untouched.

use crate::prelude::*;

fn dishes(household: &Household) {
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
    }));
}

#[test]
fn unknown_chore_is_reported() {
    let household = Household::with_people();

    household
        .chores()
        .args(&["claim", "laundry", "ada"])
        .fails()
        .stderr_has("chore not found: laundry");
}

#[test]
fn claiming_twice_is_refused() {
    let household = Household::with_people();
    dishes(&household);
    household.chores().args(&["claim", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["claim", "dishes", "ada"])
        .fails()
        .stderr_has("chore is already claimed");
}

#[test]
fn unassigned_claim_is_refused() {
    let household = Household::with_people();
    dishes(&household);

    household
        .chores()
        .args(&["claim", "dishes", "cy"])
        .fails()
        .stderr_has("assignee is not assigned to this chore");
}

#[test]
fn disapprove_without_a_claim_is_an_error() {
    let household = Household::with_people();
    dishes(&household);

    household
        .chores()
        .args(&["disapprove", "dishes", "ada"])
        .fails()
        .stderr_has("no claim is waiting for approval for ada on dishes");
}

#[test]
fn undo_without_an_approval_is_an_error() {
    let household = Household::with_people();
    dishes(&household);

    household
        .chores()
        .args(&["undo", "dishes", "ada"])
        .fails()
        .stderr_has("ada has no approval to undo on dishes");
}

#[test]
fn bad_timestamp_is_rejected_by_the_parser() {
    let household = Household::empty();

    household
        .chores()
        .at("tuesday")
        .args(&["status"])
        .fails()
        .stderr_has("invalid value");
}

#[test]
fn corrupt_snapshot_fails_to_load() {
    let household = Household::empty();
    household.file("chores.json", "{ not json");

    household
        .chores()
        .args(&["status"])
        .fails()
        .stderr_has("failed to load");
}

#[test]
fn refused_claim_leaves_the_snapshot_alone() {
    let household = Household::with_people();
    dishes(&household);
    let before = household.snapshot();

    household.chores().args(&["claim", "dishes", "cy"]).fails();

    similar_asserts::assert_eq!(household.snapshot(), before);
}
