//! Claim and approval specs
//!
//! Claim, approve, disapprove and undo, each announcing its events after
//! the snapshot is written.

use crate::prelude::*;

fn household_with_dishes() -> Household {
    let household = Household::with_people();
    household.chore(json!({
        "id": "dishes",
        "criteria": "independent",
        "assigned": ["ada", "ben"],
        "points": 5.0,
    }));
    household
}

#[test]
fn claim_announces_and_waits_for_approval() {
    let household = household_with_dishes();

    household
        .chores()
        .args(&["--as", "Ada", "claim", "dishes", "ada"])
        .passes()
        .stdout_eq("Claimed dishes for ada\nevent: chore:claimed dishes/ada\n");

    household
        .chores()
        .args(&["status", "--assignee", "ada"])
        .passes()
        .stdout_has("dishes           ada          claimed");
    household
        .chores()
        .args(&["pending"])
        .passes()
        .stdout_has("dishes           ada          1       2026-03-02T09:00:00Z");
}

#[test]
fn approval_completes_and_starts_a_streak() {
    let household = household_with_dishes();
    household.chores().args(&["claim", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["--as", "Parent", "approve", "dishes", "ada"])
        .passes()
        .stdout_has("Approved dishes for ada")
        .stdout_has("event: chore:approved dishes/ada")
        .stdout_has("event: chore:completed dishes");

    household
        .chores()
        .args(&["status", "--assignee", "ada"])
        .passes()
        .stdout_has("dishes           ada          approved     independent       1");
}

#[test]
fn second_approval_is_a_no_op() {
    let household = household_with_dishes();
    household.chores().args(&["approve", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["approve", "dishes", "ada"])
        .passes()
        .stdout_eq("dishes was already approved for ada\n");
}

#[test]
fn disapproval_returns_the_chore_to_pending() {
    let household = household_with_dishes();
    household.chores().args(&["claim", "dishes", "ben"]).passes();

    household
        .chores()
        .args(&["disapprove", "dishes", "ben", "--reason", "still greasy"])
        .passes()
        .stdout_eq("Disapproved dishes for ben\nevent: chore:disapproved dishes/ben\n");

    household
        .chores()
        .args(&["status", "--assignee", "ben"])
        .passes()
        .stdout_has("dishes           ben          pending");
}

#[test]
fn undo_reports_points_to_reclaim() {
    let household = household_with_dishes();
    household.chores().args(&["approve", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["undo", "dishes", "ada"])
        .passes()
        .stdout_has("Undid dishes for ada (reclaim 5 points)")
        .stdout_has("event: chore:undone dishes/ada");

    household
        .chores()
        .args(&["status", "--assignee", "ada"])
        .passes()
        .stdout_has("dishes           ada          pending      pending           0");
}

#[test]
fn approve_points_override() {
    let household = household_with_dishes();
    household
        .chores()
        .args(&["approve", "dishes", "ada", "--points", "8"])
        .passes();

    household
        .chores()
        .args(&["undo", "dishes", "ada"])
        .passes()
        .stdout_has("(reclaim 8 points)");
}

#[test]
fn withdrawn_claim_leaves_nothing_pending() {
    let household = household_with_dishes();
    household.chores().args(&["claim", "dishes", "ada"]).passes();

    household
        .chores()
        .args(&["undo-claim", "dishes", "ada"])
        .passes()
        .stdout_has("Withdrew claim on dishes for ada");

    household
        .chores()
        .args(&["pending"])
        .passes()
        .stdout_eq("No pending approvals\n");
}

#[test]
fn shared_first_claim_blocks_the_others() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "car",
        "criteria": "shared_first",
        "assigned": ["ada", "ben"],
    }));
    household.chores().args(&["claim", "car", "ada"]).passes();

    household
        .chores()
        .args(&["claim", "car", "ben"])
        .fails()
        .stderr_has("chore was claimed or completed by another assignee");
}

#[test]
fn auto_approve_chores_approve_on_claim() {
    let household = Household::with_people();
    household.chore(json!({
        "id": "bed",
        "criteria": "independent",
        "assigned": ["cy"],
        "auto_approve": true,
    }));

    household
        .chores()
        .args(&["claim", "bed", "cy"])
        .passes()
        .stdout_has("event: chore:claimed bed/cy")
        .stdout_has("event: chore:approved bed/cy");
}
