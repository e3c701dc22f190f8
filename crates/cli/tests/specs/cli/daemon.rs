//! Daemon control specs

use crate::prelude::*;

#[test]
fn daemon_status_without_a_daemon() {
    let household = Household::empty();

    household
        .chores()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("chored is not running");
}

#[test]
fn stale_socket_falls_back_to_the_snapshot() {
    let household = Household::with_people();
    household.file("chores.sock", "");

    household
        .chores()
        .args(&["assignee", "add", "dee", "Dee"])
        .passes()
        .stdout_has("Saved assignee dee (Dee)");

    assert_eq!(household.snapshot()["assignees"]["dee"]["name"], "Dee");
}
