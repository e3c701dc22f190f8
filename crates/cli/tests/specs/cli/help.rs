//! CLI help specs

use crate::prelude::*;

#[test]
fn help_lists_workflow_commands() {
    let household = Household::empty();

    let run = household.chores().args(&["--help"]).passes();

    for command in ["claim", "approve", "disapprove", "undo-claim", "skip-due", "tick"] {
        assert!(run.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn rotation_help_lists_subcommands() {
    let household = Household::empty();

    household
        .chores()
        .args(&["rotation", "--help"])
        .passes()
        .stdout_has("set")
        .stdout_has("reset")
        .stdout_has("open");
}
