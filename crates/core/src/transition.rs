// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure transition table for chore actions
//!
//! `calculate_transition` never reads or writes the record set. It maps
//! (current state, action, completion criteria) to the effects the caller
//! should apply to each affected assignee's record.

use crate::chore::ChoreDefinition;
use crate::id::AssigneeId;
use crate::record::ChoreState;

/// Actions that drive the per-assignee state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Claim,
    Approve,
    Disapprove,
    Undo,
    Overdue,
}

/// A requested change to one assignee's record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEffect {
    pub assignee: AssigneeId,
    pub new_state: Option<ChoreState>,
    pub set_claimed_by: Option<String>,
    pub set_completed_by: Option<String>,
    pub clear_claimed_by: bool,
    pub clear_completed_by: bool,
}

impl TransitionEffect {
    fn for_assignee(assignee: &AssigneeId) -> Self {
        Self {
            assignee: assignee.clone(),
            new_state: None,
            set_claimed_by: None,
            set_completed_by: None,
            clear_claimed_by: false,
            clear_completed_by: false,
        }
    }

    fn state(mut self, state: ChoreState) -> Self {
        self.new_state = Some(state);
        self
    }

    fn claimed_by(mut self, name: &str) -> Self {
        self.set_claimed_by = Some(name.to_string());
        self
    }

    fn completed_by(mut self, name: &str) -> Self {
        self.set_completed_by = Some(name.to_string());
        self
    }

    fn clear_claim(mut self) -> Self {
        self.clear_claimed_by = true;
        self
    }

    fn clear_completion(mut self) -> Self {
        self.clear_completed_by = true;
        self
    }
}

/// Inputs the table needs besides the definition
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// The acting assignee's current state
    pub current: ChoreState,
    /// Display name recorded in ownership fields
    pub actor_name: &'a str,
    pub is_past_due: bool,
}

/// Compute the effects of `action` by `actor`
///
/// Returns no effects when the action is not legal from the current state.
pub fn calculate_transition(
    definition: &ChoreDefinition,
    actor: &AssigneeId,
    action: Action,
    ctx: TransitionContext<'_>,
) -> Vec<TransitionEffect> {
    use ChoreState::*;

    let single = definition.criteria.is_single_claimer();
    let others = definition.assigned.iter().filter(|a| *a != actor);
    let name = ctx.actor_name;

    // State a reversed claim falls back to
    let fallback = if ctx.is_past_due && definition.overdue_handling.marks_overdue() {
        Overdue
    } else {
        Pending
    };

    match (ctx.current, action) {
        // Missed-and-locked pairs are refused upstream by the claim check
        (Pending | Overdue | Missed | Claimed | Approved, Action::Claim) => {
            let mut effects = vec![TransitionEffect::for_assignee(actor)
                .state(Claimed)
                .claimed_by(name)];
            if single {
                effects.extend(others.map(|a| TransitionEffect::for_assignee(a).claimed_by(name)));
            }
            effects
        }

        (Pending | Overdue | Claimed | Approved | Waiting, Action::Approve) => {
            let mut effects = vec![TransitionEffect::for_assignee(actor)
                .state(Approved)
                .completed_by(name)];
            if single {
                effects
                    .extend(others.map(|a| TransitionEffect::for_assignee(a).completed_by(name)));
            }
            effects
        }

        (Claimed, Action::Disapprove) => {
            let mut effects = vec![TransitionEffect::for_assignee(actor)
                .state(fallback)
                .clear_claim()];
            if single {
                effects.extend(others.map(|a| TransitionEffect::for_assignee(a).clear_claim()));
            }
            effects
        }

        (Claimed | Approved, Action::Undo) => {
            let mut effects = vec![TransitionEffect::for_assignee(actor)
                .state(fallback)
                .clear_claim()
                .clear_completion()];
            if single {
                effects.extend(others.map(|a| {
                    TransitionEffect::for_assignee(a)
                        .clear_claim()
                        .clear_completion()
                }));
            }
            effects
        }

        (Pending, Action::Overdue) => {
            let target = if definition.overdue_handling
                == crate::chore::OverdueHandling::MarkMissedAndLock
            {
                Missed
            } else {
                Overdue
            };
            vec![TransitionEffect::for_assignee(actor).state(target)]
        }

        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
