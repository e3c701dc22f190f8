// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval reset policy
//!
//! Stateless functions deciding whether a completed or scheduled boundary
//! clears a pair back to pending, reschedules its due date, or holds.

use crate::chore::{ApprovalReset, CompletionCriteria, OverdueHandling, PendingClaimDisposition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What woke the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTrigger {
    /// Short periodic tick: due windows, reminders, overdue, due-date resets
    DueDate,
    /// Daily rollover: once-per-day reset types and missed-lock release
    Midnight,
}

impl fmt::Display for ScanTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanTrigger::DueDate => f.write_str("due_date"),
            ScanTrigger::Midnight => f.write_str("midnight"),
        }
    }
}

/// How a scheduled boundary treats one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCategory {
    Hold,
    ClearOnly,
    ClearAndReschedule,
}

/// Why a reset is being considered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTrigger {
    /// An approval just landed
    Approval,
    /// A scheduled boundary with its precomputed category
    Boundary(BoundaryCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    Hold,
    ResetOnly,
    ResetAndReschedule,
    /// Approve the waiting claim, then reset per the boundary category
    AutoApprovePending,
}

/// Everything the decision depends on
#[derive(Debug, Clone, Copy)]
pub struct ResetContext {
    pub trigger: ResetTrigger,
    pub reset_type: ApprovalReset,
    pub overdue_handling: OverdueHandling,
    pub criteria: CompletionCriteria,
    /// Shared chores: every assignee has reached approved
    pub all_others_approved: bool,
    /// The work happened after the due date
    pub is_late: bool,
    pub has_pending_claim: bool,
    pub disposition: PendingClaimDisposition,
}

pub fn decide_reset(ctx: &ResetContext) -> ResetDecision {
    match ctx.trigger {
        ResetTrigger::Approval => {
            let immediate = ctx.reset_type == ApprovalReset::UponCompletion
                || (ctx.is_late && ctx.overdue_handling == OverdueHandling::ClearImmediateOnLate);
            if !immediate || ctx.has_pending_claim {
                return ResetDecision::Hold;
            }
            if ctx.criteria == CompletionCriteria::Shared && !ctx.all_others_approved {
                return ResetDecision::Hold;
            }
            ResetDecision::ResetAndReschedule
        }
        ResetTrigger::Boundary(category) => {
            let reset = match category {
                BoundaryCategory::Hold => return ResetDecision::Hold,
                BoundaryCategory::ClearOnly => ResetDecision::ResetOnly,
                BoundaryCategory::ClearAndReschedule => ResetDecision::ResetAndReschedule,
            };
            if !ctx.has_pending_claim {
                return reset;
            }
            match ctx.disposition {
                PendingClaimDisposition::Hold => ResetDecision::Hold,
                PendingClaimDisposition::Clear => reset,
                PendingClaimDisposition::AutoApprove => ResetDecision::AutoApprovePending,
            }
        }
    }
}

/// Whether a scan with `trigger` should consider resetting a pair at all
pub fn is_reset_eligible(
    reset_type: ApprovalReset,
    overdue_handling: OverdueHandling,
    trigger: ScanTrigger,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let past_due = due_date.is_some_and(|due| due <= now);
    match trigger {
        ScanTrigger::Midnight => {
            reset_type.resets_at_midnight()
                || (past_due && overdue_handling == OverdueHandling::MarkMissedAndLock)
        }
        ScanTrigger::DueDate => {
            past_due
                && (reset_type.resets_at_due_date()
                    || (reset_type == ApprovalReset::UponCompletion
                        && matches!(
                            overdue_handling,
                            OverdueHandling::ClearAndMarkMissed
                                | OverdueHandling::ClearImmediateOnLate
                        )))
        }
    }
}

/// Classify how a reset-eligible pair crosses the boundary
///
/// `approved` is the completion condition for the unit being reset: the pair
/// itself for independent chores, the chore's criteria otherwise.
pub fn boundary_category(
    overdue_handling: OverdueHandling,
    trigger: ScanTrigger,
    approved: bool,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> BoundaryCategory {
    if approved {
        return match due_date {
            Some(_) => BoundaryCategory::ClearAndReschedule,
            None => BoundaryCategory::ClearOnly,
        };
    }
    let Some(due) = due_date else {
        return BoundaryCategory::ClearOnly;
    };
    if now < due {
        return BoundaryCategory::Hold;
    }
    match overdue_handling {
        OverdueHandling::AtDueDate | OverdueHandling::AllowSteal => BoundaryCategory::Hold,
        OverdueHandling::NeverOverdue
        | OverdueHandling::ClearAndMarkMissed
        | OverdueHandling::ClearImmediateOnLate => BoundaryCategory::ClearAndReschedule,
        OverdueHandling::MarkMissedAndLock => match trigger {
            ScanTrigger::Midnight => BoundaryCategory::ClearAndReschedule,
            ScanTrigger::DueDate => BoundaryCategory::Hold,
        },
    }
}

#[cfg(test)]
#[path = "reset_tests.rs"]
mod tests;
