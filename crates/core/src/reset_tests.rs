// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone};
use yare::parameterized;

fn due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 3, 18, 0, 0).unwrap()
}

fn approval_ctx(reset_type: ApprovalReset) -> ResetContext {
    ResetContext {
        trigger: ResetTrigger::Approval,
        reset_type,
        overdue_handling: OverdueHandling::AtDueDate,
        criteria: CompletionCriteria::Independent,
        all_others_approved: true,
        is_late: false,
        has_pending_claim: false,
        disposition: PendingClaimDisposition::Hold,
    }
}

fn boundary_ctx(category: BoundaryCategory, disposition: PendingClaimDisposition) -> ResetContext {
    ResetContext {
        trigger: ResetTrigger::Boundary(category),
        has_pending_claim: true,
        disposition,
        ..approval_ctx(ApprovalReset::AtMidnightOnce)
    }
}

#[test]
fn upon_completion_resets_on_approval() {
    let ctx = approval_ctx(ApprovalReset::UponCompletion);
    assert_eq!(decide_reset(&ctx), ResetDecision::ResetAndReschedule);
}

#[test]
fn midnight_reset_holds_on_approval() {
    let ctx = approval_ctx(ApprovalReset::AtMidnightOnce);
    assert_eq!(decide_reset(&ctx), ResetDecision::Hold);
}

#[test]
fn late_approval_resets_immediately_under_clear_immediate() {
    let ctx = ResetContext {
        is_late: true,
        overdue_handling: OverdueHandling::ClearImmediateOnLate,
        ..approval_ctx(ApprovalReset::AtMidnightOnce)
    };
    assert_eq!(decide_reset(&ctx), ResetDecision::ResetAndReschedule);

    let on_time = ResetContext {
        is_late: false,
        ..ctx
    };
    assert_eq!(decide_reset(&on_time), ResetDecision::Hold);
}

#[test]
fn shared_waits_for_every_assignee() {
    let ctx = ResetContext {
        criteria: CompletionCriteria::Shared,
        all_others_approved: false,
        ..approval_ctx(ApprovalReset::UponCompletion)
    };
    assert_eq!(decide_reset(&ctx), ResetDecision::Hold);
}

#[test]
fn remaining_pending_claim_holds_approval_reset() {
    let ctx = ResetContext {
        has_pending_claim: true,
        ..approval_ctx(ApprovalReset::UponCompletion)
    };
    assert_eq!(decide_reset(&ctx), ResetDecision::Hold);
}

#[parameterized(
    hold = { PendingClaimDisposition::Hold, ResetDecision::Hold },
    clear = { PendingClaimDisposition::Clear, ResetDecision::ResetAndReschedule },
    auto_approve = { PendingClaimDisposition::AutoApprove, ResetDecision::AutoApprovePending },
)]
fn boundary_with_pending_claim_follows_disposition(
    disposition: PendingClaimDisposition,
    expected: ResetDecision,
) {
    let ctx = boundary_ctx(BoundaryCategory::ClearAndReschedule, disposition);
    assert_eq!(decide_reset(&ctx), expected);
}

#[test]
fn boundary_without_claim_uses_category() {
    let mut ctx = boundary_ctx(BoundaryCategory::ClearOnly, PendingClaimDisposition::Hold);
    ctx.has_pending_claim = false;
    assert_eq!(decide_reset(&ctx), ResetDecision::ResetOnly);

    ctx.trigger = ResetTrigger::Boundary(BoundaryCategory::Hold);
    assert_eq!(decide_reset(&ctx), ResetDecision::Hold);
}

#[parameterized(
    midnight_type_at_midnight = { ApprovalReset::AtMidnightOnce, OverdueHandling::AtDueDate, ScanTrigger::Midnight, false, true },
    midnight_type_at_due = { ApprovalReset::AtMidnightMulti, OverdueHandling::AtDueDate, ScanTrigger::DueDate, true, false },
    due_type_past_due = { ApprovalReset::AtDueDateOnce, OverdueHandling::AtDueDate, ScanTrigger::DueDate, true, true },
    due_type_before_due = { ApprovalReset::AtDueDateMulti, OverdueHandling::AtDueDate, ScanTrigger::DueDate, false, false },
    due_type_at_midnight = { ApprovalReset::AtDueDateOnce, OverdueHandling::AtDueDate, ScanTrigger::Midnight, true, false },
    missed_lock_released_at_midnight = { ApprovalReset::AtDueDateOnce, OverdueHandling::MarkMissedAndLock, ScanTrigger::Midnight, true, true },
    upon_completion_clear_missed = { ApprovalReset::UponCompletion, OverdueHandling::ClearAndMarkMissed, ScanTrigger::DueDate, true, true },
    upon_completion_clear_late = { ApprovalReset::UponCompletion, OverdueHandling::ClearImmediateOnLate, ScanTrigger::DueDate, true, true },
    upon_completion_at_due = { ApprovalReset::UponCompletion, OverdueHandling::AtDueDate, ScanTrigger::DueDate, true, false },
)]
fn reset_eligibility(
    reset_type: ApprovalReset,
    handling: OverdueHandling,
    trigger: ScanTrigger,
    past_due: bool,
    expected: bool,
) {
    let now = if past_due {
        due() + Duration::hours(1)
    } else {
        due() - Duration::hours(1)
    };
    assert_eq!(
        is_reset_eligible(reset_type, handling, trigger, Some(due()), now),
        expected
    );
}

#[test]
fn approved_unit_clears_and_reschedules() {
    let now = due() - Duration::hours(2);
    assert_eq!(
        boundary_category(OverdueHandling::AtDueDate, ScanTrigger::Midnight, true, Some(due()), now),
        BoundaryCategory::ClearAndReschedule
    );
    assert_eq!(
        boundary_category(OverdueHandling::AtDueDate, ScanTrigger::Midnight, true, None, now),
        BoundaryCategory::ClearOnly
    );
}

#[parameterized(
    before_due = { OverdueHandling::AtDueDate, ScanTrigger::Midnight, -1, BoundaryCategory::Hold },
    at_due_date_stays_overdue = { OverdueHandling::AtDueDate, ScanTrigger::Midnight, 1, BoundaryCategory::Hold },
    allow_steal_stays_open = { OverdueHandling::AllowSteal, ScanTrigger::DueDate, 1, BoundaryCategory::Hold },
    never_overdue = { OverdueHandling::NeverOverdue, ScanTrigger::Midnight, 1, BoundaryCategory::ClearAndReschedule },
    clear_and_mark = { OverdueHandling::ClearAndMarkMissed, ScanTrigger::DueDate, 1, BoundaryCategory::ClearAndReschedule },
    missed_lock_holds_until_midnight = { OverdueHandling::MarkMissedAndLock, ScanTrigger::DueDate, 1, BoundaryCategory::Hold },
    missed_lock_released = { OverdueHandling::MarkMissedAndLock, ScanTrigger::Midnight, 1, BoundaryCategory::ClearAndReschedule },
)]
fn unapproved_boundary_category(
    handling: OverdueHandling,
    trigger: ScanTrigger,
    hours_after_due: i64,
    expected: BoundaryCategory,
) {
    let now = due() + Duration::hours(hours_after_due);
    assert_eq!(boundary_category(handling, trigger, false, Some(due()), now), expected);
}

#[test]
fn unapproved_without_due_date_just_clears() {
    assert_eq!(
        boundary_category(OverdueHandling::AtDueDate, ScanTrigger::Midnight, false, None, due()),
        BoundaryCategory::ClearOnly
    );
}
