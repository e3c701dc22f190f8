// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule-aware completion streaks
//!
//! A completion continues the streak when it lands no later than one cadence
//! step after the previous completion, so weekly and monthly chores are not
//! penalized for their normal gaps.

use crate::chore::Recurrence;
use crate::schedule::Step;
use chrono::NaiveDate;

/// Streak after completing on `work_date`
pub fn calculate_streak(
    previous_streak: u32,
    previous_date: Option<NaiveDate>,
    work_date: NaiveDate,
    recurrence: &Recurrence,
) -> u32 {
    let Some(previous_date) = previous_date else {
        return 1;
    };
    if work_date <= previous_date {
        return previous_streak.max(1);
    }
    // Non-recurring chores are judged day to day
    let step = recurrence.step().unwrap_or(Step::Days(1));
    match step.advance_date(previous_date) {
        Some(deadline) if work_date <= deadline => previous_streak.saturating_add(1),
        _ => 1,
    }
}
