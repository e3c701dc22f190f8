// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar arithmetic for due dates, windows, and day boundaries

use crate::chore::Recurrence;
use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, TimeZone, Utc};

/// Upper bound on catch-up steps when a due date is far in the past
const MAX_CATCH_UP_STEPS: u32 = 10_000;

/// One recurrence step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(i64),
    Months(u32),
}

impl Step {
    pub fn advance(self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Step::Days(n) => from.checked_add_signed(Duration::try_days(n)?),
            Step::Months(n) => from.checked_add_months(Months::new(n)),
        }
    }

    pub fn advance_date(self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Step::Days(n) => from.checked_add_signed(Duration::try_days(n)?),
            Step::Months(n) => from.checked_add_months(Months::new(n)),
        }
    }
}

/// First occurrence of the cadence strictly after `now`, counted from `due`
///
/// Returns None when the chore does not recur or the arithmetic overflows.
pub fn next_due_after(
    due: DateTime<Utc>,
    recurrence: &Recurrence,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let step = recurrence.step()?;
    let mut next = step.advance(due)?;
    let mut steps = 1;
    while next <= now {
        if steps >= MAX_CATCH_UP_STEPS {
            return None;
        }
        next = step.advance(next)?;
        steps += 1;
    }
    Some(next)
}

/// `due` minus a configured offset
pub fn offset_before(due: DateTime<Utc>, offset: std::time::Duration) -> Option<DateTime<Utc>> {
    let offset = Duration::from_std(offset).ok()?;
    due.checked_sub_signed(offset)
}

/// Whole days elapsed since the due date, never negative
pub fn days_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - due).num_days().max(0)
}

/// Calendar date of a timestamp in the household's local offset
pub fn local_date(time: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    time.with_timezone(&offset).date_naive()
}

/// The next local midnight strictly after `now`
pub fn next_local_midnight(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let tomorrow = local_date(now, offset).succ_opt()?;
    let midnight = tomorrow.and_hms_opt(0, 0, 0)?;
    let local = offset.from_local_datetime(&midnight).single()?;
    Some(local.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
