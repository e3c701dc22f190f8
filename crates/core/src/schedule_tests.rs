// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::chore::{Frequency, IntervalUnit};
use yare::parameterized;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[parameterized(
    daily_one_step = { Frequency::Daily, at(2026, 1, 5, 12), at(2026, 1, 6, 18) },
    daily_catch_up = { Frequency::Daily, at(2026, 1, 8, 19), at(2026, 1, 9, 18) },
    weekly = { Frequency::Weekly, at(2026, 1, 5, 19), at(2026, 1, 12, 18) },
    biweekly = { Frequency::Biweekly, at(2026, 1, 5, 19), at(2026, 1, 19, 18) },
    monthly = { Frequency::Monthly, at(2026, 1, 5, 19), at(2026, 2, 5, 18) },
)]
fn next_due_is_strictly_after_now(frequency: Frequency, now: DateTime<Utc>, expected: DateTime<Utc>) {
    let due = at(2026, 1, 5, 18);
    let next = next_due_after(due, &Recurrence::new(frequency), now);
    assert_eq!(next, Some(expected));
}

#[test]
fn monthly_clamps_to_month_end() {
    let due = at(2026, 1, 31, 18);
    let next = next_due_after(due, &Recurrence::new(Frequency::Monthly), due);
    assert_eq!(next, Some(at(2026, 2, 28, 18)));
}

#[test]
fn custom_interval_steps_by_unit() {
    let due = at(2026, 1, 5, 18);
    let every_ten_days = Recurrence::custom(10, IntervalUnit::Days);
    assert_eq!(next_due_after(due, &every_ten_days, due), Some(at(2026, 1, 15, 18)));

    let every_two_months = Recurrence::custom(2, IntervalUnit::Months);
    assert_eq!(next_due_after(due, &every_two_months, due), Some(at(2026, 3, 5, 18)));
}

#[test]
fn non_recurring_has_no_next_due() {
    let due = at(2026, 1, 5, 18);
    assert_eq!(next_due_after(due, &Recurrence::default(), due), None);
}

#[test]
fn offsets_and_days_overdue() {
    let due = at(2026, 1, 5, 18);
    assert_eq!(
        offset_before(due, std::time::Duration::from_secs(3 * 3600)),
        Some(at(2026, 1, 5, 15))
    );
    assert_eq!(days_overdue(due, at(2026, 1, 5, 20)), 0);
    assert_eq!(days_overdue(due, at(2026, 1, 8, 18)), 3);
    assert_eq!(days_overdue(due, at(2026, 1, 4, 18)), 0);
}

#[test]
fn local_date_uses_offset() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    // 02:00 UTC is still the previous evening five hours west
    let time = at(2026, 1, 6, 2);
    assert_eq!(local_date(time, offset), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
}

#[test]
fn next_local_midnight_is_start_of_next_local_day() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = at(2026, 1, 5, 12);
    // Local midnight on Jan 6 at +02:00 is 22:00 UTC on Jan 5
    assert_eq!(next_local_midnight(now, offset), Some(at(2026, 1, 5, 22)));

    let utc = FixedOffset::east_opt(0).unwrap();
    assert_eq!(next_local_midnight(at(2026, 1, 5, 0), utc), Some(at(2026, 1, 6, 0)));
}

proptest::proptest! {
    #[test]
    fn next_due_always_after_now(hours_late in 0i64..5000, freq in 0usize..4) {
        let frequency = [Frequency::Daily, Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly][freq];
        let due = at(2026, 1, 5, 18);
        let now = due + Duration::hours(hours_late);
        let next = next_due_after(due, &Recurrence::new(frequency), now);
        proptest::prop_assert!(next.is_some_and(|n| n > now));
    }
}
