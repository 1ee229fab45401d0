//! Calendar window arithmetic in the fixed civil timezone used for reports.
//!
//! Date-only inputs and report buckets are interpreted in a fixed UTC+5:30
//! offset regardless of the host timezone. Boundaries are computed on the
//! local wall clock (first/last calendar day of a month, midnight, end of
//! day) and then converted back to absolute instants for querying.

use time::{Date, Month, OffsetDateTime, Time, UtcOffset, macros::offset};

/// The fixed civil timezone for date inputs and report windows (UTC+5:30).
pub const REPORTING_OFFSET: UtcOffset = offset!(+5:30);

/// An inclusive range of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantRange {
    /// The first instant included in the range.
    pub start: OffsetDateTime,
    /// The last instant included in the range.
    pub end: OffsetDateTime,
}

/// The absolute instant of local midnight at the start of `date` in `offset`.
pub fn day_start(date: Date, offset: UtcOffset) -> OffsetDateTime {
    date.midnight().assume_offset(offset)
}

/// The absolute instant of the last millisecond (23:59:59.999) of `date` in `offset`.
pub fn day_end(date: Date, offset: UtcOffset) -> OffsetDateTime {
    let end_of_day = Time::from_hms_milli(23, 59, 59, 999).expect("invalid end-of-day time");

    date.with_time(end_of_day).assume_offset(offset)
}

/// Compute the instant range covering one civil calendar month as seen in `offset`.
///
/// The month is the one containing `now` when `months_back` is 0, or the
/// month that many calendar months earlier. The range runs from local
/// midnight on the first day to local 23:59:59.999 on the last day.
pub fn month_window(now: OffsetDateTime, offset: UtcOffset, months_back: u32) -> InstantRange {
    let local_today = now.to_offset(offset).date();
    let (year, month) = shift_months_back(local_today.year(), local_today.month(), months_back);

    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    InstantRange {
        start: day_start(start, offset),
        end: day_end(end, offset),
    }
}

/// The trailing `count` civil (year, month) pairs ending at the month
/// containing `now` in `offset`, ordered oldest first.
pub fn trailing_months(now: OffsetDateTime, offset: UtcOffset, count: u32) -> Vec<(i32, Month)> {
    let local_today = now.to_offset(offset).date();

    (0..count)
        .rev()
        .map(|months_back| {
            shift_months_back(local_today.year(), local_today.month(), months_back)
        })
        .collect()
}

/// Step `months_back` calendar months backwards from (`year`, `month`).
pub(crate) fn shift_months_back(year: i32, month: Month, months_back: u32) -> (i32, Month) {
    let months_since_zero =
        year as i64 * 12 + (month_number(month) as i64 - 1) - months_back as i64;

    let year = months_since_zero.div_euclid(12) as i32;
    let month = month_from_number((months_since_zero.rem_euclid(12) + 1) as u8);

    (year, month)
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub(crate) fn month_number(month: Month) -> u8 {
    match month {
        Month::January => 1,
        Month::February => 2,
        Month::March => 3,
        Month::April => 4,
        Month::May => 5,
        Month::June => 6,
        Month::July => 7,
        Month::August => 8,
        Month::September => 9,
        Month::October => 10,
        Month::November => 11,
        Month::December => 12,
    }
}

pub(crate) fn month_from_number(month: u8) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        12 => Month::December,
        _ => panic!("invalid month number {month}"),
    }
}

/// The fixed three-letter label for `month`, e.g. "Jan".
pub fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
