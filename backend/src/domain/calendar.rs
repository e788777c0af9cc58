//! Calendar utilities for the recurrence engine.
//!
//! Pure, timezone-naive date arithmetic: month lengths, clamped month
//! addition, and nth-weekday resolution. Higher layers never touch
//! chrono internals for scheduling decisions; everything they need is
//! expressed here in terms of calendar dates.

use chrono::{Datelike, NaiveDate};

use crate::domain::models::recurrence::WeekOfMonth;

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Get the number of days in a given month and year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Weekday index of a date (0 = Sunday, 1 = Monday, ..., 6 = Saturday)
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Get the human-readable name for a weekday index
pub fn day_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Invalid",
    }
}

/// Navigate to the next calendar month
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Advance a (year, month) pair by a number of months
pub fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + months as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// The given day-of-month within a month, clamped to the month's length
/// (day 31 in April resolves to April 30, never May 1).
pub fn clamped_day_in_month(year: i32, month: u32, day: u8) -> NaiveDate {
    let clamped = (day as u32).min(days_in_month(year, month));
    ymd(year, month, clamped)
}

/// Add whole months to a date, clamping the day-of-month when the
/// target month is shorter (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let (year, month) = add_months(date.year(), date.month(), months);
    clamped_day_in_month(year, month, date.day() as u8)
}

/// Resolve the nth occurrence of a weekday within a month.
///
/// `First`..`Fourth` count forward from the 1st; `Last` counts backward
/// from month end. Returns `None` when the requested occurrence does
/// not exist in that month; callers treat that as "no occurrence this
/// month", not as an error.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    week: WeekOfMonth,
    day_of_week: u8,
) -> Option<NaiveDate> {
    if day_of_week > 6 {
        return None;
    }
    match week.forward_index() {
        Some(index) => {
            let first = ymd(year, month, 1);
            let offset = (day_of_week as u32 + 7 - weekday_index(first) as u32) % 7;
            let day = 1 + offset + index * 7;
            if day > days_in_month(year, month) {
                return None;
            }
            Some(ymd(year, month, day))
        }
        None => {
            // Last: walk back from the final day of the month.
            let last_day = days_in_month(year, month);
            let last = ymd(year, month, last_day);
            let offset = (weekday_index(last) as u32 + 7 - day_of_week as u32) % 7;
            Some(ymd(year, month, last_day - offset))
        }
    }
}
