//! Occurrence enumeration for recurrence rules.
//!
//! Given a rule, a start date and a query window, produce the ordered,
//! deduplicated list of occurrence dates inside the window. All
//! functions here are pure: the caller decides what to do with the
//! dates (preview, materialization) and when to invoke them.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::calendar;
use crate::domain::models::payment::{Payment, PaymentStatus};
use crate::domain::models::recurrence::{
    EndCondition, MonthlyAnchor, RecurrencePattern, RecurrenceRule,
};

/// Tracks the end condition and the window while candidates stream in
/// ascending date order.
///
/// Occurrences are counted from the rule's start date, not from the
/// window start: a candidate between the two consumes the occurrence
/// budget without being emitted.
struct OccurrenceCollector {
    start_date: NaiveDate,
    window_from: NaiveDate,
    window_to: NaiveDate,
    end_date: Option<NaiveDate>,
    remaining: Option<u32>,
    dates: Vec<NaiveDate>,
}

impl OccurrenceCollector {
    fn new(rule: &RecurrenceRule, start_date: NaiveDate, window_from: NaiveDate, window_to: NaiveDate) -> Self {
        let (end_date, remaining) = match rule.end_condition {
            EndCondition::Never => (None, None),
            EndCondition::OnDate(date) => (Some(date), None),
            EndCondition::AfterOccurrences(count) => (None, Some(count)),
        };
        Self {
            start_date,
            window_from,
            window_to,
            end_date,
            remaining,
            dates: Vec::new(),
        }
    }

    /// Feed the next candidate date. Returns `false` once enumeration
    /// is exhausted (window passed or end condition reached); callers
    /// must feed candidates in ascending order.
    fn consider(&mut self, date: NaiveDate) -> bool {
        if date < self.start_date {
            // Not an occurrence yet; does not consume the budget.
            return true;
        }
        if let Some(end_date) = self.end_date {
            if date > end_date {
                return false;
            }
        }
        if let Some(remaining) = self.remaining {
            if remaining == 0 {
                return false;
            }
        }
        if date > self.window_to {
            return false;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        if date >= self.window_from {
            self.dates.push(date);
        }
        true
    }

    fn finish(self) -> Vec<NaiveDate> {
        self.dates
    }
}

/// Enumerate the occurrence dates of `rule` inside `[window_from,
/// window_to]` (inclusive), ascending and without duplicates.
///
/// The start date is occurrence #1 whenever it satisfies the rule's
/// day constraint. An empty or inverted window yields an empty list.
pub fn enumerate_occurrences(
    rule: &RecurrenceRule,
    start_date: NaiveDate,
    window_from: NaiveDate,
    window_to: NaiveDate,
) -> Vec<NaiveDate> {
    if window_to < window_from {
        return Vec::new();
    }
    let mut collector = OccurrenceCollector::new(rule, start_date, window_from, window_to);
    match &rule.pattern {
        RecurrencePattern::Daily { interval } => {
            enumerate_daily(&mut collector, start_date, *interval);
        }
        RecurrencePattern::Weekly {
            week_step,
            days_of_week,
        } => {
            enumerate_weekly(&mut collector, start_date, *week_step, days_of_week);
        }
        RecurrencePattern::Monthly { month_step, anchor } => {
            enumerate_monthly(&mut collector, start_date, *month_step, *anchor);
        }
    }
    collector.finish()
}

/// Enumerate occurrences for a stored payment, honoring its lifecycle:
/// a Paused or Completed payment no longer produces occurrences, and
/// the payment's end date clips the window.
pub fn enumerate_payment_occurrences(
    payment: &Payment,
    window_from: NaiveDate,
    window_to: NaiveDate,
) -> Vec<NaiveDate> {
    if payment.status != PaymentStatus::Active {
        return Vec::new();
    }
    let effective_to = match payment.end_date {
        Some(end_date) => window_to.min(end_date),
        None => window_to,
    };
    enumerate_occurrences(&payment.rule, payment.start_date, window_from, effective_to)
}

fn enumerate_daily(collector: &mut OccurrenceCollector, start_date: NaiveDate, interval: u32) {
    let mut current = start_date;
    while collector.consider(current) {
        current += Duration::days(interval as i64);
    }
}

fn enumerate_weekly(
    collector: &mut OccurrenceCollector,
    start_date: NaiveDate,
    week_step: u32,
    days_of_week: &[u8],
) {
    let mut days: Vec<u8> = days_of_week.to_vec();
    days.sort_unstable();
    days.dedup();

    // Occurrence #1 is the earliest date on/after the start whose
    // weekday is selected; its Sunday-based week is cadence week 0.
    // Anchoring at the start date's own week instead would phase-shift
    // a rule whose selected days all precede the start weekday.
    let start_weekday = calendar::weekday_index(start_date) as i64;
    let Some(first_match) = days
        .iter()
        .map(|day| start_date + Duration::days((*day as i64 + 7 - start_weekday) % 7))
        .min()
    else {
        return;
    };

    // The step widens the week cadence, not the per-week count.
    let week_origin = first_match - Duration::days(calendar::weekday_index(first_match) as i64);
    let mut week = 0i64;
    'weeks: loop {
        let week_start = week_origin + Duration::days(week * 7 * week_step as i64);
        if week_start > collector.window_to {
            break;
        }
        for day in &days {
            let candidate = week_start + Duration::days(*day as i64);
            if !collector.consider(candidate) {
                break 'weeks;
            }
        }
        week += 1;
    }
}

fn enumerate_monthly(
    collector: &mut OccurrenceCollector,
    start_date: NaiveDate,
    month_step: u32,
    anchor: MonthlyAnchor,
) {
    let mut year = start_date.year();
    let mut month = start_date.month();
    loop {
        let month_start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
        if month_start > collector.window_to {
            break;
        }
        let candidate = match anchor {
            MonthlyAnchor::DayOfMonth(day) => {
                Some(calendar::clamped_day_in_month(year, month, day))
            }
            MonthlyAnchor::NthWeekday { week, day_of_week } => {
                // A month where the nth weekday does not exist
                // contributes zero occurrences; it never falls back
                // to Last.
                calendar::nth_weekday_of_month(year, month, week, day_of_week)
            }
        };
        if let Some(candidate) = candidate {
            if !collector.consider(candidate) {
                break;
            }
        }
        let (next_year, next_month) = calendar::add_months(year, month, month_step);
        year = next_year;
        month = next_month;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::payment::{PaymentAccounts, PaymentType};
    use crate::domain::models::recurrence::WeekOfMonth;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_rule(week_step: u32, days: &[u8], end: EndCondition) -> RecurrenceRule {
        RecurrenceRule::new(
            RecurrencePattern::Weekly {
                week_step,
                days_of_week: days.to_vec(),
            },
            end,
        )
        .unwrap()
    }

    fn monthly_rule(month_step: u32, anchor: MonthlyAnchor, end: EndCondition) -> RecurrenceRule {
        RecurrenceRule::new(RecurrencePattern::Monthly { month_step, anchor }, end).unwrap()
    }

    #[test]
    fn test_daily_start_is_first_occurrence() {
        let rule = RecurrenceRule::new(
            RecurrencePattern::Daily { interval: 3 },
            EndCondition::Never,
        )
        .unwrap();
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 10));
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7), date(2024, 1, 10)]
        );
    }

    #[test]
    fn test_weekly_two_days_over_four_weeks() {
        // Monday + Thursday over a 4-week window: 8 occurrences, 2 per week.
        // 2024-01-01 is a Monday.
        let rule = weekly_rule(1, &[1, 4], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 28));
        assert_eq!(dates.len(), 8);
        assert_eq!(dates[0], date(2024, 1, 1)); // Monday
        assert_eq!(dates[1], date(2024, 1, 4)); // Thursday
        assert_eq!(dates[7], date(2024, 1, 25));
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1], "dates must be strictly ascending");
        }
    }

    #[test]
    fn test_biweekly_friday_cadence() {
        // Every other Friday over 8 weeks: 4 occurrences, 14 days apart.
        // 2024-01-05 is a Friday.
        let rule = weekly_rule(2, &[5], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 1, 1), date(2024, 2, 25));
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 19), date(2024, 2, 2), date(2024, 2, 16)]
        );
        for pair in dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 14);
        }
    }

    #[test]
    fn test_biweekly_two_days_is_two_per_cadence_week() {
        // BI_WEEKLY with {Monday, Thursday}: both days fire in cadence
        // weeks, none in the off weeks.
        let rule = weekly_rule(2, &[1, 4], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 28));
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 15), date(2024, 1, 18)]
        );
    }

    #[test]
    fn test_biweekly_start_after_selected_day_keeps_phase() {
        // Start on a Wednesday with {Monday} selected: the first
        // occurrence is the next Monday, and the cadence counts from
        // that Monday's week, not from the start week.
        // 2024-01-03 is a Wednesday; 2024-01-08 the following Monday.
        let rule = weekly_rule(2, &[1], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 3), date(2024, 1, 1), date(2024, 2, 4));
        assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 22)]);
    }

    #[test]
    fn test_weekly_start_midweek_skips_earlier_day() {
        // Start on a Wednesday with {Monday, Friday}: the Monday of the
        // start week is before the start date and is not an occurrence.
        // 2024-01-03 is a Wednesday.
        let rule = weekly_rule(1, &[1, 5], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 3), date(2024, 1, 1), date(2024, 1, 14));
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 8), date(2024, 1, 12)]
        );
    }

    #[test]
    fn test_monthly_day_31_clamps_to_short_months() {
        let rule = monthly_rule(1, MonthlyAnchor::DayOfMonth(31), EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 31), date(2024, 1, 1), date(2024, 4, 30));
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_monthly_fifteenth_scenario() {
        let rule = monthly_rule(1, MonthlyAnchor::DayOfMonth(15), EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 15), date(2024, 1, 1), date(2024, 4, 30));
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15), date(2024, 4, 15)]
        );
    }

    #[test]
    fn test_monthly_start_after_anchor_moves_to_next_month() {
        // Start Jan 20 with a day-15 anchor: Jan 15 predates the start
        // and is skipped without consuming the occurrence budget.
        let rule = monthly_rule(1, MonthlyAnchor::DayOfMonth(15), EndCondition::AfterOccurrences(2));
        let dates = enumerate_occurrences(&rule, date(2024, 1, 20), date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(dates, vec![date(2024, 2, 15), date(2024, 3, 15)]);
    }

    #[test]
    fn test_quarterly_cadence() {
        let rule = monthly_rule(3, MonthlyAnchor::DayOfMonth(1), EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 4, 1), date(2024, 7, 1), date(2024, 10, 1)]
        );
    }

    #[test]
    fn test_annual_cadence() {
        let rule = monthly_rule(12, MonthlyAnchor::DayOfMonth(29), EndCondition::Never);
        // Feb 29 anchors clamp to Feb 28 in non-leap years.
        let dates = enumerate_occurrences(&rule, date(2024, 2, 29), date(2024, 1, 1), date(2026, 12, 31));
        assert_eq!(
            dates,
            vec![date(2024, 2, 29), date(2025, 2, 28), date(2026, 2, 28)]
        );
    }

    #[test]
    fn test_nth_weekday_rule() {
        // Second Tuesday of each month.
        let rule = monthly_rule(
            1,
            MonthlyAnchor::NthWeekday {
                week: WeekOfMonth::Second,
                day_of_week: 2,
            },
            EndCondition::Never,
        );
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 3, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 9), date(2024, 2, 13), date(2024, 3, 12)]
        );
    }

    #[test]
    fn test_last_weekday_rule() {
        // Last Friday of each month.
        let rule = monthly_rule(
            1,
            MonthlyAnchor::NthWeekday {
                week: WeekOfMonth::Last,
                day_of_week: 5,
            },
            EndCondition::Never,
        );
        let dates = enumerate_occurrences(&rule, date(2024, 1, 1), date(2024, 1, 1), date(2024, 3, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 26), date(2024, 2, 23), date(2024, 3, 29)]
        );
    }

    #[test]
    fn test_after_occurrences_counts_from_start() {
        let rule = weekly_rule(1, &[5], EndCondition::AfterOccurrences(3));
        // Unbounded-future window: exactly 3 dates, starting from the
        // first Friday on/after the start date.
        let dates = enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 1, 1), date(2030, 12, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 12), date(2024, 1, 19)]
        );

        // A window that opens after the first two occurrences only sees
        // the third: earlier occurrences consumed the budget anyway.
        let dates = enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 1, 15), date(2030, 12, 31));
        assert_eq!(dates, vec![date(2024, 1, 19)]);
    }

    #[test]
    fn test_on_date_end_condition() {
        let rule = weekly_rule(1, &[5], EndCondition::OnDate(date(2024, 1, 19)));
        let dates = enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 12), date(2024, 1, 19)]
        );
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let rule = weekly_rule(1, &[5], EndCondition::Never);
        assert!(enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 2, 1), date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_duplicate_weekdays_deduplicated() {
        let rule = weekly_rule(1, &[5, 5, 5], EndCondition::Never);
        let dates = enumerate_occurrences(&rule, date(2024, 1, 5), date(2024, 1, 1), date(2024, 1, 14));
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 12)]);
    }

    fn sample_payment(status: PaymentStatus, end_date: Option<NaiveDate>) -> Payment {
        Payment {
            id: "payment::1::abcd".to_string(),
            name: "Gym".to_string(),
            description: None,
            amount: 30.0,
            payment_type: PaymentType::Expense,
            category: "Health".to_string(),
            accounts: PaymentAccounts::Single {
                account_id: "acct-1".to_string(),
            },
            start_date: date(2024, 1, 5),
            end_date,
            status,
            is_manual: false,
            rule: weekly_rule(1, &[5], EndCondition::Never),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_completed_payment_enumerates_nothing() {
        let payment = sample_payment(PaymentStatus::Completed, None);
        assert!(enumerate_payment_occurrences(&payment, date(2024, 1, 1), date(2024, 12, 31)).is_empty());
    }

    #[test]
    fn test_paused_payment_enumerates_nothing() {
        let payment = sample_payment(PaymentStatus::Paused, None);
        assert!(enumerate_payment_occurrences(&payment, date(2024, 1, 1), date(2024, 12, 31)).is_empty());
    }

    #[test]
    fn test_payment_end_date_clips_window() {
        let payment = sample_payment(PaymentStatus::Active, Some(date(2024, 1, 12)));
        let dates = enumerate_payment_occurrences(&payment, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(dates, vec![date(2024, 1, 5), date(2024, 1, 12)]);
    }

    #[test]
    fn test_window_past_end_date_is_empty() {
        let payment = sample_payment(PaymentStatus::Active, Some(date(2024, 1, 12)));
        assert!(enumerate_payment_occurrences(&payment, date(2024, 2, 1), date(2024, 12, 31)).is_empty());
    }
}
