//! Domain model for recurrence rules.
//!
//! The wire form (`shared::RecurrenceRuleInput`) is a loose bag of
//! optional fields gated by a seven-value frequency enum. Here the
//! rule is a sum type keyed on frequency class, so a monthly rule
//! cannot carry a weekday set and a weekly rule cannot carry a
//! day-of-month anchor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which occurrence of a weekday inside a month a monthly rule anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    /// Zero-based occurrence index counted from the 1st of the month.
    /// `Last` has no forward index; it is resolved from month end.
    pub fn forward_index(&self) -> Option<u32> {
        match self {
            WeekOfMonth::First => Some(0),
            WeekOfMonth::Second => Some(1),
            WeekOfMonth::Third => Some(2),
            WeekOfMonth::Fourth => Some(3),
            WeekOfMonth::Last => None,
        }
    }
}

/// Day anchor for monthly-family rules. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthlyAnchor {
    /// Fixed day of month (1-31), clamped to the last day of shorter months.
    DayOfMonth(u8),
    /// Nth weekday of the month (0 = Sunday .. 6 = Saturday).
    NthWeekday { week: WeekOfMonth, day_of_week: u8 },
}

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCondition {
    Never,
    /// No occurrence after this date (inclusive).
    OnDate(NaiveDate),
    /// At most this many occurrences, counted from the start date.
    AfterOccurrences(u32),
}

/// Frequency-class keyed recurrence pattern.
///
/// The seven wire frequencies fold into three classes: BI_WEEKLY is a
/// weekly pattern with a doubled week step, QUARTERLY / SEMI_ANNUALLY /
/// ANNUALLY are monthly patterns with steps of 3, 6 and 12 months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecurrencePattern {
    /// Every `interval` days.
    Daily { interval: u32 },
    /// Every `week_step` weeks, on each listed weekday (0 = Sunday).
    Weekly { week_step: u32, days_of_week: Vec<u8> },
    /// Every `month_step` months, on the anchored day.
    Monthly { month_step: u32, anchor: MonthlyAnchor },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub end_condition: EndCondition,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RuleValidationError {
    #[error("Interval must be a positive integer")]
    NonPositiveInterval,
    #[error("Weekly rules must select at least one day of week")]
    EmptyDaysOfWeek,
    #[error("Invalid day of week: {0}. Must be 0-6 (Sunday-Saturday)")]
    InvalidDayOfWeek(u8),
    #[error("Invalid day of month: {0}. Must be 1-31")]
    InvalidDayOfMonth(u8),
    #[error("Monthly rules must specify exactly one of day-of-month or nth-weekday")]
    MissingMonthlyAnchor,
    #[error("Monthly rules cannot specify both day-of-month and nth-weekday")]
    ConflictingMonthlyAnchors,
    #[error("End date is required when the end condition is ON_DATE")]
    MissingEndDate,
    #[error("End date {end_date} is before the start date {start_date}")]
    EndDateBeforeStart {
        end_date: NaiveDate,
        start_date: NaiveDate,
    },
    #[error("Occurrence count must be a positive integer")]
    NonPositiveOccurrenceCount,
    #[error("Occurrence count is required when the end condition is AFTER_OCCURRENCES")]
    MissingOccurrenceCount,
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub fn is_valid_day_of_week(day: u8) -> bool {
    day <= 6
}

impl RecurrencePattern {
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        match self {
            RecurrencePattern::Daily { interval } => {
                if *interval == 0 {
                    return Err(RuleValidationError::NonPositiveInterval);
                }
            }
            RecurrencePattern::Weekly {
                week_step,
                days_of_week,
            } => {
                if *week_step == 0 {
                    return Err(RuleValidationError::NonPositiveInterval);
                }
                if days_of_week.is_empty() {
                    return Err(RuleValidationError::EmptyDaysOfWeek);
                }
                for day in days_of_week {
                    if !is_valid_day_of_week(*day) {
                        return Err(RuleValidationError::InvalidDayOfWeek(*day));
                    }
                }
            }
            RecurrencePattern::Monthly { month_step, anchor } => {
                if *month_step == 0 {
                    return Err(RuleValidationError::NonPositiveInterval);
                }
                match anchor {
                    MonthlyAnchor::DayOfMonth(day) => {
                        if *day == 0 || *day > 31 {
                            return Err(RuleValidationError::InvalidDayOfMonth(*day));
                        }
                    }
                    MonthlyAnchor::NthWeekday { day_of_week, .. } => {
                        if !is_valid_day_of_week(*day_of_week) {
                            return Err(RuleValidationError::InvalidDayOfWeek(*day_of_week));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl EndCondition {
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        match self {
            EndCondition::AfterOccurrences(count) if *count == 0 => {
                Err(RuleValidationError::NonPositiveOccurrenceCount)
            }
            _ => Ok(()),
        }
    }
}

impl RecurrenceRule {
    /// Build a validated rule. Start-date-dependent checks live in
    /// [`RecurrenceRule::validate_against_start`] because the rule
    /// itself does not know the payment's start date.
    pub fn new(
        pattern: RecurrencePattern,
        end_condition: EndCondition,
    ) -> Result<Self, RuleValidationError> {
        pattern.validate()?;
        end_condition.validate()?;
        Ok(Self {
            pattern,
            end_condition,
        })
    }

    /// Reject an `OnDate` end condition that falls before the payment's
    /// start date.
    pub fn validate_against_start(&self, start_date: NaiveDate) -> Result<(), RuleValidationError> {
        if let EndCondition::OnDate(end_date) = self.end_condition {
            if end_date < start_date {
                return Err(RuleValidationError::EndDateBeforeStart {
                    end_date,
                    start_date,
                });
            }
        }
        Ok(())
    }
}
