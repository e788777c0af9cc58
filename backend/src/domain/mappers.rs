//! Mapping between wire DTOs and domain models.
//!
//! The recurrence-rule mapper is where the loose form input (seven
//! frequencies, many optional fields) becomes the validated domain sum
//! type. Invalid combinations are rejected with a field-level error,
//! never coerced.

use chrono::NaiveDate;

use crate::domain::models::payment::{Payment, PaymentAccounts, PaymentStatus, PaymentType};
use crate::domain::models::recurrence::{
    EndCondition, MonthlyAnchor, RecurrencePattern, RecurrenceRule, RuleValidationError,
    WeekOfMonth,
};
use crate::domain::models::transaction::{Transaction, TransactionStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate, RuleValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RuleValidationError::InvalidDate(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn week_of_month_from_dto(week: shared::WeekOfMonth) -> WeekOfMonth {
    match week {
        shared::WeekOfMonth::First => WeekOfMonth::First,
        shared::WeekOfMonth::Second => WeekOfMonth::Second,
        shared::WeekOfMonth::Third => WeekOfMonth::Third,
        shared::WeekOfMonth::Fourth => WeekOfMonth::Fourth,
        shared::WeekOfMonth::Last => WeekOfMonth::Last,
    }
}

fn week_of_month_to_dto(week: WeekOfMonth) -> shared::WeekOfMonth {
    match week {
        WeekOfMonth::First => shared::WeekOfMonth::First,
        WeekOfMonth::Second => shared::WeekOfMonth::Second,
        WeekOfMonth::Third => shared::WeekOfMonth::Third,
        WeekOfMonth::Fourth => shared::WeekOfMonth::Fourth,
        WeekOfMonth::Last => shared::WeekOfMonth::Last,
    }
}

pub struct RecurrenceRuleMapper;

impl RecurrenceRuleMapper {
    /// Build a validated domain rule from form input.
    ///
    /// Fields that do not apply to the selected frequency class are
    /// ignored (a monthly input may still carry a stale weekday set
    /// from the form); the combinations the rule model cares about are
    /// validated strictly.
    pub fn from_input(
        input: &shared::RecurrenceRuleInput,
    ) -> Result<RecurrenceRule, RuleValidationError> {
        let interval = input.interval.unwrap_or(1);
        if interval == 0 {
            return Err(RuleValidationError::NonPositiveInterval);
        }

        let pattern = match input.frequency {
            shared::Frequency::Daily => RecurrencePattern::Daily { interval },
            shared::Frequency::Weekly => RecurrencePattern::Weekly {
                week_step: interval,
                days_of_week: input.days_of_week.clone().unwrap_or_default(),
            },
            shared::Frequency::BiWeekly => RecurrencePattern::Weekly {
                week_step: interval * 2,
                days_of_week: input.days_of_week.clone().unwrap_or_default(),
            },
            shared::Frequency::Monthly => Self::monthly_pattern(input, interval)?,
            shared::Frequency::Quarterly => Self::monthly_pattern(input, interval * 3)?,
            shared::Frequency::SemiAnnually => Self::monthly_pattern(input, interval * 6)?,
            shared::Frequency::Annually => Self::monthly_pattern(input, interval * 12)?,
        };

        let end_condition = match input.end_condition {
            shared::EndConditionKind::Never => EndCondition::Never,
            shared::EndConditionKind::OnDate => {
                let raw = input
                    .end_date
                    .as_deref()
                    .ok_or(RuleValidationError::MissingEndDate)?;
                EndCondition::OnDate(parse_date(raw)?)
            }
            shared::EndConditionKind::AfterOccurrences => {
                let count = input
                    .occurrence_count
                    .ok_or(RuleValidationError::MissingOccurrenceCount)?;
                EndCondition::AfterOccurrences(count)
            }
        };

        RecurrenceRule::new(pattern, end_condition)
    }

    fn monthly_pattern(
        input: &shared::RecurrenceRuleInput,
        month_step: u32,
    ) -> Result<RecurrencePattern, RuleValidationError> {
        let nth = match (input.week_of_month, input.day_of_week) {
            (Some(week), Some(day_of_week)) => Some(MonthlyAnchor::NthWeekday {
                week: week_of_month_from_dto(week),
                day_of_week,
            }),
            _ => None,
        };
        let anchor = match (input.day_of_month, nth) {
            (Some(_), Some(_)) => return Err(RuleValidationError::ConflictingMonthlyAnchors),
            (Some(day), None) => MonthlyAnchor::DayOfMonth(day),
            (None, Some(anchor)) => anchor,
            (None, None) => return Err(RuleValidationError::MissingMonthlyAnchor),
        };
        Ok(RecurrencePattern::Monthly { month_step, anchor })
    }

    /// Render a domain rule back into the wire shape. The output is
    /// canonical: shorthand frequencies fold into WEEKLY/MONTHLY with
    /// the widened interval (BI_WEEKLY comes back as WEEKLY, interval 2).
    pub fn to_input(rule: &RecurrenceRule) -> shared::RecurrenceRuleInput {
        let (frequency, interval, days_of_week, day_of_month, week_of_month, day_of_week) =
            match &rule.pattern {
                RecurrencePattern::Daily { interval } => {
                    (shared::Frequency::Daily, *interval, None, None, None, None)
                }
                RecurrencePattern::Weekly {
                    week_step,
                    days_of_week,
                } => (
                    shared::Frequency::Weekly,
                    *week_step,
                    Some(days_of_week.clone()),
                    None,
                    None,
                    None,
                ),
                RecurrencePattern::Monthly { month_step, anchor } => match anchor {
                    MonthlyAnchor::DayOfMonth(day) => (
                        shared::Frequency::Monthly,
                        *month_step,
                        None,
                        Some(*day),
                        None,
                        None,
                    ),
                    MonthlyAnchor::NthWeekday { week, day_of_week } => (
                        shared::Frequency::Monthly,
                        *month_step,
                        None,
                        None,
                        Some(week_of_month_to_dto(*week)),
                        Some(*day_of_week),
                    ),
                },
            };
        let (end_condition, end_date, occurrence_count) = match rule.end_condition {
            EndCondition::Never => (shared::EndConditionKind::Never, None, None),
            EndCondition::OnDate(date) => (
                shared::EndConditionKind::OnDate,
                Some(format_date(date)),
                None,
            ),
            EndCondition::AfterOccurrences(count) => (
                shared::EndConditionKind::AfterOccurrences,
                None,
                Some(count),
            ),
        };
        shared::RecurrenceRuleInput {
            frequency,
            interval: Some(interval),
            days_of_week,
            day_of_month,
            week_of_month,
            day_of_week,
            end_condition,
            end_date,
            occurrence_count,
        }
    }
}

fn payment_type_to_dto(payment_type: PaymentType) -> shared::PaymentType {
    match payment_type {
        PaymentType::Income => shared::PaymentType::Income,
        PaymentType::Expense => shared::PaymentType::Expense,
        PaymentType::Transfer => shared::PaymentType::Transfer,
    }
}

pub fn payment_type_from_dto(payment_type: shared::PaymentType) -> PaymentType {
    match payment_type {
        shared::PaymentType::Income => PaymentType::Income,
        shared::PaymentType::Expense => PaymentType::Expense,
        shared::PaymentType::Transfer => PaymentType::Transfer,
    }
}

fn payment_status_to_dto(status: PaymentStatus) -> shared::PaymentStatus {
    match status {
        PaymentStatus::Active => shared::PaymentStatus::Active,
        PaymentStatus::Paused => shared::PaymentStatus::Paused,
        PaymentStatus::Completed => shared::PaymentStatus::Completed,
    }
}

pub struct PaymentMapper;

impl PaymentMapper {
    pub fn to_dto(payment: &Payment) -> shared::Payment {
        let (account_id, from_account_id, to_account_id) = match &payment.accounts {
            PaymentAccounts::Single { account_id } => (Some(account_id.clone()), None, None),
            PaymentAccounts::Transfer {
                from_account_id,
                to_account_id,
            } => (
                None,
                Some(from_account_id.clone()),
                Some(to_account_id.clone()),
            ),
        };
        shared::Payment {
            id: payment.id.clone(),
            name: payment.name.clone(),
            description: payment.description.clone(),
            amount: payment.amount,
            payment_type: payment_type_to_dto(payment.payment_type),
            category: payment.category.clone(),
            account_id,
            from_account_id,
            to_account_id,
            start_date: format_date(payment.start_date),
            end_date: payment.end_date.map(format_date),
            status: payment_status_to_dto(payment.status),
            is_manual: payment.is_manual,
            rule: RecurrenceRuleMapper::to_input(&payment.rule),
            created_at: payment.created_at.clone(),
            updated_at: payment.updated_at.clone(),
        }
    }
}

pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(transaction: &Transaction) -> shared::Transaction {
        shared::Transaction {
            id: transaction.id.clone(),
            payment_id: transaction.payment_id.clone(),
            description: transaction.description.clone(),
            amount: transaction.amount,
            transaction_type: payment_type_to_dto(transaction.transaction_type),
            category: transaction.category.clone(),
            date: format_date(transaction.date),
            status: match transaction.status {
                TransactionStatus::Pending => shared::TransactionStatus::Pending,
                TransactionStatus::Completed => shared::TransactionStatus::Completed,
                TransactionStatus::Cancelled => shared::TransactionStatus::Cancelled,
            },
            tags: transaction.tags.clone(),
            notes: transaction.notes.clone(),
            from_account_id: transaction.from_account_id.clone(),
            to_account_id: transaction.to_account_id.clone(),
            transfer_fee: transaction.transfer_fee,
            transfer_group_id: transaction.transfer_group_id.clone(),
        }
    }
}
