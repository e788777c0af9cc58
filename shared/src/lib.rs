use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a recurring payment repeats.
///
/// `BI_WEEKLY`, `QUARTERLY`, `SEMI_ANNUALLY` and `ANNUALLY` are
/// shorthands the form offers; the backend folds them into weekly or
/// monthly cadences with a wider step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnually => "semi-annually",
            Frequency::Annually => "annually",
        };
        write!(f, "{}", name)
    }
}

/// Which occurrence of a weekday inside a month a monthly rule anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndConditionKind {
    Never,
    OnDate,
    AfterOccurrences,
}

/// Recurrence rule as collected by the payment form.
///
/// This is the loose wire shape: every frequency-specific field is
/// optional and only the ones matching `frequency` are consulted. The
/// backend validates the combination and rejects contradictory input
/// with a field-level error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRuleInput {
    pub frequency: Frequency,
    /// Multiplier on the frequency's base period; defaults to 1.
    pub interval: Option<u32>,
    /// Weekday indices (0 = Sunday .. 6 = Saturday) for weekly-family rules.
    pub days_of_week: Option<Vec<u8>>,
    /// Day of month (1-31, clamped to short months) for monthly-family rules.
    pub day_of_month: Option<u8>,
    /// Nth-weekday anchor, used together with `day_of_week`.
    pub week_of_month: Option<WeekOfMonth>,
    /// Weekday index for the nth-weekday anchor (0 = Sunday).
    pub day_of_week: Option<u8>,
    pub end_condition: EndConditionKind,
    /// End date (YYYY-MM-DD), required when `end_condition` is `ON_DATE`.
    pub end_date: Option<String>,
    /// Occurrence cap, required when `end_condition` is `AFTER_OCCURRENCES`.
    pub occurrence_count: Option<u32>,
}

/// Payment direction for rendering and account resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Active,
    Paused,
    Completed,
}

/// A recurring payment as presented to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Always positive; the payment type carries the direction.
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    /// Source/target account for income and expense payments.
    pub account_id: Option<String>,
    /// Debit account for transfer payments.
    pub from_account_id: Option<String>,
    /// Credit account for transfer payments.
    pub to_account_id: Option<String>,
    /// First day the rule applies (YYYY-MM-DD).
    pub start_date: String,
    /// Hard stop for materialization (YYYY-MM-DD).
    pub end_date: Option<String>,
    pub status: PaymentStatus,
    /// Manual payments need explicit confirmation before completing.
    pub is_manual: bool,
    pub rule: RecurrenceRuleInput,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

/// A materialized transaction as presented to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Originating payment, if this transaction was materialized from one.
    pub payment_id: Option<String>,
    pub description: String,
    /// Signed amount: income positive, expense negative.
    pub amount: f64,
    pub transaction_type: PaymentType,
    pub category: String,
    /// Occurrence date (YYYY-MM-DD).
    pub date: String,
    pub status: TransactionStatus,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub transfer_fee: Option<f64>,
    /// Links the debit and credit legs of one transfer occurrence.
    pub transfer_group_id: Option<String>,
}

/// Request to create a recurring payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub account_id: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    /// First day the rule applies (YYYY-MM-DD).
    pub start_date: String,
    /// Optional hard stop (YYYY-MM-DD).
    pub end_date: Option<String>,
    pub is_manual: bool,
    pub rule: RecurrenceRuleInput,
}

/// Request for the upcoming-occurrences preview shown in the payment dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingOccurrencesRequest {
    pub payment_id: String,
    /// Window start (YYYY-MM-DD).
    pub from: String,
    /// Window end, inclusive (YYYY-MM-DD).
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingOccurrencesResponse {
    pub payment_id: String,
    /// Occurrence dates in ascending order (YYYY-MM-DD).
    pub dates: Vec<String>,
}

/// Per-payment outcome of a materialization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedPaymentSummary {
    pub payment_id: String,
    pub payment_name: String,
    /// Number of transactions newly created in this pass.
    pub created: u32,
    /// Number of occurrences skipped because they were already materialized.
    pub skipped: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializeResponse {
    pub summaries: Vec<MaterializedPaymentSummary>,
    pub total_created: u32,
}
