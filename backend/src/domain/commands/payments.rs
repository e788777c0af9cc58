//! Command and query types for the payment and materialization services.

use chrono::NaiveDate;

use crate::domain::models::payment::{Payment, PaymentStatus, PaymentType};
use crate::domain::models::transaction::Transaction;

#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub account_id: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_manual: bool,
    /// Loose form input; validated into the domain rule by the service.
    pub rule: shared::RecurrenceRuleInput,
}

#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub payment: Payment,
}

#[derive(Debug, Clone)]
pub struct UpdatePaymentCommand {
    pub payment_id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_manual: bool,
    pub rule: shared::RecurrenceRuleInput,
}

#[derive(Debug, Clone)]
pub struct UpdatePaymentResult {
    pub payment: Payment,
}

#[derive(Debug, Clone)]
pub struct SetPaymentStatusCommand {
    pub payment_id: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone)]
pub struct SetPaymentStatusResult {
    pub payment: Payment,
}

#[derive(Debug, Clone)]
pub struct DeletePaymentCommand {
    pub payment_id: String,
}

#[derive(Debug, Clone)]
pub struct DeletePaymentResult {
    pub deleted: bool,
}

#[derive(Debug, Clone)]
pub struct GetPaymentQuery {
    pub payment_id: String,
}

#[derive(Debug, Clone)]
pub struct GetPaymentResult {
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone)]
pub struct PaymentListQuery {
    /// Restrict to payments with this status; `None` lists everything.
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Clone)]
pub struct PaymentListResult {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone)]
pub struct UpcomingOccurrencesQuery {
    pub payment_id: String,
    pub window_from: NaiveDate,
    pub window_to: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct UpcomingOccurrencesResult {
    pub payment_id: String,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct MaterializeWindowCommand {
    pub window_from: NaiveDate,
    pub window_to: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct PaymentMaterializationSummary {
    pub payment_id: String,
    pub payment_name: String,
    /// Transactions newly created in this pass.
    pub created: u32,
    /// Occurrences skipped because they were already materialized.
    pub skipped: u32,
}

#[derive(Debug, Clone)]
pub struct MaterializeWindowResult {
    pub summaries: Vec<PaymentMaterializationSummary>,
    pub total_created: u32,
}

#[derive(Debug, Clone)]
pub struct ConfirmTransactionCommand {
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmTransactionResult {
    pub transaction: Transaction,
}

#[derive(Debug, Clone)]
pub struct CancelTransactionCommand {
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct CancelTransactionResult {
    pub transaction: Transaction,
}
