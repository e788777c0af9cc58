//! Materialization of payment occurrences into transaction drafts.
//!
//! Pure functions only: the caller supplies the set of dates that are
//! already materialized and persists whatever comes back. Running the
//! same window twice therefore creates nothing new the second time.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::models::payment::{Payment, PaymentAccounts, PaymentType};
use crate::domain::models::transaction::{Transaction, TransactionStatus, TransferLeg};
use crate::domain::recurrence::enumerate_payment_occurrences;

/// Produce transaction drafts for every occurrence of `payment` inside
/// the window that is not already materialized.
///
/// Manual payments yield `Pending` drafts awaiting confirmation;
/// automatic payments yield `Completed` drafts. A transfer occurrence
/// always yields exactly two legs sharing one transfer group, never a
/// single leg.
pub fn materialize_payment(
    payment: &Payment,
    window_from: NaiveDate,
    window_to: NaiveDate,
    already_materialized: &HashSet<NaiveDate>,
) -> Vec<Transaction> {
    let mut drafts = Vec::new();
    for date in enumerate_payment_occurrences(payment, window_from, window_to) {
        if already_materialized.contains(&date) {
            continue;
        }
        match payment.payment_type {
            PaymentType::Transfer => {
                let (debit, credit) = build_transfer_legs(payment, date);
                drafts.push(debit);
                drafts.push(credit);
            }
            PaymentType::Income | PaymentType::Expense => {
                drafts.push(build_single_draft(payment, date));
            }
        }
    }
    drafts
}

fn draft_status(payment: &Payment) -> TransactionStatus {
    if payment.is_manual {
        TransactionStatus::Pending
    } else {
        TransactionStatus::Completed
    }
}

fn draft_description(payment: &Payment) -> String {
    payment
        .description
        .clone()
        .unwrap_or_else(|| payment.name.clone())
}

fn build_single_draft(payment: &Payment, date: NaiveDate) -> Transaction {
    let account_id = match &payment.accounts {
        PaymentAccounts::Single { account_id } => Some(account_id.clone()),
        // Unreachable for validated payments; keep the draft well-formed anyway.
        PaymentAccounts::Transfer { from_account_id, .. } => Some(from_account_id.clone()),
    };
    let amount = match payment.payment_type {
        PaymentType::Income => payment.amount,
        _ => -payment.amount,
    };
    Transaction {
        id: Transaction::materialized_id(&payment.id, date),
        payment_id: Some(payment.id.clone()),
        description: draft_description(payment),
        amount,
        transaction_type: payment.payment_type,
        category: payment.category.clone(),
        date,
        status: draft_status(payment),
        tags: Vec::new(),
        notes: None,
        from_account_id: account_id.clone(),
        to_account_id: None,
        transfer_fee: None,
        transfer_group_id: None,
    }
}

fn build_transfer_legs(payment: &Payment, date: NaiveDate) -> (Transaction, Transaction) {
    let (from_account_id, to_account_id) = match &payment.accounts {
        PaymentAccounts::Transfer {
            from_account_id,
            to_account_id,
        } => (from_account_id.clone(), to_account_id.clone()),
        PaymentAccounts::Single { account_id } => (account_id.clone(), account_id.clone()),
    };
    let group_id = Transaction::transfer_group_id(&payment.id, date);
    let base = Transaction {
        id: String::new(),
        payment_id: Some(payment.id.clone()),
        description: draft_description(payment),
        amount: 0.0,
        transaction_type: PaymentType::Transfer,
        category: payment.category.clone(),
        date,
        status: draft_status(payment),
        tags: Vec::new(),
        notes: None,
        from_account_id: Some(from_account_id),
        to_account_id: Some(to_account_id),
        transfer_fee: None,
        transfer_group_id: Some(group_id),
    };
    let debit = Transaction {
        id: Transaction::transfer_leg_id(&payment.id, date, TransferLeg::Debit),
        amount: -payment.amount,
        ..base.clone()
    };
    let credit = Transaction {
        id: Transaction::transfer_leg_id(&payment.id, date, TransferLeg::Credit),
        amount: payment.amount,
        ..base
    };
    (debit, credit)
}
