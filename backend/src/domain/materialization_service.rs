//! # Materialization Service
//!
//! Turns the recurrence templates into concrete ledger transactions
//! for a date window, and drives the draft lifecycle for manual
//! payments (confirm / cancel).
//!
//! Materialization is idempotent per (payment, date): the repository
//! reports which dates already have a transaction and those
//! occurrences are skipped, so running overlapping windows is safe.

use anyhow::{anyhow, Result};
use log::info;

use crate::domain::commands::payments::{
    CancelTransactionCommand, CancelTransactionResult, ConfirmTransactionCommand,
    ConfirmTransactionResult, MaterializeWindowCommand, MaterializeWindowResult,
    PaymentMaterializationSummary,
};
use crate::domain::materializer::materialize_payment;
use crate::domain::models::payment::PaymentStatus;
use crate::domain::models::transaction::{Transaction, TransactionStatus};
use crate::domain::recurrence::enumerate_payment_occurrences;
use crate::storage::traits::{PaymentStorage, TransactionStorage};

#[derive(Clone)]
pub struct MaterializationService<P: PaymentStorage, T: TransactionStorage> {
    payment_storage: P,
    transaction_storage: T,
}

impl<P: PaymentStorage, T: TransactionStorage> MaterializationService<P, T> {
    pub fn new(payment_storage: P, transaction_storage: T) -> Self {
        Self {
            payment_storage,
            transaction_storage,
        }
    }

    /// Materialize every active payment's occurrences inside the
    /// window, skipping dates that already have a transaction.
    pub fn materialize_window(
        &self,
        command: MaterializeWindowCommand,
    ) -> Result<MaterializeWindowResult> {
        let mut summaries = Vec::new();
        let mut total_created = 0u32;

        for payment in self.payment_storage.list_payments()? {
            if payment.status != PaymentStatus::Active {
                continue;
            }

            let already_materialized = self
                .transaction_storage
                .list_materialized_dates(&payment.id)?;
            let occurrences =
                enumerate_payment_occurrences(&payment, command.window_from, command.window_to);
            let skipped = occurrences
                .iter()
                .filter(|date| already_materialized.contains(date))
                .count() as u32;

            let drafts = materialize_payment(
                &payment,
                command.window_from,
                command.window_to,
                &already_materialized,
            );
            let created = drafts.len() as u32;
            if !drafts.is_empty() {
                self.transaction_storage.store_transactions(&drafts)?;
            }

            total_created += created;
            summaries.push(PaymentMaterializationSummary {
                payment_id: payment.id,
                payment_name: payment.name,
                created,
                skipped,
            });
        }

        info!(
            "Materialized window {}..{}: {} transactions created across {} payments",
            command.window_from,
            command.window_to,
            total_created,
            summaries.len()
        );
        Ok(MaterializeWindowResult {
            summaries,
            total_created,
        })
    }

    /// Confirm a pending draft, marking it completed.
    pub fn confirm_transaction(
        &self,
        command: ConfirmTransactionCommand,
    ) -> Result<ConfirmTransactionResult> {
        let mut transaction = self.require_transaction(&command.transaction_id)?;
        if transaction.status != TransactionStatus::Pending {
            return Err(anyhow!(
                "Only pending transactions can be confirmed; {} is {:?}",
                transaction.id,
                transaction.status
            ));
        }
        transaction.status = TransactionStatus::Completed;
        self.transaction_storage.update_transaction(&transaction)?;
        info!("Confirmed transaction {}", transaction.id);
        Ok(ConfirmTransactionResult { transaction })
    }

    /// Cancel a transaction. The row is kept (and its date stays in
    /// the materialized set), so the occurrence will not be recreated
    /// by a later materialization pass.
    pub fn cancel_transaction(
        &self,
        command: CancelTransactionCommand,
    ) -> Result<CancelTransactionResult> {
        let mut transaction = self.require_transaction(&command.transaction_id)?;
        if transaction.status == TransactionStatus::Cancelled {
            return Err(anyhow!("Transaction already cancelled: {}", transaction.id));
        }
        transaction.status = TransactionStatus::Cancelled;
        self.transaction_storage.update_transaction(&transaction)?;
        info!("Cancelled transaction {}", transaction.id);
        Ok(CancelTransactionResult { transaction })
    }

    fn require_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.transaction_storage
            .get_transaction(transaction_id)?
            .ok_or_else(|| anyhow!("Transaction not found: {}", transaction_id))
    }
}
