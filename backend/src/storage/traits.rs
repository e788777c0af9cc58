//! # Storage Traits
//!
//! Storage abstraction for the domain layer: repositories implement
//! these traits so the services never depend on a concrete file or
//! database format.

use anyhow::Result;
use chrono::NaiveDate;
use std::collections::HashSet;

use crate::domain::models::payment::Payment as DomainPayment;
use crate::domain::models::transaction::Transaction as DomainTransaction;

/// Interface for recurring-payment template storage.
pub trait PaymentStorage: Send + Sync {
    /// Store a new payment
    fn store_payment(&self, payment: &DomainPayment) -> Result<()>;

    /// Retrieve a specific payment by ID
    fn get_payment(&self, payment_id: &str) -> Result<Option<DomainPayment>>;

    /// List all payments ordered by name
    fn list_payments(&self) -> Result<Vec<DomainPayment>>;

    /// Update an existing payment
    fn update_payment(&self, payment: &DomainPayment) -> Result<()>;

    /// Delete a payment by ID
    /// Returns true if the payment was found and deleted, false otherwise
    fn delete_payment(&self, payment_id: &str) -> Result<bool>;
}

/// Interface for materialized-transaction storage.
pub trait TransactionStorage: Send + Sync {
    /// Store a batch of new transactions
    fn store_transactions(&self, transactions: &[DomainTransaction]) -> Result<()>;

    /// Retrieve a specific transaction by ID
    fn get_transaction(&self, transaction_id: &str) -> Result<Option<DomainTransaction>>;

    /// List all transactions ordered by date ascending
    fn list_transactions(&self) -> Result<Vec<DomainTransaction>>;

    /// List the transactions materialized from a specific payment
    fn list_transactions_for_payment(&self, payment_id: &str) -> Result<Vec<DomainTransaction>>;

    /// The occurrence dates already materialized for a payment.
    /// Feeds the materializer's idempotence check.
    fn list_materialized_dates(&self, payment_id: &str) -> Result<HashSet<NaiveDate>>;

    /// Update an existing transaction
    fn update_transaction(&self, transaction: &DomainTransaction) -> Result<()>;

    /// Delete a transaction by ID
    /// Returns true if the transaction was found and deleted, false otherwise
    fn delete_transaction(&self, transaction_id: &str) -> Result<bool>;
}
