//! # WAIS Backend
//!
//! Recurring-payment engine for a personal finance app: payment
//! templates with recurrence rules, occurrence enumeration over a date
//! window, and idempotent materialization into ledger transactions.
//!
//! [`Backend`] wires the domain services to file-backed storage and is
//! the single entry point a frontend talks to.

pub mod domain;
pub mod storage;

use std::path::Path;

use anyhow::Result;
use log::info;

use domain::{MaterializationService, PaymentService};
use storage::csv::{CsvConnection, PaymentRepository, TransactionRepository};

/// All services, wired to one storage directory.
pub struct Backend {
    pub payment_service: PaymentService<PaymentRepository>,
    pub materialization_service: MaterializationService<PaymentRepository, TransactionRepository>,
}

impl Backend {
    /// Initialize the backend with file-backed storage rooted at
    /// `base_directory` (created if missing).
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let connection = CsvConnection::new(base_directory)?;
        info!(
            "Backend storage initialized at {:?}",
            connection.base_directory()
        );

        let payment_repository = PaymentRepository::new(connection.clone());
        let transaction_repository = TransactionRepository::new(connection);

        Ok(Self {
            payment_service: PaymentService::new(payment_repository.clone()),
            materialization_service: MaterializationService::new(
                payment_repository,
                transaction_repository,
            ),
        })
    }
}
