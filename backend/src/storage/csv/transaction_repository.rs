//! # Transaction Repository
//!
//! Stores materialized transactions in a single CSV file
//! (`transactions.csv`). The whole file is read, modified in memory
//! and atomically replaced; the data volumes here are one household's
//! bookkeeping, not a ledger service.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;

use super::connection::CsvConnection;
use crate::domain::models::payment::PaymentType;
use crate::domain::models::transaction::{Transaction as DomainTransaction, TransactionStatus};
use crate::storage::traits::TransactionStorage;

const HEADER: [&str; 14] = [
    "id",
    "payment_id",
    "date",
    "description",
    "amount",
    "type",
    "category",
    "status",
    "tags",
    "notes",
    "from_account_id",
    "to_account_id",
    "transfer_fee",
    "transfer_group_id",
];

#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_transactions(&self) -> Result<Vec<DomainTransaction>> {
        let file_path = self.connection.get_transactions_file_path();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut transactions = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            transactions.push(Self::parse_record(&record)?);
        }
        Ok(transactions)
    }

    fn parse_record(record: &csv::StringRecord) -> Result<DomainTransaction> {
        let field = |index: usize| record.get(index).unwrap_or("");
        let optional = |index: usize| {
            let value = field(index);
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        let id = field(0).to_string();
        let date = NaiveDate::parse_from_str(field(2), "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid date '{}' in transaction {}: {}", field(2), id, e))?;
        let amount = field(4)
            .parse::<f64>()
            .map_err(|e| anyhow!("Invalid amount '{}' in transaction {}: {}", field(4), id, e))?;
        let transaction_type =
            PaymentType::from_storage_str(field(5)).map_err(|e| anyhow!("{} in transaction {}", e, id))?;
        let status = TransactionStatus::from_storage_str(field(7))
            .map_err(|e| anyhow!("{} in transaction {}", e, id))?;
        let tags: Vec<String> = field(8)
            .split('|')
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();
        let transfer_fee = match field(12) {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|e| {
                anyhow!("Invalid transfer fee '{}' in transaction {}: {}", raw, id, e)
            })?),
        };

        Ok(DomainTransaction {
            id,
            payment_id: optional(1),
            date,
            description: field(3).to_string(),
            amount,
            transaction_type,
            category: field(6).to_string(),
            status,
            tags,
            notes: optional(9),
            from_account_id: optional(10),
            to_account_id: optional(11),
            transfer_fee,
            transfer_group_id: optional(13),
        })
    }

    fn write_transactions(&self, transactions: &[DomainTransaction]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(HEADER)?;
        for transaction in transactions {
            csv_writer.write_record(&[
                transaction.id.clone(),
                transaction.payment_id.clone().unwrap_or_default(),
                transaction.date.format("%Y-%m-%d").to_string(),
                transaction.description.clone(),
                transaction.amount.to_string(),
                transaction.transaction_type.to_storage_str().to_string(),
                transaction.category.clone(),
                transaction.status.to_storage_str().to_string(),
                transaction.tags.join("|"),
                transaction.notes.clone().unwrap_or_default(),
                transaction.from_account_id.clone().unwrap_or_default(),
                transaction.to_account_id.clone().unwrap_or_default(),
                transaction
                    .transfer_fee
                    .map(|fee| fee.to_string())
                    .unwrap_or_default(),
                transaction.transfer_group_id.clone().unwrap_or_default(),
            ])?;
        }
        let content = csv_writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e))?;
        let file_path = self.connection.get_transactions_file_path();
        self.connection.write_atomically(&file_path, &content)?;
        Ok(())
    }
}

impl TransactionStorage for TransactionRepository {
    fn store_transactions(&self, new_transactions: &[DomainTransaction]) -> Result<()> {
        if new_transactions.is_empty() {
            return Ok(());
        }
        let mut transactions = self.read_transactions()?;
        let existing: HashSet<String> = transactions.iter().map(|t| t.id.clone()).collect();
        for transaction in new_transactions {
            if existing.contains(&transaction.id) {
                return Err(anyhow!("Transaction already exists: {}", transaction.id));
            }
            transactions.push(transaction.clone());
        }
        transactions.sort_by_key(|t| (t.date, t.id.clone()));
        self.write_transactions(&transactions)?;
        info!("Stored {} new transactions", new_transactions.len());
        Ok(())
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<DomainTransaction>> {
        let transactions = self.read_transactions()?;
        Ok(transactions.into_iter().find(|t| t.id == transaction_id))
    }

    fn list_transactions(&self) -> Result<Vec<DomainTransaction>> {
        self.read_transactions()
    }

    fn list_transactions_for_payment(&self, payment_id: &str) -> Result<Vec<DomainTransaction>> {
        let transactions = self.read_transactions()?;
        Ok(transactions
            .into_iter()
            .filter(|t| t.payment_id.as_deref() == Some(payment_id))
            .collect())
    }

    fn list_materialized_dates(&self, payment_id: &str) -> Result<HashSet<NaiveDate>> {
        // Cancelled occurrences stay in the set: re-materializing a
        // window must not resurrect a cancelled transaction.
        Ok(self
            .list_transactions_for_payment(payment_id)?
            .into_iter()
            .map(|t| t.date)
            .collect())
    }

    fn update_transaction(&self, transaction: &DomainTransaction) -> Result<()> {
        let mut transactions = self.read_transactions()?;
        match transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(existing) => *existing = transaction.clone(),
            None => {
                return Err(anyhow!("Transaction not found: {}", transaction.id));
            }
        }
        self.write_transactions(&transactions)?;
        Ok(())
    }

    fn delete_transaction(&self, transaction_id: &str) -> Result<bool> {
        let mut transactions = self.read_transactions()?;
        let before = transactions.len();
        transactions.retain(|t| t.id != transaction_id);
        if transactions.len() == before {
            warn!("No transaction found to delete: {}", transaction_id);
            return Ok(false);
        }
        self.write_transactions(&transactions)?;
        Ok(true)
    }
}
