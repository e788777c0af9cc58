//! Domain model for a materialized transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::payment::PaymentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    /// Convert to string for CSV storage
    pub fn to_storage_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_storage_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// Which half of a transfer a leg represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLeg {
    Debit,
    Credit,
}

impl TransferLeg {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferLeg::Debit => "debit",
            TransferLeg::Credit => "credit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Originating payment. A weak reference: deleting the payment
    /// leaves historical transactions in place.
    pub payment_id: Option<String>,
    pub description: String,
    /// Signed amount: income positive, expense negative.
    pub amount: f64,
    pub transaction_type: PaymentType,
    pub category: String,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub transfer_fee: Option<f64>,
    /// Shared by the debit and credit legs of one transfer occurrence.
    pub transfer_group_id: Option<String>,
}

impl Transaction {
    /// Deterministic ID for a transaction materialized from a payment
    /// occurrence. Format: tx::<payment_id>::<date>
    ///
    /// Re-running materialization for the same occurrence regenerates
    /// the same ID, so duplicate drafts are impossible by construction.
    pub fn materialized_id(payment_id: &str, date: NaiveDate) -> String {
        format!("tx::{}::{}", payment_id, date.format("%Y-%m-%d"))
    }

    /// Deterministic ID for one leg of a materialized transfer.
    /// Format: tx::<payment_id>::<date>::<debit|credit>
    pub fn transfer_leg_id(payment_id: &str, date: NaiveDate, leg: TransferLeg) -> String {
        format!(
            "tx::{}::{}::{}",
            payment_id,
            date.format("%Y-%m-%d"),
            leg.as_str()
        )
    }

    /// Deterministic group ID linking the two legs of one transfer
    /// occurrence. Format: transfer::<payment_id>::<date>
    pub fn transfer_group_id(payment_id: &str, date: NaiveDate) -> String {
        format!("transfer::{}::{}", payment_id, date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_materialized_id_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let a = Transaction::materialized_id("payment::1::ab", date);
        let b = Transaction::materialized_id("payment::1::ab", date);
        assert_eq!(a, b);
        assert_eq!(a, "tx::payment::1::ab::2024-03-15");
    }

    #[test]
    fn test_transfer_leg_ids_differ_per_leg() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let debit = Transaction::transfer_leg_id("p1", date, TransferLeg::Debit);
        let credit = Transaction::transfer_leg_id("p1", date, TransferLeg::Credit);
        assert_ne!(debit, credit);
        assert!(debit.ends_with("::debit"));
        assert!(credit.ends_with("::credit"));
    }

    #[test]
    fn test_transfer_group_id_shared_across_legs() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            Transaction::transfer_group_id("p1", date),
            "transfer::p1::2024-03-15"
        );
    }
}
