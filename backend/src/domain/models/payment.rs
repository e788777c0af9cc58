//! Domain model for a recurring payment template.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::recurrence::RecurrenceRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Income,
    Expense,
    Transfer,
}

impl PaymentType {
    /// Convert to string for CSV storage
    pub fn to_storage_str(&self) -> &'static str {
        match self {
            PaymentType::Income => "income",
            PaymentType::Expense => "expense",
            PaymentType::Transfer => "transfer",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_storage_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "income" => Ok(PaymentType::Income),
            "expense" => Ok(PaymentType::Expense),
            "transfer" => Ok(PaymentType::Transfer),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Active,
    Paused,
    Completed,
}

impl PaymentStatus {
    /// Active and Paused swap freely; Completed is terminal.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        match self {
            PaymentStatus::Completed => false,
            PaymentStatus::Active | PaymentStatus::Paused => *self != next,
        }
    }
}

/// Account references for a payment. Income and expense payments move
/// money through a single account; transfers name a distinct debit and
/// credit account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentAccounts {
    Single { account_id: String },
    Transfer {
        from_account_id: String,
        to_account_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Always positive; direction comes from `payment_type`.
    pub amount: f64,
    pub payment_type: PaymentType,
    pub category: String,
    pub accounts: PaymentAccounts,
    pub start_date: NaiveDate,
    /// Hard stop for materialization, inclusive.
    pub end_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    /// Manual payments need explicit confirmation before completing.
    pub is_manual: bool,
    pub rule: RecurrenceRule,
    pub created_at: String,
    pub updated_at: String,
}

impl Payment {
    /// Generate a unique payment ID.
    /// Format: payment::<timestamp_ms>::<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("payment::{}::{}", timestamp_ms, Self::generate_random_suffix(4))
    }

    fn generate_random_suffix(len: usize) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("{:x}", now % (16_u128.pow(len as u32)))
            .chars()
            .take(len)
            .collect()
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PaymentValidationError {
    #[error("Name must be between 1 and 256 characters")]
    InvalidName,
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Amount is too large")]
    AmountTooLarge,
    #[error("Income and expense payments require an account")]
    MissingAccount,
    #[error("Transfer payments require both a from and a to account")]
    MissingTransferAccounts,
    #[error("Transfer payments require distinct from and to accounts")]
    SameTransferAccounts,
    #[error("End date cannot be before the start date")]
    EndDateBeforeStart,
    #[error("Cannot transition payment status from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

impl Payment {
    /// Structural validation of the template fields. Rule validation
    /// happens when the rule is built from wire input.
    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if self.name.is_empty() || self.name.len() > 256 {
            return Err(PaymentValidationError::InvalidName);
        }
        if self.amount <= 0.0 {
            return Err(PaymentValidationError::NonPositiveAmount);
        }
        if self.amount > 1_000_000_000.0 {
            return Err(PaymentValidationError::AmountTooLarge);
        }
        match (&self.payment_type, &self.accounts) {
            (PaymentType::Transfer, PaymentAccounts::Transfer { from_account_id, to_account_id }) => {
                if from_account_id == to_account_id {
                    return Err(PaymentValidationError::SameTransferAccounts);
                }
            }
            (PaymentType::Transfer, PaymentAccounts::Single { .. }) => {
                return Err(PaymentValidationError::MissingTransferAccounts);
            }
            (_, PaymentAccounts::Transfer { .. }) => {
                return Err(PaymentValidationError::MissingAccount);
            }
            (_, PaymentAccounts::Single { .. }) => {}
        }
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(PaymentValidationError::EndDateBeforeStart);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::recurrence::{EndCondition, RecurrencePattern};

    fn sample_payment() -> Payment {
        Payment {
            id: Payment::generate_id(1700000000000),
            name: "Rent".to_string(),
            description: None,
            amount: 1200.0,
            payment_type: PaymentType::Expense,
            category: "Housing".to_string(),
            accounts: PaymentAccounts::Single {
                account_id: "acct-1".to_string(),
            },
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            status: PaymentStatus::Active,
            is_manual: false,
            rule: RecurrenceRule::new(
                RecurrencePattern::Monthly {
                    month_step: 1,
                    anchor: crate::domain::models::recurrence::MonthlyAnchor::DayOfMonth(1),
                },
                EndCondition::Never,
            )
            .unwrap(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_generate_id_format() {
        let id = Payment::generate_id(1234567890);
        let parts: Vec<&str> = id.split("::").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "payment");
        assert_eq!(parts[1], "1234567890");
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_status_transitions() {
        assert!(PaymentStatus::Active.can_transition_to(PaymentStatus::Paused));
        assert!(PaymentStatus::Paused.can_transition_to(PaymentStatus::Active));
        assert!(PaymentStatus::Active.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Paused.can_transition_to(PaymentStatus::Completed));
        // Completed is terminal.
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Active));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Paused));
        // Self-transitions are not transitions.
        assert!(!PaymentStatus::Active.can_transition_to(PaymentStatus::Active));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_payment().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut p = sample_payment();
        p.name = String::new();
        assert_eq!(p.validate(), Err(PaymentValidationError::InvalidName));

        let mut p = sample_payment();
        p.amount = 0.0;
        assert_eq!(p.validate(), Err(PaymentValidationError::NonPositiveAmount));

        let mut p = sample_payment();
        p.end_date = Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(p.validate(), Err(PaymentValidationError::EndDateBeforeStart));
    }

    #[test]
    fn test_validate_transfer_accounts() {
        let mut p = sample_payment();
        p.payment_type = PaymentType::Transfer;
        assert_eq!(
            p.validate(),
            Err(PaymentValidationError::MissingTransferAccounts)
        );

        p.accounts = PaymentAccounts::Transfer {
            from_account_id: "acct-1".to_string(),
            to_account_id: "acct-1".to_string(),
        };
        assert_eq!(p.validate(), Err(PaymentValidationError::SameTransferAccounts));

        p.accounts = PaymentAccounts::Transfer {
            from_account_id: "acct-1".to_string(),
            to_account_id: "acct-2".to_string(),
        };
        assert!(p.validate().is_ok());
    }
}
