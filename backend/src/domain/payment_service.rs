//! # Payment Service
//!
//! CRUD and lifecycle management for recurring payment templates.
//! Validation happens here, before anything touches storage: the rule
//! input is compiled into a domain rule, the template fields are
//! checked, and status changes go through the transition table.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;

use crate::domain::commands::payments::{
    CreatePaymentCommand, CreatePaymentResult, DeletePaymentCommand, DeletePaymentResult,
    GetPaymentQuery, GetPaymentResult, PaymentListQuery, PaymentListResult,
    SetPaymentStatusCommand, SetPaymentStatusResult, UpcomingOccurrencesQuery,
    UpcomingOccurrencesResult, UpdatePaymentCommand, UpdatePaymentResult,
};
use crate::domain::mappers::RecurrenceRuleMapper;
use crate::domain::models::payment::{
    Payment, PaymentAccounts, PaymentStatus, PaymentType, PaymentValidationError,
};
use crate::domain::recurrence::enumerate_payment_occurrences;
use crate::storage::traits::PaymentStorage;

#[derive(Clone)]
pub struct PaymentService<P: PaymentStorage> {
    payment_storage: P,
}

impl<P: PaymentStorage> PaymentService<P> {
    pub fn new(payment_storage: P) -> Self {
        Self { payment_storage }
    }

    pub fn create_payment(&self, command: CreatePaymentCommand) -> Result<CreatePaymentResult> {
        let rule = RecurrenceRuleMapper::from_input(&command.rule)?;
        rule.validate_against_start(command.start_date)?;

        let accounts = Self::build_accounts(
            command.payment_type,
            command.account_id,
            command.from_account_id,
            command.to_account_id,
        )?;

        let now = Utc::now();
        let payment = Payment {
            id: Payment::generate_id(now.timestamp_millis() as u64),
            name: command.name,
            description: command.description,
            amount: command.amount,
            payment_type: command.payment_type,
            category: command.category,
            accounts,
            start_date: command.start_date,
            end_date: command.end_date,
            status: PaymentStatus::Active,
            is_manual: command.is_manual,
            rule,
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };
        payment.validate()?;

        self.payment_storage.store_payment(&payment)?;
        info!("Created payment '{}' ({})", payment.name, payment.id);
        Ok(CreatePaymentResult { payment })
    }

    pub fn update_payment(&self, command: UpdatePaymentCommand) -> Result<UpdatePaymentResult> {
        let mut payment = self.require_payment(&command.payment_id)?;

        // Completed is terminal: the template is frozen along with its
        // status, just as set_payment_status refuses to leave it.
        if payment.status == PaymentStatus::Completed {
            return Err(anyhow!(
                "Completed payments cannot be edited: {}",
                payment.id
            ));
        }

        let rule = RecurrenceRuleMapper::from_input(&command.rule)?;
        rule.validate_against_start(command.start_date)?;

        payment.name = command.name;
        payment.description = command.description;
        payment.amount = command.amount;
        payment.category = command.category;
        payment.start_date = command.start_date;
        payment.end_date = command.end_date;
        payment.is_manual = command.is_manual;
        payment.rule = rule;
        payment.updated_at = Utc::now().to_rfc3339();
        payment.validate()?;

        self.payment_storage.update_payment(&payment)?;
        info!("Updated payment '{}' ({})", payment.name, payment.id);
        Ok(UpdatePaymentResult { payment })
    }

    /// Move a payment through its lifecycle. Completed is terminal;
    /// Active and Paused convert freely between each other.
    pub fn set_payment_status(
        &self,
        command: SetPaymentStatusCommand,
    ) -> Result<SetPaymentStatusResult> {
        let mut payment = self.require_payment(&command.payment_id)?;

        if !payment.status.can_transition_to(command.status) {
            return Err(PaymentValidationError::InvalidStatusTransition {
                from: payment.status,
                to: command.status,
            }
            .into());
        }

        payment.status = command.status;
        payment.updated_at = Utc::now().to_rfc3339();
        self.payment_storage.update_payment(&payment)?;
        info!(
            "Payment {} is now {:?}",
            payment.id, payment.status
        );
        Ok(SetPaymentStatusResult { payment })
    }

    /// Delete a payment template. Transactions already materialized
    /// from it are kept; their `payment_id` becomes a dangling
    /// reference by design of the weak link.
    pub fn delete_payment(&self, command: DeletePaymentCommand) -> Result<DeletePaymentResult> {
        let deleted = self.payment_storage.delete_payment(&command.payment_id)?;
        if deleted {
            info!("Deleted payment {}", command.payment_id);
        }
        Ok(DeletePaymentResult { deleted })
    }

    pub fn get_payment(&self, query: GetPaymentQuery) -> Result<GetPaymentResult> {
        let payment = self.payment_storage.get_payment(&query.payment_id)?;
        Ok(GetPaymentResult { payment })
    }

    pub fn list_payments(&self, query: PaymentListQuery) -> Result<PaymentListResult> {
        let mut payments = self.payment_storage.list_payments()?;
        if let Some(status) = query.status {
            payments.retain(|p| p.status == status);
        }
        Ok(PaymentListResult { payments })
    }

    /// Preview the occurrence dates of one payment inside a window,
    /// without creating anything.
    pub fn upcoming_occurrences(
        &self,
        query: UpcomingOccurrencesQuery,
    ) -> Result<UpcomingOccurrencesResult> {
        let payment = self.require_payment(&query.payment_id)?;
        let dates = enumerate_payment_occurrences(&payment, query.window_from, query.window_to);
        Ok(UpcomingOccurrencesResult {
            payment_id: payment.id,
            dates,
        })
    }

    fn require_payment(&self, payment_id: &str) -> Result<Payment> {
        self.payment_storage
            .get_payment(payment_id)?
            .ok_or_else(|| anyhow!("Payment not found: {}", payment_id))
    }

    fn build_accounts(
        payment_type: PaymentType,
        account_id: Option<String>,
        from_account_id: Option<String>,
        to_account_id: Option<String>,
    ) -> Result<PaymentAccounts> {
        match payment_type {
            PaymentType::Transfer => match (from_account_id, to_account_id) {
                (Some(from), Some(to)) => Ok(PaymentAccounts::Transfer {
                    from_account_id: from,
                    to_account_id: to,
                }),
                _ => Err(PaymentValidationError::MissingTransferAccounts.into()),
            },
            PaymentType::Income | PaymentType::Expense => match account_id {
                Some(account_id) => Ok(PaymentAccounts::Single { account_id }),
                None => Err(PaymentValidationError::MissingAccount.into()),
            },
        }
    }
}
