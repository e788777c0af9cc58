//! # Payment Repository
//!
//! Stores recurring payment templates in a single YAML document
//! (`payments.yaml`). Writes are atomic: serialize to a temp file,
//! then rename over the live file.

use anyhow::Result;
use log::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::payment::Payment as DomainPayment;
use crate::storage::traits::PaymentStorage;

#[derive(Clone)]
pub struct PaymentRepository {
    connection: CsvConnection,
}

impl PaymentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_payments(&self) -> Result<Vec<DomainPayment>> {
        let path = self.connection.get_payments_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let payments: Vec<DomainPayment> = serde_yaml::from_str(&content)?;
        Ok(payments)
    }

    fn write_payments(&self, payments: &[DomainPayment]) -> Result<()> {
        let path = self.connection.get_payments_file_path();
        let yaml_content = serde_yaml::to_string(payments)?;
        self.connection
            .write_atomically(&path, yaml_content.as_bytes())?;
        debug!("Saved {} payments to {:?}", payments.len(), path);
        Ok(())
    }
}

impl PaymentStorage for PaymentRepository {
    fn store_payment(&self, payment: &DomainPayment) -> Result<()> {
        let mut payments = self.read_payments()?;
        if payments.iter().any(|p| p.id == payment.id) {
            return Err(anyhow::anyhow!("Payment already exists: {}", payment.id));
        }
        payments.push(payment.clone());
        self.write_payments(&payments)?;
        info!("Stored payment: {} ({})", payment.name, payment.id);
        Ok(())
    }

    fn get_payment(&self, payment_id: &str) -> Result<Option<DomainPayment>> {
        let payments = self.read_payments()?;
        Ok(payments.into_iter().find(|p| p.id == payment_id))
    }

    fn list_payments(&self) -> Result<Vec<DomainPayment>> {
        let mut payments = self.read_payments()?;
        payments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(payments)
    }

    fn update_payment(&self, payment: &DomainPayment) -> Result<()> {
        let mut payments = self.read_payments()?;
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => *existing = payment.clone(),
            None => {
                return Err(anyhow::anyhow!("Payment not found: {}", payment.id));
            }
        }
        self.write_payments(&payments)?;
        info!("Updated payment: {} ({})", payment.name, payment.id);
        Ok(())
    }

    fn delete_payment(&self, payment_id: &str) -> Result<bool> {
        let mut payments = self.read_payments()?;
        let before = payments.len();
        payments.retain(|p| p.id != payment_id);
        if payments.len() == before {
            warn!("No payment found to delete: {}", payment_id);
            return Ok(false);
        }
        self.write_payments(&payments)?;
        info!("Deleted payment: {}", payment_id);
        Ok(true)
    }
}
