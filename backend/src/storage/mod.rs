//! Storage layer.
//!
//! Domain services depend only on the traits in [`traits`]; the
//! file-backed implementations live in [`csv`].

pub mod csv;
pub mod traits;

pub use csv::{CsvConnection, PaymentRepository, TransactionRepository};
pub use traits::{PaymentStorage, TransactionStorage};
