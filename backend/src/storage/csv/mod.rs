//! File-backed storage: YAML for payment templates, CSV for the
//! materialized transaction ledger.

pub mod connection;
pub mod payment_repository;
pub mod transaction_repository;

pub use connection::CsvConnection;
pub use payment_repository::PaymentRepository;
pub use transaction_repository::TransactionRepository;
