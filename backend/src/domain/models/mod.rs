pub mod payment;
pub mod recurrence;
pub mod transaction;
