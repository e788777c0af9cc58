//! Domain layer: recurrence model, calendar math, materialization and
//! the services that tie them to storage.

pub mod calendar;
pub mod commands;
pub mod mappers;
pub mod materialization_service;
pub mod materializer;
pub mod models;
pub mod payment_service;
pub mod recurrence;

pub use materialization_service::MaterializationService;
pub use payment_service::PaymentService;
