// --- File: crates/hallbook_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod availability;
pub mod error;
pub mod handlers;
pub mod parser;
#[cfg(test)]
mod parser_test;
pub mod reconcile;
pub mod routes;
pub mod service;
#[cfg(test)]
mod testutil;

pub use error::GcalError;
pub use reconcile::{CalendarReconciler, ReconcileSummary};
pub use service::GoogleCalendarService;
