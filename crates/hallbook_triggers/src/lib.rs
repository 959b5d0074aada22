// --- File: crates/hallbook_triggers/src/lib.rs ---
//! Temporal trigger evaluation: reminders, follow-ups and the deferred
//! deposit hold, all driven by externally scheduled ticks.

pub mod engine;
#[cfg(test)]
mod engine_test;
pub mod handlers;
pub mod routes;

pub use engine::{TriggerEngine, TriggerError, TriggerSummary};
