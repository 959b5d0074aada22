// --- File: crates/hallbook_booking/src/lib.rs ---
//! Checkout, availability and cancellation flows.

pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use error::BookingError;
pub use logic::{BookingEngine, CheckoutRequest, CheckoutResponse};
