// --- File: crates/hallbook_deposit/src/lib.rs ---
//! Deferred damage-deposit authorization against Stripe.

pub mod error;
pub mod logic;
pub mod service;

pub use error::DepositError;
pub use logic::{authorize_deposit, DepositOutcome};
pub use service::StripePaymentService;
