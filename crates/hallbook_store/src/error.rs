// --- File: crates/hallbook_store/src/error.rs ---
use thiserror::Error;

/// Booking-store specific error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Discount code not found: {0}")]
    DiscountNotFound(String),

    /// A conditional update observed state it did not expect. Callers that
    /// use the boolean CAS results never see this; it covers invariant
    /// violations such as mutating a cancelled booking's deposit.
    #[error("Conflicting state: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}
