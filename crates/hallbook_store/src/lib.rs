// --- File: crates/hallbook_store/src/lib.rs ---
//! The canonical booking record and its repositories.
//!
//! The store is deliberately dumb: it persists bookings and exposes the
//! conditional updates the reconciliation and trigger engines rely on for
//! idempotence. All scheduling intelligence lives in the engines.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;

pub use error::StoreError;
pub use memory::{InMemoryBookingStore, InMemoryDiscountStore};
pub use models::{
    Booking, BookingStatus, DepositState, DepositStatus, DiscountCode, PaymentStatus,
};
pub use repository::{BookingRepository, DiscountRepository};
