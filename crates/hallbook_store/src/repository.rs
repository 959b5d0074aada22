// --- File: crates/hallbook_store/src/repository.rs ---
//! Repository traits for the booking store.
//!
//! The engines never lock; every state transition is expressed as a
//! read-then-conditional-write so overlapping scheduler ticks cannot
//! corrupt a booking. Conditional operations return `Ok(false)` when the
//! expected prior state was not observed, which callers treat as "someone
//! else already did this".

use async_trait::async_trait;
use chrono::NaiveDate;
use hallbook_pricing::Window;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Booking, BookingStatus, DepositStatus, DiscountCode, PaymentStatus};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    async fn create(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, StoreError>;

    /// Fallback matching key for calendar events that carry no booking id.
    /// Exact match on both fields; may return several candidates.
    async fn find_by_contact(&self, name: &str, email: &str) -> Result<Vec<Booking>, StoreError>;

    /// Bookings in a given lifecycle status whose event date falls in
    /// [from, to] inclusive.
    async fn list_by_status_in_range(
        &self,
        status: BookingStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Apply a reconciled window: overwrite the stored window fields and
    /// reset both notification flags so the temporal engine re-evaluates
    /// from scratch against the new window.
    async fn apply_window_change(&self, id: Uuid, window: Window) -> Result<Booking, StoreError>;

    /// Set reminder-sent true iff it was false. Returns whether this call
    /// performed the transition.
    async fn mark_reminder_sent(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Set follow-up-sent true iff it was false.
    async fn mark_followup_sent(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Conditionally advance the deposit status: the transition happens only
    /// if the current status is one of `from`. `authorization_id` replaces
    /// the stored reference on success (None clears it).
    async fn transition_deposit(
        &self,
        id: Uuid,
        from: &[DepositStatus],
        to: DepositStatus,
        authorization_id: Option<String>,
    ) -> Result<bool, StoreError>;

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> Result<(), StoreError>;

    async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<(), StoreError>;

    async fn set_calendar_event(
        &self,
        id: Uuid,
        event_id: Option<String>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DiscountRepository: Send + Sync {
    async fn get(&self, code: &str) -> Result<Option<DiscountCode>, StoreError>;

    /// Consume one use of the code, conditioned on the previously observed
    /// remaining-uses value. Two simultaneous redemptions cannot both
    /// succeed past zero: exactly one observes the value it expected.
    async fn redeem(&self, code: &str, observed_remaining: u32) -> Result<bool, StoreError>;

    async fn upsert(&self, code: DiscountCode) -> Result<(), StoreError>;
}
