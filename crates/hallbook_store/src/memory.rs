// --- File: crates/hallbook_store/src/memory.rs ---
//! In-memory booking store.
//!
//! Reference implementation of the repository traits backed by a
//! `tokio::sync::RwLock`. The conditional-update semantics here are the
//! contract any persistent backend has to honour: the compare step and the
//! write happen under one write lock, so a CAS miss is always reported,
//! never silently overwritten.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use hallbook_pricing::Window;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Booking, BookingStatus, DepositStatus, DiscountCode, PaymentStatus};
use crate::repository::{BookingRepository, DiscountRepository};

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_booking<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Booking) -> R,
    ) -> Result<R, StoreError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let result = f(booking);
        booking.updated_at = Utc::now();
        Ok(result)
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn create(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(StoreError::Conflict(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.reference == reference)
            .cloned())
    }

    async fn find_by_contact(&self, name: &str, email: &str) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.customer_name == name && b.customer_email == email)
            .cloned()
            .collect())
    }

    async fn list_by_status_in_range(
        &self,
        status: BookingStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.status == status && b.event_date >= from && b.event_date <= to)
            .cloned()
            .collect();
        matches.sort_by_key(|b| (b.event_date, b.start_time));
        Ok(matches)
    }

    async fn apply_window_change(&self, id: Uuid, window: Window) -> Result<Booking, StoreError> {
        self.with_booking(id, |b| {
            b.set_window(window);
            b.reminder_sent = false;
            b.followup_sent = false;
            b.clone()
        })
        .await
    }

    async fn mark_reminder_sent(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_booking(id, |b| {
            if b.reminder_sent {
                false
            } else {
                b.reminder_sent = true;
                true
            }
        })
        .await
    }

    async fn mark_followup_sent(&self, id: Uuid) -> Result<bool, StoreError> {
        self.with_booking(id, |b| {
            if b.followup_sent {
                false
            } else {
                b.followup_sent = true;
                true
            }
        })
        .await
    }

    async fn transition_deposit(
        &self,
        id: Uuid,
        from: &[DepositStatus],
        to: DepositStatus,
        authorization_id: Option<String>,
    ) -> Result<bool, StoreError> {
        self.with_booking(id, |b| {
            if !from.contains(&b.deposit.status) {
                return false;
            }
            b.deposit.status = to;
            b.deposit.authorization_id = authorization_id;
            true
        })
        .await
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> Result<(), StoreError> {
        self.with_booking(id, |b| b.status = status).await
    }

    async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<(), StoreError> {
        self.with_booking(id, |b| b.payment_status = status).await
    }

    async fn set_calendar_event(
        &self,
        id: Uuid,
        event_id: Option<String>,
    ) -> Result<(), StoreError> {
        self.with_booking(id, |b| b.calendar_event_id = event_id)
            .await
    }
}

#[derive(Default)]
pub struct InMemoryDiscountStore {
    codes: RwLock<HashMap<String, DiscountCode>>,
}

impl InMemoryDiscountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscountRepository for InMemoryDiscountStore {
    async fn get(&self, code: &str) -> Result<Option<DiscountCode>, StoreError> {
        Ok(self.codes.read().await.get(code).cloned())
    }

    async fn redeem(&self, code: &str, observed_remaining: u32) -> Result<bool, StoreError> {
        let mut codes = self.codes.write().await;
        let entry = codes
            .get_mut(code)
            .ok_or_else(|| StoreError::DiscountNotFound(code.to_string()))?;
        if entry.remaining_uses == 0 || entry.remaining_uses != observed_remaining {
            return Ok(false);
        }
        entry.remaining_uses -= 1;
        Ok(true)
    }

    async fn upsert(&self, code: DiscountCode) -> Result<(), StoreError> {
        self.codes.write().await.insert(code.code.clone(), code);
        Ok(())
    }
}
