// --- File: crates/hallbook_store/src/models.rs ---

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hallbook_pricing::{DiscountKind, Window};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of the rental price itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
    Comped,
}

/// Damage-deposit authorization state.
///
/// This engine drives only `Pending -> Authorized`; capture and release are
/// later administrative processes, and `Expired` mirrors the payment
/// provider's own hold lifetime elapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Unset,
    Pending,
    Authorized,
    Captured,
    Released,
    Expired,
}

impl DepositStatus {
    /// States from which the automatic authorization may still run.
    pub fn awaiting_authorization(self) -> bool {
        matches!(self, DepositStatus::Unset | DepositStatus::Pending)
    }
}

/// Booking lifecycle status. Bookings are never physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

/// Damage-deposit sub-state carried on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DepositState {
    pub amount_cents: i64,
    /// Saved payment method reference to reuse for the deferred hold.
    pub payment_method: Option<String>,
    /// Provider reference for the placed hold, once authorized.
    pub authorization_id: Option<String>,
    pub status: DepositStatus,
}

impl DepositState {
    pub fn new(amount_cents: i64, payment_method: Option<String>) -> Self {
        Self {
            amount_cents,
            payment_method,
            authorization_id: None,
            status: DepositStatus::Unset,
        }
    }
}

/// The canonical booking record.
///
/// The scheduled window is stored as wall-clock values in the venue's civil
/// zone; instants are derived on demand so every pass re-anchors the same
/// way. The calendar is authoritative for the window, this record follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Booking {
    pub id: Uuid,
    /// Stable human-readable reference, e.g. "HB-9F3A2C".
    pub reference: String,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,

    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,

    pub price_cents: i64,
    pub payment_reference: Option<String>,
    pub payment_status: PaymentStatus,

    pub deposit: DepositState,

    pub calendar_event_id: Option<String>,

    /// Monotonic idempotence guards; reset only by an explicit reschedule.
    pub reminder_sent: bool,
    pub followup_sent: bool,

    pub status: BookingStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// The booking's occupancy window as the one shared window type.
    pub fn window(&self) -> Window {
        Window {
            date: self.event_date,
            start: self.start_time,
            end_date: self.end_date,
            end: self.end_time,
        }
    }

    pub fn set_window(&mut self, window: Window) {
        self.event_date = window.date;
        self.start_time = window.start;
        self.end_date = window.end_date;
        self.end_time = window.end;
    }
}

/// An externally owned discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DiscountCode {
    pub code: String,
    pub kind: DiscountKind,
    /// Percent (0-100) or cents depending on `kind`; ignored for Full.
    pub value: i64,
    pub remaining_uses: u32,
}
