// --- File: crates/hallbook_booking/src/logic.rs ---
//! Checkout, availability and cancellation.
//!
//! Checkout is quote -> availability gate -> discount -> persist ->
//! calendar event -> (maybe) eager deposit hold. The calendar event is
//! written with structured metadata so the reconciliation engine can find
//! the booking again after any manual edit.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use hallbook_access::AccessCodeManager;
use hallbook_common::services::{BoxedError, CalendarService, PaymentService};
use hallbook_config::AppConfig;
use hallbook_deposit::authorize_deposit;
use hallbook_gcal::availability::check_window_available;
use hallbook_gcal::parser::{render_event, EventBookingMetadata};
use hallbook_pricing::{apply_discount, quote, BookingMode, Window};
use hallbook_store::{
    Booking, BookingRepository, BookingStatus, DepositState, DepositStatus, DiscountRepository,
    PaymentStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::BookingError;

/// Attempts before giving up on a contended discount code.
const REDEEM_RETRIES: usize = 3;

/// Checkout request from the frontend.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,

    pub event_date: NaiveDate,
    pub mode: BookingMode,
    /// Required for hourly mode, ignored for full-day.
    pub start_time: Option<NaiveTime>,
    /// Required for hourly mode, ignored for full-day.
    pub duration_hours: Option<i64>,

    pub discount_code: Option<String>,
    /// Saved payment method reference for the deferred deposit hold.
    pub payment_method: Option<String>,

    pub event_type: Option<String>,
    pub attendee_count: Option<u32>,
    pub organization: Option<String>,
    pub special_requirements: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckoutResponse {
    pub reference: String,
    pub price_cents: i64,
    pub window: Window,
    pub payment_status: PaymentStatus,
    pub deposit_status: DepositStatus,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub available: bool,
    pub price_cents: i64,
    pub window: Window,
    /// Summaries of the calendar events blocking the window, if any.
    pub conflicts: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelResponse {
    pub reference: String,
    pub status: BookingStatus,
    pub access_codes_revoked: u32,
}

pub struct BookingEngine {
    store: Arc<dyn BookingRepository>,
    discounts: Arc<dyn DiscountRepository>,
    calendar: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
    payments: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
    access: Option<Arc<AccessCodeManager>>,
    config: Arc<AppConfig>,
    tz: Tz,
}

impl BookingEngine {
    pub fn new(
        store: Arc<dyn BookingRepository>,
        discounts: Arc<dyn DiscountRepository>,
        calendar: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
        payments: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
        access: Option<Arc<AccessCodeManager>>,
        config: Arc<AppConfig>,
    ) -> Self {
        let tz = config.venue.tz();
        Self {
            store,
            discounts,
            calendar,
            payments,
            access,
            config,
            tz,
        }
    }

    fn calendar_id(&self) -> Option<&str> {
        self.config
            .gcal
            .as_ref()
            .and_then(|g| g.calendar_id.as_deref())
    }

    fn deposit_amount_cents(&self) -> i64 {
        self.config
            .deposit
            .as_ref()
            .map(|d| d.amount_cents)
            .unwrap_or(50_000)
    }

    fn currency(&self) -> String {
        self.config
            .deposit
            .as_ref()
            .and_then(|d| d.currency.clone())
            .unwrap_or_else(|| "chf".to_string())
    }

    fn authorize_days_before(&self) -> i64 {
        self.config
            .deposit
            .as_ref()
            .map(|d| d.authorize_days_before)
            .unwrap_or(3)
    }

    fn new_reference(&self) -> String {
        let tail: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect::<String>()
            .to_uppercase();
        format!("{}-{}", self.config.venue.reference_prefix, tail)
    }

    fn validate(&self, req: &CheckoutRequest, now: DateTime<Utc>) -> Result<(), BookingError> {
        if req.customer_name.trim().is_empty() {
            return Err(BookingError::ValidationError(
                "customer_name is required".to_string(),
            ));
        }
        if !req.customer_email.contains('@') {
            return Err(BookingError::ValidationError(
                "customer_email is not a valid address".to_string(),
            ));
        }
        let today = now.with_timezone(&self.tz).date_naive();
        if req.event_date < today {
            return Err(BookingError::ValidationError(
                "event_date is in the past".to_string(),
            ));
        }
        Ok(())
    }

    async fn redeem_discount(
        &self,
        code: &str,
        price_cents: i64,
    ) -> Result<i64, BookingError> {
        for _ in 0..REDEEM_RETRIES {
            let Some(discount) = self.discounts.get(code).await? else {
                return Err(BookingError::UnknownDiscount);
            };
            if discount.remaining_uses == 0 {
                return Err(BookingError::DiscountExhausted);
            }
            let discounted = apply_discount(price_cents, discount.kind, discount.value);
            if self.discounts.redeem(code, discount.remaining_uses).await? {
                info!(
                    "Discount '{}' redeemed, {} -> {} cents",
                    code, price_cents, discounted
                );
                return Ok(discounted);
            }
            // Someone redeemed concurrently; re-read and try again.
        }
        Err(BookingError::DiscountContended)
    }

    /// Summaries of calendar events blocking the window; empty means free.
    /// The degraded skip mode and a missing calendar both report free, the
    /// former loudly.
    async fn conflicting_events(&self, window: &Window) -> Result<Vec<String>, BookingError> {
        if self.config.booking.skip_availability_check {
            warn!("Availability check SKIPPED by configuration, booking optimistically");
            return Ok(Vec::new());
        }
        let (Some(calendar), Some(calendar_id)) = (&self.calendar, self.calendar_id()) else {
            warn!("No calendar configured, booking without an availability gate");
            return Ok(Vec::new());
        };

        let report = check_window_available(calendar.as_ref(), calendar_id, window, self.tz)
            .await
            .map_err(|e| BookingError::CalendarError(e.to_string()))?;
        Ok(report.conflicts.into_iter().map(|e| e.summary).collect())
    }

    async fn ensure_available(&self, window: &Window) -> Result<(), BookingError> {
        if self.conflicting_events(window).await?.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Unavailable)
        }
    }

    /// Quote without booking: same pricing and the same calendar gate.
    pub async fn availability(
        &self,
        date: NaiveDate,
        mode: BookingMode,
        duration_hours: Option<i64>,
        start_time: Option<NaiveTime>,
    ) -> Result<AvailabilityResponse, BookingError> {
        let quoted = quote(date, mode, duration_hours, start_time)?;
        let conflicts = self.conflicting_events(&quoted.window).await?;
        Ok(AvailabilityResponse {
            available: conflicts.is_empty(),
            price_cents: quoted.price_cents,
            window: quoted.window,
            conflicts,
        })
    }

    /// Run checkout for one booking request.
    pub async fn checkout(
        &self,
        req: CheckoutRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckoutResponse, BookingError> {
        self.validate(&req, now)?;

        let quoted = quote(req.event_date, req.mode, req.duration_hours, req.start_time)?;

        // The gate runs before redemption; a rejected checkout must not
        // consume a discount use.
        self.ensure_available(&quoted.window).await?;

        let price_cents = match &req.discount_code {
            Some(code) => self.redeem_discount(code, quoted.price_cents).await?,
            None => quoted.price_cents,
        };

        let payment_status = if price_cents == 0 {
            PaymentStatus::Comped
        } else {
            PaymentStatus::Pending
        };

        let reference = self.new_reference();
        let booking = Booking {
            id: Uuid::new_v4(),
            reference: reference.clone(),
            customer_name: req.customer_name.clone(),
            customer_email: req.customer_email.clone(),
            customer_phone: req.customer_phone.clone(),
            event_date: quoted.window.date,
            start_time: quoted.window.start,
            end_date: quoted.window.end_date,
            end_time: quoted.window.end,
            price_cents,
            payment_reference: None,
            payment_status,
            deposit: DepositState::new(self.deposit_amount_cents(), req.payment_method.clone()),
            calendar_event_id: None,
            reminder_sent: false,
            followup_sent: false,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        let booking = self.store.create(booking).await?;
        info!(
            "Booking {} created for {} on {}",
            booking.reference, booking.customer_name, booking.event_date
        );

        self.create_calendar_event(&booking, &req).await;
        self.maybe_eager_deposit(&booking, now).await;

        // Deposit state may have advanced above.
        let deposit_status = self
            .store
            .get(booking.id)
            .await?
            .map(|b| b.deposit.status)
            .unwrap_or(booking.deposit.status);

        Ok(CheckoutResponse {
            reference,
            price_cents,
            window: quoted.window,
            payment_status,
            deposit_status,
        })
    }

    /// Write the calendar event for a new booking. A failure here degrades
    /// to a booking without an event; the operator sync endpoint repairs
    /// the calendar later.
    async fn create_calendar_event(&self, booking: &Booking, req: &CheckoutRequest) {
        let (Some(calendar), Some(calendar_id)) = (&self.calendar, self.calendar_id()) else {
            return;
        };

        let meta = EventBookingMetadata {
            booking_reference: Some(booking.reference.clone()),
            event_type: req.event_type.clone(),
            contact_name: Some(booking.customer_name.clone()),
            contact_email: Some(booking.customer_email.clone()),
            contact_phone: booking.customer_phone.clone(),
            attendee_count: req.attendee_count,
            organization: req.organization.clone(),
            special_requirements: req.special_requirements.clone(),
        };
        let window = booking.window();
        let event = render_event(
            format!("Hall rental: {}", booking.customer_name),
            window.start_in(self.tz).with_timezone(&Utc).to_rfc3339(),
            window.end_in(self.tz).with_timezone(&Utc).to_rfc3339(),
            &meta,
        );

        match calendar.create_event(calendar_id, event).await {
            Ok(result) => {
                if let Err(e) = self
                    .store
                    .set_calendar_event(booking.id, result.event_id.clone())
                    .await
                {
                    warn!(
                        "Could not record calendar event for booking {}: {}",
                        booking.reference, e
                    );
                }
            }
            Err(e) => warn!(
                "Calendar event creation for booking {} failed: {}",
                booking.reference, e
            ),
        }
    }

    /// Bookings made inside the deposit lead time would otherwise never hit
    /// the exact-day trigger, so the hold is placed right away.
    async fn maybe_eager_deposit(&self, booking: &Booking, now: DateTime<Utc>) {
        let Some(payments) = &self.payments else {
            return;
        };
        if booking.deposit.payment_method.is_none() {
            return;
        }
        let today = now.with_timezone(&self.tz).date_naive();
        let days_until = (booking.event_date - today).num_days();
        if days_until > self.authorize_days_before() {
            return;
        }

        match authorize_deposit(
            self.store.as_ref(),
            payments.as_ref(),
            booking,
            &self.currency(),
        )
        .await
        {
            Ok(outcome) => info!(
                "Eager deposit authorization for booking {}: {:?}",
                booking.reference, outcome
            ),
            Err(e) => warn!(
                "Eager deposit authorization for booking {} failed: {}",
                booking.reference, e
            ),
        }
    }

    /// Cancel a booking: the record is kept, the calendar event is removed
    /// and any issued door codes are revoked. Idempotent.
    pub async fn cancel(&self, reference: &str) -> Result<CancelResponse, BookingError> {
        let booking = self
            .store
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| BookingError::NotFound(reference.to_string()))?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(CancelResponse {
                reference: booking.reference,
                status: BookingStatus::Cancelled,
                access_codes_revoked: 0,
            });
        }

        self.store
            .set_status(booking.id, BookingStatus::Cancelled)
            .await?;
        info!("Booking {} cancelled", booking.reference);

        if let (Some(calendar), Some(calendar_id), Some(event_id)) = (
            &self.calendar,
            self.calendar_id(),
            booking.calendar_event_id.as_deref(),
        ) {
            if let Err(e) = calendar.delete_event(calendar_id, event_id).await {
                warn!(
                    "Could not delete calendar event for cancelled booking {}: {}",
                    booking.reference, e
                );
            }
        }

        let mut revoked = 0;
        if let Some(access) = &self.access {
            match access
                .revoke(&booking.customer_name, booking.event_date)
                .await
            {
                Ok(n) => revoked = n,
                Err(e) => warn!(
                    "Could not revoke access codes for cancelled booking {}: {}",
                    booking.reference, e
                ),
            }
        }

        Ok(CancelResponse {
            reference: booking.reference,
            status: BookingStatus::Cancelled,
            access_codes_revoked: revoked,
        })
    }
}
