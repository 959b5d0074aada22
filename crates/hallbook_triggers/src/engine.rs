// --- File: crates/hallbook_triggers/src/engine.rs ---
//! The temporal trigger pass.
//!
//! Each pass walks the confirmed bookings around today and evaluates three
//! independent rules against the venue-local clock:
//!
//! * reminder mail (plus door code) 24 to 48 hours before the start,
//! * follow-up mail 24 to 48 hours after the end,
//! * deposit hold exactly N local days before the event date.
//!
//! Every rule is guarded by a conditional store transition, so passes can
//! run as often as the scheduler likes. Notifications are dispatched before
//! their flag is set: a crash in between re-sends on the next pass, but a
//! booking is never silently skipped.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use hallbook_access::{AccessCodeManager, AccessError};
use hallbook_common::services::{BoxedError, NotificationService, PaymentService};
use hallbook_deposit::{authorize_deposit, DepositError, DepositOutcome};
use hallbook_notify::templates;
use hallbook_store::{Booking, BookingRepository, BookingStatus, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reminder fires this many hours before the start, at the earliest/latest.
const REMINDER_MIN_HOURS: i64 = 24;
const REMINDER_MAX_HOURS: i64 = 48;

/// Follow-up fires this many hours after the end.
const FOLLOWUP_MIN_HOURS: i64 = 24;
const FOLLOWUP_MAX_HOURS: i64 = 48;

/// Bookings examined per pass: event dates within today +/- this many days.
const HORIZON_DAYS: i64 = 7;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Deposit(#[from] DepositError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Notification error: {0}")]
    Notify(String),
}

/// Counters for one trigger pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TriggerSummary {
    pub examined: u32,
    pub reminders_sent: u32,
    pub followups_sent: u32,
    pub deposits_authorized: u32,
    /// Bookings where at least one rule errored; the pass continues.
    pub failed: u32,
}

pub struct TriggerEngine {
    store: Arc<dyn BookingRepository>,
    payments: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
    notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
    access: Option<Arc<AccessCodeManager>>,
    venue_name: String,
    currency: String,
    authorize_days_before: i64,
    tz: Tz,
}

impl TriggerEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn BookingRepository>,
        payments: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
        notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
        access: Option<Arc<AccessCodeManager>>,
        venue_name: String,
        currency: String,
        authorize_days_before: i64,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            payments,
            notifier,
            access,
            venue_name,
            currency,
            authorize_days_before,
            tz,
        }
    }

    /// Run one trigger pass anchored at `now`.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> Result<TriggerSummary, TriggerError> {
        let today = now.with_timezone(&self.tz).date_naive();
        let bookings = self
            .store
            .list_by_status_in_range(
                BookingStatus::Confirmed,
                today - Duration::days(HORIZON_DAYS),
                today + Duration::days(HORIZON_DAYS),
            )
            .await?;

        let mut summary = TriggerSummary::default();
        for booking in bookings {
            summary.examined += 1;
            let mut booking_failed = false;

            match self.maybe_remind(&booking, now).await {
                Ok(true) => summary.reminders_sent += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Reminder for booking {} failed: {}", booking.reference, e);
                    booking_failed = true;
                }
            }

            match self.maybe_follow_up(&booking, now).await {
                Ok(true) => summary.followups_sent += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Follow-up for booking {} failed: {}", booking.reference, e);
                    booking_failed = true;
                }
            }

            match self.maybe_authorize_deposit(&booking, now).await {
                Ok(true) => summary.deposits_authorized += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        "Deposit authorization for booking {} failed: {}",
                        booking.reference, e
                    );
                    booking_failed = true;
                }
            }

            if booking_failed {
                summary.failed += 1;
            }
        }

        info!(
            "Trigger pass: {} examined, {} reminders, {} follow-ups, {} deposits, {} failed",
            summary.examined,
            summary.reminders_sent,
            summary.followups_sent,
            summary.deposits_authorized,
            summary.failed
        );
        Ok(summary)
    }

    /// Reminder window: [start - 48h, start - 24h], venue-local anchoring.
    /// Issues the door code for the stay and sends the reminder carrying it.
    async fn maybe_remind(
        &self,
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> Result<bool, TriggerError> {
        if booking.reminder_sent {
            return Ok(false);
        }

        let start = booking.window().start_in(self.tz).with_timezone(&Utc);
        let until_start = start - now;
        if until_start < Duration::hours(REMINDER_MIN_HOURS)
            || until_start > Duration::hours(REMINDER_MAX_HOURS)
        {
            return Ok(false);
        }

        let code = match &self.access {
            Some(access) => access
                .issue(&booking.customer_name, booking.window())
                .await?
                .map(|c| c.code),
            None => None,
        };

        if let Some(notifier) = &self.notifier {
            let data = templates::reminder_data(booking, &self.venue_name, code.as_deref());
            notifier
                .send_templated(
                    templates::TEMPLATE_REMINDER,
                    &booking.customer_email,
                    data,
                )
                .await
                .map_err(|e| TriggerError::Notify(e.to_string()))?;
        } else {
            debug!(
                "No notifier configured, reminder for booking {} not mailed",
                booking.reference
            );
        }

        self.store.mark_reminder_sent(booking.id).await?;
        info!("Reminder handled for booking {}", booking.reference);
        Ok(true)
    }

    /// Follow-up window: [end + 24h, end + 48h].
    async fn maybe_follow_up(
        &self,
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> Result<bool, TriggerError> {
        if booking.followup_sent {
            return Ok(false);
        }

        let end = booking.window().end_in(self.tz).with_timezone(&Utc);
        let since_end = now - end;
        if since_end < Duration::hours(FOLLOWUP_MIN_HOURS)
            || since_end > Duration::hours(FOLLOWUP_MAX_HOURS)
        {
            return Ok(false);
        }

        if let Some(notifier) = &self.notifier {
            let data = templates::followup_data(booking, &self.venue_name);
            notifier
                .send_templated(
                    templates::TEMPLATE_FOLLOWUP,
                    &booking.customer_email,
                    data,
                )
                .await
                .map_err(|e| TriggerError::Notify(e.to_string()))?;
        } else {
            debug!(
                "No notifier configured, follow-up for booking {} not mailed",
                booking.reference
            );
        }

        self.store.mark_followup_sent(booking.id).await?;
        info!("Follow-up handled for booking {}", booking.reference);
        Ok(true)
    }

    /// The deposit hold is placed exactly N local days before the event
    /// date. Day arithmetic on civil dates, not instants, so the rule fires
    /// on the intended calendar day even across DST changes.
    async fn maybe_authorize_deposit(
        &self,
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> Result<bool, TriggerError> {
        if !booking.deposit.status.awaiting_authorization() {
            return Ok(false);
        }
        let Some(payments) = &self.payments else {
            return Ok(false);
        };

        let today = now.with_timezone(&self.tz).date_naive();
        let days_until = (booking.event_date - today).num_days();
        if days_until != self.authorize_days_before {
            return Ok(false);
        }

        let outcome = authorize_deposit(
            self.store.as_ref(),
            payments.as_ref(),
            booking,
            &self.currency,
        )
        .await?;

        match outcome {
            DepositOutcome::Authorized(_) => {
                // The confirmation mail is a courtesy; the hold stands
                // whether or not it goes out.
                if let Some(notifier) = &self.notifier {
                    let data = templates::deposit_authorized_data(
                        booking,
                        &self.venue_name,
                        &self.currency,
                    );
                    if let Err(e) = notifier
                        .send_templated(
                            templates::TEMPLATE_DEPOSIT_AUTHORIZED,
                            &booking.customer_email,
                            data,
                        )
                        .await
                    {
                        warn!(
                            "Deposit confirmation mail for booking {} failed: {}",
                            booking.reference, e
                        );
                    }
                }
                Ok(true)
            }
            DepositOutcome::Declined(status) => {
                warn!(
                    "Deposit for booking {} declined with status '{}'",
                    booking.reference, status
                );
                Ok(false)
            }
            DepositOutcome::Skipped => Ok(false),
        }
    }
}
