// --- File: crates/hallbook_gcal/src/reconcile.rs ---
//! Calendar-to-store reconciliation.
//!
//! The calendar is authoritative for the scheduled window. Each pass reads
//! events over a sliding horizon, locates the booking each event describes,
//! and overwrites the stored window when they disagree. A window change
//! resets both notification flags, demotes an authorized deposit back to
//! pending, and revokes access codes issued for the old date; the temporal
//! trigger pass re-derives everything from the new window.
//!
//! Passes are re-entrant: with no calendar drift a pass performs zero
//! writes, and overlapping passes converge on the same state.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use hallbook_access::AccessCodeManager;
use hallbook_common::services::{BookedEvent, BoxedError, CalendarService};
use hallbook_pricing::Window;
use hallbook_store::{Booking, BookingRepository, BookingStatus, DepositStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::availability::parse_event_time;
use crate::error::GcalError;
use crate::parser::EventMetadataParser;

/// Sliding reconciliation horizon, relative to "now".
const LOOKBACK_DAYS: i64 = 30;
const LOOKAHEAD_DAYS: i64 = 90;

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReconcileSummary {
    /// Events matched to a confirmed booking and evaluated.
    pub processed: u32,
    /// Bookings whose stored window was rewritten.
    pub updated: u32,
    /// Events with no usable metadata, no unique match, or a non-active
    /// booking.
    pub skipped: u32,
    /// Events whose evaluation errored; the pass continues past them.
    pub failed: u32,
}

enum Outcome {
    Updated,
    Unchanged,
    Skipped,
}

pub struct CalendarReconciler {
    calendar: Arc<dyn CalendarService<Error = BoxedError>>,
    store: Arc<dyn BookingRepository>,
    access: Option<Arc<AccessCodeManager>>,
    parser: Arc<dyn EventMetadataParser>,
    calendar_id: String,
    tz: Tz,
}

impl CalendarReconciler {
    pub fn new(
        calendar: Arc<dyn CalendarService<Error = BoxedError>>,
        store: Arc<dyn BookingRepository>,
        access: Option<Arc<AccessCodeManager>>,
        parser: Arc<dyn EventMetadataParser>,
        calendar_id: String,
        tz: Tz,
    ) -> Self {
        Self {
            calendar,
            store,
            access,
            parser,
            calendar_id,
            tz,
        }
    }

    /// Run one full reconciliation pass over the horizon around `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReconcileSummary, GcalError> {
        let time_min = now - Duration::days(LOOKBACK_DAYS);
        let time_max = now + Duration::days(LOOKAHEAD_DAYS);

        let events = self
            .calendar
            .list_events(&self.calendar_id, time_min, time_max)
            .await
            .map_err(|e| GcalError::ServiceError(e.to_string()))?;

        let mut summary = ReconcileSummary::default();
        for event in events {
            match self.reconcile_event(&event).await {
                Ok(Outcome::Updated) => {
                    summary.processed += 1;
                    summary.updated += 1;
                }
                Ok(Outcome::Unchanged) => summary.processed += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!("Reconciliation of event {} failed: {}", event.event_id, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Reconciliation pass: {} processed, {} updated, {} skipped, {} failed",
            summary.processed, summary.updated, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn reconcile_event(&self, event: &BookedEvent) -> Result<Outcome, GcalError> {
        let Some(meta) = self.parser.parse(event) else {
            debug!(
                "Event {} carries no booking metadata, leaving it alone",
                event.event_id
            );
            return Ok(Outcome::Skipped);
        };

        let Some(booking) = self.locate_booking(&meta, &event.event_id).await? else {
            return Ok(Outcome::Skipped);
        };

        if booking.status != BookingStatus::Confirmed {
            debug!(
                "Booking {} is {:?}, not reconciling event {}",
                booking.reference, booking.status, event.event_id
            );
            return Ok(Outcome::Skipped);
        }

        let event_window = self.event_window(event)?;
        let stored_window = booking.window();
        if event_window == stored_window {
            return Ok(Outcome::Unchanged);
        }

        let old_date = stored_window.date;
        info!(
            "Booking {} window moved on the calendar: {} {} - {} {} becomes {} {} - {} {}",
            booking.reference,
            stored_window.date,
            stored_window.start,
            stored_window.end_date,
            stored_window.end,
            event_window.date,
            event_window.start,
            event_window.end_date,
            event_window.end
        );

        self.store
            .apply_window_change(booking.id, event_window)
            .await?;

        // A hold placed for the old date no longer lines up; demote it so
        // the trigger pass re-authorizes against the new window. No-op if
        // the deposit was never authorized.
        let demoted = self
            .store
            .transition_deposit(booking.id, &[DepositStatus::Authorized], DepositStatus::Pending, None)
            .await?;
        if demoted {
            info!(
                "Deposit for booking {} demoted to pending after reschedule",
                booking.reference
            );
        }

        // Entry codes are keyed by customer and date; codes for the old
        // date stay on the lock otherwise.
        if let Some(access) = &self.access {
            if let Err(e) = access.revoke(&booking.customer_name, old_date).await {
                warn!(
                    "Failed to revoke access codes for rescheduled booking {}: {}",
                    booking.reference, e
                );
            }
        }

        Ok(Outcome::Updated)
    }

    /// Locate the booking an event describes: stable reference first, then
    /// the contact identity pair. Ambiguity is skipped, never guessed at.
    async fn locate_booking(
        &self,
        meta: &crate::parser::EventBookingMetadata,
        event_id: &str,
    ) -> Result<Option<Booking>, GcalError> {
        if let Some(reference) = &meta.booking_reference {
            if let Some(booking) = self.store.find_by_reference(reference).await? {
                return Ok(Some(booking));
            }
            debug!(
                "Event {} references unknown booking {}, falling back to contact match",
                event_id, reference
            );
        }

        let (Some(name), Some(email)) = (&meta.contact_name, &meta.contact_email) else {
            debug!("Event {} has no contact identity to match on", event_id);
            return Ok(None);
        };

        let candidates = self.store.find_by_contact(name, email).await?;
        match candidates.len() {
            0 => {
                debug!("Event {} matches no booking", event_id);
                Ok(None)
            }
            1 => Ok(candidates.into_iter().next()),
            n => {
                warn!(
                    "Event {} matches {} bookings for {} <{}>, skipping",
                    event_id, n, name, email
                );
                Ok(None)
            }
        }
    }

    /// The event's window as venue-local wall clock, re-anchored through the
    /// venue zone so stored values stay comparable across DST edges.
    fn event_window(&self, event: &BookedEvent) -> Result<Window, GcalError> {
        let start = parse_event_time(&event.start_time, self.tz)?
            .with_timezone(&self.tz)
            .naive_local();
        let end = parse_event_time(&event.end_time, self.tz)?
            .with_timezone(&self.tz)
            .naive_local();

        Ok(Window {
            date: start.date(),
            start: start.time(),
            end_date: end.date(),
            end: end.time(),
        })
    }
}
