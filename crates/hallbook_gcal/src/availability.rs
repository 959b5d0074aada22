// --- File: crates/hallbook_gcal/src/availability.rs ---
//! Window availability against the calendar, which is the single source of
//! truth for schedule conflicts.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use hallbook_common::services::{BookedEvent, BoxedError, CalendarService};
use hallbook_pricing::{resolve_local, Window};

use crate::error::GcalError;

/// The outcome of an availability check.
#[derive(Debug, Clone)]
pub struct AvailabilityReport {
    pub available: bool,
    pub conflicts: Vec<BookedEvent>,
}

/// Interpret an event time string as an instant.
///
/// Zoned values are RFC3339; floating values are naive wall-clock and get
/// anchored in the venue's zone.
pub fn parse_event_time(value: &str, tz: Tz) -> Result<DateTime<Utc>, GcalError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| GcalError::TimeParseError(format!("{}: {}", value, e)))?;
    Ok(resolve_local(tz, naive).with_timezone(&Utc))
}

/// Check whether a requested window is free on the calendar.
///
/// Windows are half-open: an event ending exactly when the request starts,
/// or starting exactly when it ends, is not a conflict.
pub async fn check_window_available(
    calendar: &dyn CalendarService<Error = BoxedError>,
    calendar_id: &str,
    window: &Window,
    tz: Tz,
) -> Result<AvailabilityReport, GcalError> {
    let start = window.start_in(tz).with_timezone(&Utc);
    let end = window.end_in(tz).with_timezone(&Utc);

    let events = calendar
        .list_events(calendar_id, start, end)
        .await
        .map_err(|e| GcalError::ServiceError(e.to_string()))?;

    let mut conflicts = Vec::new();
    for event in events {
        let event_start = match parse_event_time(&event.start_time, tz) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping event {} in availability check: {}", event.event_id, e);
                continue;
            }
        };
        let event_end = match parse_event_time(&event.end_time, tz) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping event {} in availability check: {}", event.event_id, e);
                continue;
            }
        };

        if event_start < end && event_end > start {
            conflicts.push(event);
        }
    }

    Ok(AvailabilityReport {
        available: conflicts.is_empty(),
        conflicts,
    })
}
