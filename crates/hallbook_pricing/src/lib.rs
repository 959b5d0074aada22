// --- File: crates/hallbook_pricing/src/lib.rs ---
//! Pricing & time-window calculator.
//!
//! Pure and deterministic: booking attributes in, price and canonical
//! local window out. This is the single definition of "price" and "window"
//! in the workspace; checkout, availability checking and reconciliation all
//! call into here rather than re-deriving either.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Error Handling ---
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PricingError {
    #[error("Hourly bookings must be between 1 and 7 hours, got {0}")]
    DurationOutOfRange(i64),
    #[error("Hourly bookings require a start time")]
    MissingStartTime,
    #[error("Hourly bookings require a duration")]
    MissingDuration,
}

// --- Data Structures ---

/// Booking mode selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    Hourly,
    FullDay,
}

/// A venue-local [start, end) occupancy interval, persisted as wall-clock
/// values. The venue's civil zone is re-applied identically on every pass,
/// so absolute instants are always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Window {
    pub date: NaiveDate,
    pub start: NaiveTime,
    /// Equal to `date` unless the booking rolls past midnight.
    pub end_date: NaiveDate,
    pub end: NaiveTime,
}

impl Window {
    /// Absolute start instant in the venue's zone.
    pub fn start_in(&self, tz: Tz) -> DateTime<Tz> {
        resolve_local(tz, self.date.and_time(self.start))
    }

    /// Absolute end instant in the venue's zone.
    pub fn end_in(&self, tz: Tz) -> DateTime<Tz> {
        resolve_local(tz, self.end_date.and_time(self.end))
    }
}

/// Resolves a wall-clock value in a zone, tolerating DST folds and gaps.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Spring-forward gap: the wall-clock value does not exist, take the
        // first valid instant an hour later.
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => tz.from_utc_datetime(&naive),
        },
    }
}

/// Price and canonical window for a proposed booking.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Quote {
    /// Price in minor units (cents).
    pub price_cents: i64,
    pub window: Window,
}

// --- Pricing Constants ---

/// Fixed full-day window start, 08:00 local.
pub fn full_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("static time")
}

/// Fixed full-day window end, 23:00 local.
pub fn full_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 0, 0).expect("static time")
}

const FULL_DAY_WEEKEND_CENTS: i64 = 90_000;
const FULL_DAY_WEEKDAY_CENTS: i64 = 75_000;
const HOURLY_WEEKEND_CENTS: i64 = 10_000;
const HOURLY_WEEKDAY_CENTS: i64 = 5_000;

pub const MIN_HOURLY_DURATION: i64 = 1;
pub const MAX_HOURLY_DURATION: i64 = 7;

/// Weekend rates apply on Friday, Saturday and Sunday by local civil date.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(
        date.weekday(),
        Weekday::Fri | Weekday::Sat | Weekday::Sun
    )
}

// --- Core Logic ---

/// Computes price and canonical window for a proposed booking.
///
/// Full-day mode fixes the window to 08:00-23:00 and ignores any supplied
/// start time. Hourly mode computes end = start + duration; a booking that
/// crosses midnight ends on the *next* calendar date rather than wrapping
/// the time-of-day.
pub fn quote(
    date: NaiveDate,
    mode: BookingMode,
    duration_hours: Option<i64>,
    start: Option<NaiveTime>,
) -> Result<Quote, PricingError> {
    let weekend = is_weekend(date);
    match mode {
        BookingMode::FullDay => Ok(Quote {
            price_cents: if weekend {
                FULL_DAY_WEEKEND_CENTS
            } else {
                FULL_DAY_WEEKDAY_CENTS
            },
            window: Window {
                date,
                start: full_day_start(),
                end_date: date,
                end: full_day_end(),
            },
        }),
        BookingMode::Hourly => {
            let duration = duration_hours.ok_or(PricingError::MissingDuration)?;
            if !(MIN_HOURLY_DURATION..=MAX_HOURLY_DURATION).contains(&duration) {
                return Err(PricingError::DurationOutOfRange(duration));
            }
            let start = start.ok_or(PricingError::MissingStartTime)?;

            let start_dt = date.and_time(start);
            let end_dt = start_dt + Duration::hours(duration);

            let rate = if weekend {
                HOURLY_WEEKEND_CENTS
            } else {
                HOURLY_WEEKDAY_CENTS
            };
            Ok(Quote {
                price_cents: duration * rate,
                window: Window {
                    date,
                    start,
                    end_date: end_dt.date(),
                    end: end_dt.time(),
                },
            })
        }
    }
}

// --- Discounts ---

/// How a discount code reduces the quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage off, value in whole percent (0-100).
    Percent,
    /// Fixed amount off, value in cents.
    Fixed,
    /// Price reduced to zero regardless of value.
    Full,
}

/// Applies a discount to a price in cents; never goes below zero.
pub fn apply_discount(price_cents: i64, kind: DiscountKind, value: i64) -> i64 {
    let discounted = match kind {
        DiscountKind::Percent => price_cents - price_cents * value.clamp(0, 100) / 100,
        DiscountKind::Fixed => price_cents - value,
        DiscountKind::Full => 0,
    };
    discounted.max(0)
}

#[cfg(test)]
mod tests;
#[cfg(test)]
mod proptests;
