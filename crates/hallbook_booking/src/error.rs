// --- File: crates/hallbook_booking/src/error.rs ---
use hallbook_common::{external_service_error, HallbookError, HttpStatusCode};
use hallbook_pricing::PricingError;
use hallbook_store::StoreError;
use thiserror::Error;

/// Checkout and cancellation error types.
#[derive(Error, Debug)]
pub enum BookingError {
    /// Request failed validation
    #[error("Invalid booking request: {0}")]
    ValidationError(String),

    /// Pricing rejected the requested mode/duration combination
    #[error(transparent)]
    PricingError(#[from] PricingError),

    /// The discount code does not exist
    #[error("Unknown discount code")]
    UnknownDiscount,

    /// The discount code has no uses left
    #[error("Discount code exhausted")]
    DiscountExhausted,

    /// Lost the redemption race repeatedly
    #[error("Discount code is contended, retry the request")]
    DiscountContended,

    /// The calendar shows the requested window as taken
    #[error("Requested window is not available")]
    Unavailable,

    /// Error from the booking store
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error talking to the calendar
    #[error("Calendar error: {0}")]
    CalendarError(String),

    /// No booking under the given reference
    #[error("Booking not found: {0}")]
    NotFound(String),
}

impl From<BookingError> for HallbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ValidationError(msg) => HallbookError::ValidationError(msg),
            BookingError::PricingError(e) => HallbookError::ValidationError(e.to_string()),
            BookingError::UnknownDiscount => {
                HallbookError::NotFoundError("Unknown discount code".to_string())
            }
            BookingError::DiscountExhausted => {
                HallbookError::ConflictError("Discount code exhausted".to_string())
            }
            BookingError::DiscountContended => {
                HallbookError::ConflictError("Discount code is contended".to_string())
            }
            BookingError::Unavailable => {
                HallbookError::ConflictError("Requested window is not available".to_string())
            }
            BookingError::StoreError(e) => HallbookError::StoreError(e.to_string()),
            BookingError::CalendarError(msg) => external_service_error("Google Calendar", msg),
            BookingError::NotFound(msg) => HallbookError::NotFoundError(msg),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::ValidationError(_) => 400,
            BookingError::PricingError(_) => 400,
            BookingError::UnknownDiscount => 404,
            BookingError::DiscountExhausted => 409,
            BookingError::DiscountContended => 409,
            BookingError::Unavailable => 409,
            BookingError::StoreError(_) => 500,
            BookingError::CalendarError(_) => 502,
            BookingError::NotFound(_) => 404,
        }
    }
}
