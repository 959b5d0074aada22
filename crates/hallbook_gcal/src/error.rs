// --- File: crates/hallbook_gcal/src/error.rs ---
use hallbook_common::{external_service_error, HallbookError, HttpStatusCode};
use hallbook_store::StoreError;
use thiserror::Error;

/// Calendar-integration specific error types.
#[derive(Error, Debug)]
pub enum GcalError {
    /// Error returned by the Google Calendar API
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),

    /// An event carried a time value that could not be interpreted
    #[error("Failed to parse event time: {0}")]
    TimeParseError(String),

    /// Push notification arrived without the mandatory channel headers
    #[error("Invalid push notification: {0}")]
    InvalidChannel(String),

    /// Push notification carried a channel token we did not issue
    #[error("Push notification token mismatch")]
    Unauthorized,

    /// Missing or incomplete calendar configuration
    #[error("Calendar configuration error: {0}")]
    ConfigError(String),

    /// Error from the booking store
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error from the underlying calendar service
    #[error("Calendar service error: {0}")]
    ServiceError(String),
}

impl From<GcalError> for HallbookError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::ApiError(e) => external_service_error("Google Calendar", e.to_string()),
            GcalError::TimeParseError(msg) => HallbookError::ParseError(msg),
            GcalError::InvalidChannel(msg) => HallbookError::ValidationError(msg),
            GcalError::Unauthorized => {
                HallbookError::ValidationError("Push notification token mismatch".to_string())
            }
            GcalError::ConfigError(msg) => HallbookError::ConfigError(msg),
            GcalError::StoreError(e) => HallbookError::StoreError(e.to_string()),
            GcalError::ServiceError(msg) => external_service_error("Google Calendar", msg),
        }
    }
}

impl HttpStatusCode for GcalError {
    fn status_code(&self) -> u16 {
        match self {
            GcalError::ApiError(_) => 502,
            GcalError::TimeParseError(_) => 502,
            GcalError::InvalidChannel(_) => 400,
            GcalError::Unauthorized => 401,
            GcalError::ConfigError(_) => 500,
            GcalError::StoreError(_) => 500,
            GcalError::ServiceError(_) => 502,
        }
    }
}
