// --- File: crates/hallbook_access/src/error.rs ---
use hallbook_common::{external_service_error, HallbookError, HttpStatusCode};
use thiserror::Error;

/// Access-control specific error types.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Error occurred during a lock API request
    #[error("Lock API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the lock API
    #[error("Lock API returned an error: {message} (Status: {status})")]
    ApiError { status: u16, message: String },

    /// Error parsing the lock API response
    #[error("Failed to parse lock API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing credential configuration (LOCK_API_TOKEN)
    #[error("Lock API credentials missing")]
    ConfigError,

    /// Could not derive a valid absolute validity interval
    #[error("Invalid code validity window: {0}")]
    InvalidWindow(String),

    /// Error from the underlying access-control service
    #[error("Access control service error: {0}")]
    ServiceError(String),
}

impl From<AccessError> for HallbookError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::RequestError(e) => HallbookError::HttpError(format!("Lock API: {}", e)),
            AccessError::ApiError { status, message } => {
                external_service_error("Lock API", format!("Status: {}, Message: {}", status, message))
            }
            AccessError::ParseError(e) => HallbookError::ParseError(e.to_string()),
            AccessError::ConfigError => {
                HallbookError::ConfigError("Lock API credentials missing".to_string())
            }
            AccessError::InvalidWindow(msg) => HallbookError::ValidationError(msg),
            AccessError::ServiceError(msg) => external_service_error("Access control", msg),
        }
    }
}

impl HttpStatusCode for AccessError {
    fn status_code(&self) -> u16 {
        match self {
            AccessError::RequestError(_) => 500,
            AccessError::ApiError { status, .. } => *status,
            AccessError::ParseError(_) => 502,
            AccessError::ConfigError => 500,
            AccessError::InvalidWindow(_) => 400,
            AccessError::ServiceError(_) => 502,
        }
    }
}
