// --- File: crates/hallbook_notify/src/error.rs ---
use hallbook_common::{external_service_error, HallbookError, HttpStatusCode};
use thiserror::Error;

/// Notification-specific error types.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Error occurred during a mail API request
    #[error("Mail API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the mail API
    #[error("Mail API returned an error: {message} (Status: {status})")]
    ApiError { status: u16, message: String },

    /// Error parsing the mail API response
    #[error("Failed to parse mail API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing credential configuration (MAIL_API_KEY)
    #[error("Mail API credentials missing")]
    ConfigError,
}

impl From<NotifyError> for HallbookError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::RequestError(e) => {
                HallbookError::HttpError(format!("Mail API: {}", e))
            }
            NotifyError::ApiError { status, message } => external_service_error(
                "Mail API",
                format!("Status: {}, Message: {}", status, message),
            ),
            NotifyError::ParseError(e) => HallbookError::ParseError(e.to_string()),
            NotifyError::ConfigError => {
                HallbookError::ConfigError("Mail API credentials missing".to_string())
            }
        }
    }
}

impl HttpStatusCode for NotifyError {
    fn status_code(&self) -> u16 {
        match self {
            NotifyError::RequestError(_) => 500,
            NotifyError::ApiError { status, .. } => *status,
            NotifyError::ParseError(_) => 502,
            NotifyError::ConfigError => 500,
        }
    }
}
