// --- File: crates/hallbook_deposit/src/error.rs ---
use hallbook_common::{external_service_error, HallbookError, HttpStatusCode};
use hallbook_store::StoreError;
use thiserror::Error;

/// Deposit-specific error types.
#[derive(Error, Debug)]
pub enum DepositError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing credential configuration (STRIPE_SECRET_KEY)
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,

    /// Error from the booking store
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// Error from the underlying payment service
    #[error("Payment service error: {0}")]
    ServiceError(String),
}

impl From<DepositError> for HallbookError {
    fn from(err: DepositError) -> Self {
        match err {
            DepositError::RequestError(e) => {
                HallbookError::HttpError(format!("Stripe request error: {}", e))
            }
            DepositError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            DepositError::ParseError(e) => {
                HallbookError::ParseError(format!("Stripe response parse error: {}", e))
            }
            DepositError::ConfigError => {
                HallbookError::ConfigError("Stripe configuration missing or incomplete".to_string())
            }
            DepositError::StoreError(e) => HallbookError::StoreError(e.to_string()),
            DepositError::ServiceError(msg) => external_service_error("Stripe API", msg),
        }
    }
}

impl HttpStatusCode for DepositError {
    fn status_code(&self) -> u16 {
        match self {
            DepositError::RequestError(_) => 500,
            DepositError::ApiError { status_code, .. } => *status_code,
            DepositError::ParseError(_) => 502,
            DepositError::ConfigError => 500,
            DepositError::StoreError(_) => 500,
            DepositError::ServiceError(_) => 502,
        }
    }
}
