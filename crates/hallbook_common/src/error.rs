// --- File: crates/hallbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Hallbook errors.
///
/// Variants follow the operational taxonomy: validation errors are rejected
/// up front with no side effects; transient external-service errors leave
/// state untouched and are retried by the next scheduled pass; terminal
/// external-service errors are recorded in the relevant status field.
#[derive(Error, Debug)]
pub enum HallbookError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during a booking-store operation
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., window already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for HallbookError {
    fn status_code(&self) -> u16 {
        match self {
            HallbookError::HttpError(_) => 500,
            HallbookError::ParseError(_) => 400,
            HallbookError::ConfigError(_) => 500,
            HallbookError::ValidationError(_) => 400,
            HallbookError::StoreError(_) => 500,
            HallbookError::ExternalServiceError { .. } => 502,
            HallbookError::ConflictError(_) => 409,
            HallbookError::NotFoundError(_) => 404,
            HallbookError::TimeoutError(_) => 504,
            HallbookError::RateLimitError(_) => 429,
            HallbookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, HallbookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, HallbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, HallbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| HallbookError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, HallbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| HallbookError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for HallbookError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HallbookError::TimeoutError(err.to_string())
        } else {
            HallbookError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HallbookError {
    fn from(err: serde_json::Error) -> Self {
        HallbookError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for HallbookError {
    fn from(err: std::io::Error) -> Self {
        HallbookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> HallbookError {
    HallbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> HallbookError {
    HallbookError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> HallbookError {
    HallbookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> HallbookError {
    HallbookError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> HallbookError {
    HallbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> HallbookError {
    HallbookError::InternalError(message.to_string())
}
