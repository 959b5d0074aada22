// --- File: crates/hallbook_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! These traits decouple the reconciliation and trigger logic from the
//! vendor APIs (Google Calendar, Stripe, the smart-lock HTTP API, the mail
//! API) so every component can be driven against test doubles. Each trait
//! covers exactly the capability surface the engine consumes, nothing more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

impl BoxedError {
    pub fn msg<M: fmt::Display>(message: M) -> Self {
        BoxedError(message.to_string().into())
    }
}

/// A trait for calendar service operations.
///
/// The calendar is the source of truth for schedule conflicts; the
/// reconciliation engine corrects the booking store from it, never the
/// reverse.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List events within [time_min, time_max).
    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error>;

    /// Create a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Delete a calendar event.
    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, (), Self::Error>;

    /// Register a push-notification channel for calendar changes.
    fn watch(
        &self,
        calendar_id: &str,
        callback_url: &str,
    ) -> BoxFuture<'_, WatchChannel, Self::Error>;

    /// Stop a previously registered push channel.
    fn stop(
        &self,
        channel_id: &str,
        resource_id: &str,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// A trait for payment-authorization service operations.
///
/// Covers the deferred damage-deposit hold: a manual-capture authorization
/// created against a saved payment method and confirmed off-session.
pub trait PaymentService: Send + Sync {
    /// Error type returned by payment service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up a payer by email, creating one if absent.
    fn find_or_create_customer(
        &self,
        email: &str,
        name: &str,
    ) -> BoxFuture<'_, CustomerResult, Self::Error>;

    /// Create a manual-capture authorization (hold, not a charge).
    fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error>;

    /// Confirm an authorization off-session against a saved payment method.
    fn confirm_authorization(
        &self,
        authorization_id: &str,
        payment_method: &str,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error>;
}

/// A trait for access-control (smart lock) operations.
pub trait AccessControlService: Send + Sync {
    /// Error type returned by access-control operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a time-boxed access code on a device.
    fn create_code(
        &self,
        device_id: &str,
        name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error>;

    /// Create a code with a caller-chosen value (used to mirror the primary
    /// code onto a secondary device).
    fn create_code_with_value(
        &self,
        device_id: &str,
        name: &str,
        code: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error>;

    /// List codes currently present on a device.
    fn list_codes(&self, device_id: &str) -> BoxFuture<'_, Vec<AccessCodeEntry>, Self::Error>;

    /// Delete a code from a device.
    fn delete_code(
        &self,
        device_id: &str,
        code_id: &str,
    ) -> BoxFuture<'_, (), Self::Error>;
}

/// A trait for notification service operations.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a templated message to a recipient.
    fn send_templated(
        &self,
        template: &str,
        to: &str,
        data: serde_json::Value,
    ) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A factory for creating service instances.
///
/// Returns `None` for integrations that are disabled or unconfigured in the
/// running deployment; callers treat that as the feature being off.
pub trait ServiceFactory: Send + Sync {
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService<Error = BoxedError>>>;

    fn payment_service(&self) -> Option<Arc<dyn PaymentService<Error = BoxedError>>>;

    fn access_control_service(&self) -> Option<Arc<dyn AccessControlService<Error = BoxedError>>>;

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;
}

/// Data structures for calendar service operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// RFC3339 start instant.
    pub start_time: String,
    /// RFC3339 end instant.
    pub end_time: String,
    pub summary: String,
    pub description: Option<String>,
    /// Structured booking metadata, attached as private extended properties
    /// where the calendar platform supports them.
    pub metadata: Option<HashMap<String, String>>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    pub status: String,
}

/// An event as read back from the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedEvent {
    pub event_id: String,
    pub summary: String,
    pub description: Option<String>,
    /// RFC3339 when zoned; `YYYY-MM-DDTHH:MM:SS` when the event is floating.
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    /// Private extended properties, when the platform carries them.
    pub metadata: Option<HashMap<String, String>>,
}

/// A registered push-notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchChannel {
    pub channel_id: String,
    pub resource_id: String,
    /// Unix millis at which the channel expires, if the platform reports it.
    pub expiration: Option<i64>,
}

/// Data structures for payment service operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResult {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuthorizationRequest {
    /// Amount in minor units (cents).
    pub amount: i64,
    pub currency: String,
    /// Saved payment method reference to place the hold against.
    pub payment_method: String,
    pub customer: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Represents the state of an authorization after create/confirm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResult {
    pub id: String,
    /// Vendor status string, e.g. "requires_confirmation", "requires_capture".
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

/// Data structures for access-control operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCodeResult {
    pub code_id: String,
    /// The PIN itself, needed to mirror onto a secondary device.
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCodeEntry {
    pub code_id: String,
    pub name: String,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub id: String,
    pub status: String,
}
