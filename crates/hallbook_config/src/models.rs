// --- File: crates/hallbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Venue Config ---
// The venue's civil time zone is the single reference frame for every
// wall-clock window in the system. Bookings are persisted as local
// date/time values and re-anchored here on every pass.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VenueConfig {
    pub name: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String, // IANA name, e.g. "Europe/Zurich"
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String, // human-readable booking reference prefix
}

fn default_time_zone() -> String {
    "Europe/Zurich".to_string()
}

fn default_reference_prefix() -> String {
    "HB".to_string()
}

impl VenueConfig {
    /// Parses the configured IANA zone, falling back to Europe/Zurich.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.time_zone
            .parse()
            .unwrap_or(chrono_tz::Europe::Zurich)
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
    /// Token expected back in X-Goog-Channel-Token on push notifications.
    pub webhook_channel_token: Option<String>,
    // Secrets loaded directly from env vars:
    // GOOGLE_CALENDAR_SERVICE_ACCOUNT_JSON
}

// --- Damage Deposit Config ---
// Holds non-secret deposit config. Secret key loaded directly from env var.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DepositConfig {
    #[serde(default = "default_deposit_amount_cents")]
    pub amount_cents: i64,
    pub currency: Option<String>,
    /// Days before the event date at which the hold is placed.
    #[serde(default = "default_authorize_days_before")]
    pub authorize_days_before: i64,
    // Secret key loaded directly from env var: STRIPE_SECRET_KEY
}

fn default_deposit_amount_cents() -> i64 {
    50_000
}

fn default_authorize_days_before() -> i64 {
    3
}

// --- Access Control Config ---
// Smart-lock API settings. Absence of this whole section disables the
// access-code feature for the deployment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccessConfig {
    pub base_url: String,
    pub primary_device_id: String,
    pub secondary_device_id: Option<String>,
    // Secret loaded directly from env var: LOCK_API_TOKEN
}

// --- Notification Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotifyConfig {
    pub base_url: String,
    pub from_address: String,
    // Secret loaded directly from env var: MAIL_API_KEY
}

// --- Booking / checkout behaviour ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BookingConfig {
    /// Degraded mode: skip the calendar availability gate and book
    /// optimistically. Never a silent default; logged at startup and on
    /// every use.
    #[serde(default)]
    pub skip_availability_check: bool,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    pub venue: VenueConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_deposit: bool,
    #[serde(default)]
    pub use_access: bool,
    #[serde(default)]
    pub use_notify: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub deposit: Option<DepositConfig>,
    #[serde(default)]
    pub access: Option<AccessConfig>,
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
}
