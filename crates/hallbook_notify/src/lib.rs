// --- File: crates/hallbook_notify/src/lib.rs ---
//! Customer notifications: the mail API client and the lifecycle templates.

pub mod error;
pub mod service;
pub mod templates;

pub use error::NotifyError;
pub use service::MailHttpService;
