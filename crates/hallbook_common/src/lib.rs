// --- File: crates/hallbook_common/src/lib.rs ---
//! Shared infrastructure for the Hallbook workspace: capability traits for
//! the external collaborators, the common error taxonomy, logging setup and
//! the shared HTTP client.

pub mod error;
pub mod http;
pub mod logging;
pub mod services;

pub use error::{
    config_error, conflict, external_service_error, internal_error, not_found, validation_error,
    Context, HallbookError, HttpStatusCode,
};
pub use http::HTTP_CLIENT;
