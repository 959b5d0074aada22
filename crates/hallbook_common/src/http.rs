// --- File: crates/hallbook_common/src/http.rs ---
pub mod client;

pub use client::{create_client, HTTP_CLIENT};
