// --- File: crates/hallbook_access/src/lib.rs ---
//! Access control integration: the smart-lock API client and the access
//! code lifecycle manager that mints and revokes time-boxed entry codes.

pub mod error;
pub mod manager;
pub mod service;
#[cfg(test)]
mod manager_test;

pub use error::AccessError;
pub use manager::AccessCodeManager;
pub use service::LockApiService;
