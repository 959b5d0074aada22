//! Logging utilities for the Hallbook application.
//!
//! One tracing subscriber for the whole process, initialised from the
//! service binary. Reconciliation and trigger failures are operator-visible
//! through these logs rather than customer-visible, so every steady-state
//! loop logs through `tracing`.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at the default level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// Uses `RUST_LOG`-style env filtering on top of the given default so a
/// deployment can turn individual crates up or down without a rebuild.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hallbook={}", level).parse().unwrap());

    // try_init: a test harness may already have installed a subscriber
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
