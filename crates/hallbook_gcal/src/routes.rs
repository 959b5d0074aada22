// --- File: crates/hallbook_gcal/src/routes.rs ---

use crate::handlers::{sync_handler, webhook_handler, GcalState};
use axum::{routing::post, Router};
use std::sync::Arc;

/// Creates a router containing the calendar trigger routes.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/gcal/webhook", post(webhook_handler))
        .route("/gcal/sync", post(sync_handler))
        .with_state(state)
}
