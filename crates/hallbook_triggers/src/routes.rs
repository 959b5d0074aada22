// --- File: crates/hallbook_triggers/src/routes.rs ---

use crate::handlers::{run_triggers_handler, TriggersState};
use axum::{routing::post, Router};
use std::sync::Arc;

/// Creates a router containing the scheduler trigger route.
pub fn routes(state: Arc<TriggersState>) -> Router {
    Router::new()
        .route("/cron/triggers", post(run_triggers_handler))
        .with_state(state)
}
