// --- File: crates/hallbook_triggers/src/handlers.rs ---
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::engine::{TriggerEngine, TriggerSummary};

/// Shared state for the trigger routes.
pub struct TriggersState {
    pub engine: Arc<TriggerEngine>,
}

/// Handler for the scheduler tick.
///
/// An external cron hits this endpoint; there is no in-process timer, so a
/// stalled or redeployed server picks up where the schedule left off on
/// the next tick.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/cron/triggers", // Path relative to /api
    responses(
        (status = 200, description = "Trigger pass completed", body = TriggerSummary),
        (status = 500, description = "Pass aborted before evaluating bookings")
    ),
    tag = "Triggers"
))]
pub async fn run_triggers_handler(
    State(state): State<Arc<TriggersState>>,
) -> Result<Json<TriggerSummary>, (StatusCode, String)> {
    info!("Scheduler tick received");
    let summary = state
        .engine
        .run_pass(Utc::now())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(summary))
}
