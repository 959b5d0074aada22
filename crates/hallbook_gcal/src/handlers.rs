// --- File: crates/hallbook_gcal/src/handlers.rs ---
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use hallbook_common::HttpStatusCode;
use std::sync::Arc;
use tracing::{debug, info};

use crate::reconcile::{CalendarReconciler, ReconcileSummary};

/// Shared state for the calendar trigger routes.
pub struct GcalState {
    pub reconciler: Arc<CalendarReconciler>,
    /// Expected X-Goog-Channel-Token value; push notifications carrying a
    /// different token are rejected.
    pub channel_token: Option<String>,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Handler for Google Calendar push notifications.
///
/// The notification body is empty by design; it only signals "something
/// changed", and the response is one full reconciliation pass.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/gcal/webhook", // Path relative to /api
    responses(
        (status = 200, description = "Reconciliation pass completed", body = ReconcileSummary),
        (status = 400, description = "Missing push channel headers"),
        (status = 401, description = "Channel token mismatch"),
        (status = 502, description = "Calendar unreachable")
    ),
    tag = "GCal"
))]
pub async fn webhook_handler(
    State(state): State<Arc<GcalState>>,
    headers: HeaderMap,
) -> Result<Json<ReconcileSummary>, (StatusCode, String)> {
    let channel_id = header_value(&headers, "X-Goog-Channel-ID").ok_or((
        StatusCode::BAD_REQUEST,
        "Missing X-Goog-Channel-ID header".to_string(),
    ))?;

    if let Some(expected) = &state.channel_token {
        let token = header_value(&headers, "X-Goog-Channel-Token").unwrap_or_default();
        if token != expected {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Channel token mismatch".to_string(),
            ));
        }
    }

    // Google sends a "sync" message when the channel is first registered;
    // there is nothing to reconcile yet.
    if header_value(&headers, "X-Goog-Resource-State") == Some("sync") {
        debug!("Channel {} registered, acknowledging sync message", channel_id);
        return Ok(Json(ReconcileSummary::default()));
    }

    info!("Push notification on channel {}, reconciling", channel_id);
    let summary = state
        .reconciler
        .run(Utc::now())
        .await
        .map_err(|e| (StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), e.to_string()))?;

    Ok(Json(summary))
}

/// Handler for operator-forced reconciliation.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/gcal/sync", // Path relative to /api
    responses(
        (status = 200, description = "Reconciliation pass completed", body = ReconcileSummary),
        (status = 502, description = "Calendar unreachable")
    ),
    tag = "GCal"
))]
pub async fn sync_handler(
    State(state): State<Arc<GcalState>>,
) -> Result<Json<ReconcileSummary>, (StatusCode, String)> {
    info!("Forced reconciliation requested");
    let summary = state
        .reconciler
        .run(Utc::now())
        .await
        .map_err(|e| (StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), e.to_string()))?;

    Ok(Json(summary))
}
