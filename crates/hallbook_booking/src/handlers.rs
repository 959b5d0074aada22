// --- File: crates/hallbook_booking/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use hallbook_common::HttpStatusCode;
use hallbook_pricing::BookingMode;
use serde::Deserialize;
use std::sync::Arc;

use crate::logic::{
    AvailabilityResponse, BookingEngine, CancelResponse, CheckoutRequest, CheckoutResponse,
};

/// Shared state for the booking routes.
pub struct BookingState {
    pub engine: Arc<BookingEngine>,
}

fn into_response_error(e: crate::error::BookingError) -> (StatusCode, String) {
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        e.to_string(),
    )
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub mode: BookingMode,
    pub duration_hours: Option<i64>,
    pub start_time: Option<NaiveTime>,
}

/// Handler to quote and availability-check a proposed window.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability", // Path relative to /api
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Price and availability for the window", body = AvailabilityResponse),
        (status = 400, description = "Bad request (e.g., invalid duration)"),
        (status = 502, description = "Calendar unreachable")
    ),
    tag = "Booking"
))]
pub async fn availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, String)> {
    let response = state
        .engine
        .availability(query.date, query.mode, query.duration_hours, query.start_time)
        .await
        .map_err(into_response_error)?;
    Ok(Json(response))
}

/// Handler to create a booking.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings", // Path relative to /api
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Booking created", body = CheckoutResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown discount code"),
        (status = 409, description = "Window unavailable or discount exhausted")
    ),
    tag = "Booking"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, (StatusCode, String)> {
    let response = state
        .engine
        .checkout(request, Utc::now())
        .await
        .map_err(into_response_error)?;
    Ok(Json(response))
}

/// Handler to cancel a booking by reference.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/admin/bookings/{reference}", // Path relative to /api
    params(("reference" = String, Path, description = "Booking reference, e.g. HB-9F3A2C")),
    responses(
        (status = 200, description = "Booking cancelled", body = CancelResponse),
        (status = 404, description = "No booking under this reference")
    ),
    tag = "Booking"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(reference): Path<String>,
) -> Result<Json<CancelResponse>, (StatusCode, String)> {
    let response = state
        .engine
        .cancel(&reference)
        .await
        .map_err(into_response_error)?;
    Ok(Json(response))
}
