// --- File: crates/hallbook_booking/src/routes.rs ---

use crate::handlers::{
    availability_handler, cancel_booking_handler, create_booking_handler, BookingState,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all booking routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/availability", get(availability_handler))
        .route("/bookings", post(create_booking_handler))
        .route(
            "/admin/bookings/{reference}",
            delete(cancel_booking_handler),
        )
        .with_state(state)
}
