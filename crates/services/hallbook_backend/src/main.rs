// --- File: crates/services/hallbook_backend/src/main.rs ---
mod app_state;
mod service_factory;

use axum::{routing::get, Router};
use hallbook_common::logging;
use hallbook_config::{ensure_dotenv_loaded, load_config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app_state::AppState;

#[tokio::main]
async fn main() {
    ensure_dotenv_loaded();
    logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    if config.booking.skip_availability_check {
        warn!("skip_availability_check is ON: bookings are not gated on the calendar");
    }

    let state = AppState::new(config.clone()).await;

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Hallbook API!" }))
        .merge(hallbook_booking::routes::routes(state.booking_state.clone()))
        .merge(hallbook_triggers::routes::routes(
            state.triggers_state.clone(),
        ));
    let api_router = match &state.gcal_state {
        Some(gcal_state) => api_router.merge(hallbook_gcal::routes::routes(gcal_state.clone())),
        None => api_router,
    };

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Hallbook API",
                version = "0.1.0",
                description = "Venue rental booking and reconciliation API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            paths(
                hallbook_booking::handlers::availability_handler,
                hallbook_booking::handlers::create_booking_handler,
                hallbook_booking::handlers::cancel_booking_handler,
                hallbook_gcal::handlers::webhook_handler,
                hallbook_gcal::handlers::sync_handler,
                hallbook_triggers::handlers::run_triggers_handler,
            ),
            servers((url = "/api", description = "Main API prefix")),
        )]
        struct ApiDoc;

        info!("Adding Swagger UI at /api/docs");
        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi());
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
