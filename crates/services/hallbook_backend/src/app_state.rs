// --- File: crates/services/hallbook_backend/src/app_state.rs ---
//! Shared application state.
//!
//! Everything long-lived is built here once: the stores, the service
//! factory, the booking engine, the calendar reconciler and the trigger
//! engine. Route modules receive their slice of this state as an Arc.

use std::sync::Arc;

use hallbook_access::AccessCodeManager;
use hallbook_booking::handlers::BookingState;
use hallbook_booking::BookingEngine;
use hallbook_common::services::ServiceFactory;
use hallbook_config::AppConfig;
use hallbook_gcal::handlers::GcalState;
use hallbook_gcal::parser::CompositeParser;
use hallbook_gcal::CalendarReconciler;
use hallbook_store::{
    BookingRepository, DiscountRepository, InMemoryBookingStore, InMemoryDiscountStore,
};
use hallbook_triggers::handlers::TriggersState;
use hallbook_triggers::TriggerEngine;
use tracing::{info, warn};

use crate::service_factory::HallbookServiceFactory;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking_state: Arc<BookingState>,
    pub triggers_state: Arc<TriggersState>,
    /// Present only when the calendar integration came up.
    pub gcal_state: Option<Arc<GcalState>>,
}

impl AppState {
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let factory = HallbookServiceFactory::new(config.clone()).await;
        let tz = config.venue.tz();

        let store: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingStore::new());
        let discounts: Arc<dyn DiscountRepository> = Arc::new(InMemoryDiscountStore::new());

        let calendar = factory.calendar_service();
        let payments = factory.payment_service();
        let notifier = factory.notification_service();

        let access = factory.access_control_service().and_then(|lock| {
            config
                .access
                .as_ref()
                .map(|access_config| Arc::new(AccessCodeManager::new(lock, access_config, tz)))
        });
        if access.is_none() && config.use_access {
            warn!("Access-code feature requested but not configured, codes disabled");
        }

        let gcal_state = match (&calendar, config.gcal.as_ref()) {
            (Some(calendar), Some(gcal_config)) => match gcal_config.calendar_id.as_ref() {
                Some(calendar_id) => {
                    let reconciler = CalendarReconciler::new(
                        calendar.clone(),
                        store.clone(),
                        access.clone(),
                        Arc::new(CompositeParser::new()),
                        calendar_id.clone(),
                        tz,
                    );
                    Some(Arc::new(GcalState {
                        reconciler: Arc::new(reconciler),
                        channel_token: gcal_config.webhook_channel_token.clone(),
                    }))
                }
                None => {
                    warn!("Calendar service is up but no calendar_id configured, \
                           reconciliation disabled");
                    None
                }
            },
            _ => None,
        };

        let currency = config
            .deposit
            .as_ref()
            .and_then(|d| d.currency.clone())
            .unwrap_or_else(|| "chf".to_string());
        let authorize_days_before = config
            .deposit
            .as_ref()
            .map(|d| d.authorize_days_before)
            .unwrap_or(3);

        let trigger_engine = TriggerEngine::new(
            store.clone(),
            payments.clone(),
            notifier,
            access.clone(),
            config.venue.name.clone(),
            currency,
            authorize_days_before,
            tz,
        );

        let booking_engine = BookingEngine::new(
            store,
            discounts,
            calendar,
            payments,
            access,
            config.clone(),
        );

        info!(
            "Application state built for venue '{}' ({})",
            config.venue.name, config.venue.time_zone
        );

        Self {
            config,
            booking_state: Arc::new(BookingState {
                engine: Arc::new(booking_engine),
            }),
            triggers_state: Arc::new(TriggersState {
                engine: Arc::new(trigger_engine),
            }),
            gcal_state,
        }
    }
}
