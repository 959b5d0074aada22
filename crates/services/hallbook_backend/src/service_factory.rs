// --- File: crates/services/hallbook_backend/src/service_factory.rs ---
//! Service factory for the backend binary.
//!
//! Each integration is built once at startup from its config section and
//! runtime flag, and handed out as a capability trait object. A disabled or
//! misconfigured integration yields `None`, which downstream components
//! treat as the feature being off.

use hallbook_common::services::{
    AccessControlService, BoxedError, CalendarService, NotificationService, PaymentService,
    ServiceFactory,
};
use hallbook_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info};

use hallbook_access::LockApiService;
use hallbook_deposit::StripePaymentService;
use hallbook_gcal::auth::create_calendar_hub;
use hallbook_gcal::GoogleCalendarService;
use hallbook_notify::MailHttpService;

pub struct HallbookServiceFactory {
    calendar_service: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
    payment_service: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
    access_control_service: Option<Arc<dyn AccessControlService<Error = BoxedError>>>,
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

impl HallbookServiceFactory {
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let mut factory = Self {
            calendar_service: None,
            payment_service: None,
            access_control_service: None,
            notification_service: None,
        };

        if config.use_gcal {
            match config.gcal.as_ref() {
                Some(gcal_config) => {
                    info!("Initializing Google Calendar service...");
                    match create_calendar_hub(gcal_config).await {
                        Ok(hub) => {
                            let service = GoogleCalendarService::new(
                                Arc::new(hub),
                                gcal_config.webhook_channel_token.clone(),
                            );
                            factory.calendar_service = Some(Arc::new(service));
                            info!("Google Calendar service initialized");
                        }
                        Err(e) => {
                            error!(
                                "Failed to initialize Google Calendar service: {}. \
                                 Calendar features disabled.",
                                e
                            );
                        }
                    }
                }
                None => info!("use_gcal set but [gcal] config section missing, skipping"),
            }
        }

        if config.use_deposit {
            if config.deposit.is_some() {
                info!("Initializing Stripe payment service...");
                factory.payment_service = Some(Arc::new(StripePaymentService::new()));
            } else {
                info!("use_deposit set but [deposit] config section missing, skipping");
            }
        }

        if config.use_access {
            match config.access.as_ref() {
                Some(access_config) => {
                    info!("Initializing smart-lock service...");
                    factory.access_control_service =
                        Some(Arc::new(LockApiService::new(access_config.base_url.clone())));
                }
                None => info!("use_access set but [access] config section missing, skipping"),
            }
        }

        if config.use_notify {
            match config.notify.as_ref() {
                Some(notify_config) => {
                    info!("Initializing mail service...");
                    factory.notification_service = Some(Arc::new(MailHttpService::new(
                        notify_config.base_url.clone(),
                        notify_config.from_address.clone(),
                    )));
                }
                None => info!("use_notify set but [notify] config section missing, skipping"),
            }
        }

        factory
    }
}

impl ServiceFactory for HallbookServiceFactory {
    fn calendar_service(&self) -> Option<Arc<dyn CalendarService<Error = BoxedError>>> {
        self.calendar_service.clone()
    }

    fn payment_service(&self) -> Option<Arc<dyn PaymentService<Error = BoxedError>>> {
        self.payment_service.clone()
    }

    fn access_control_service(&self) -> Option<Arc<dyn AccessControlService<Error = BoxedError>>> {
        self.access_control_service.clone()
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        self.notification_service.clone()
    }
}
