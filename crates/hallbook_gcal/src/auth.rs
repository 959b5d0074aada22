// --- File: crates/hallbook_gcal/src/auth.rs ---
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{parse_service_account_key, read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use hallbook_config::GcalConfig;
use std::{env, error::Error, path::Path};

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Build an authenticated Calendar hub.
///
/// The service-account key is taken from the GOOGLE_CALENDAR_SERVICE_ACCOUNT_JSON
/// env var when set (the whole key JSON inline), falling back to the
/// `key_path` file from config.
pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let sa_key = match env::var("GOOGLE_CALENDAR_SERVICE_ACCOUNT_JSON") {
        Ok(inline) => parse_service_account_key(inline.as_bytes())?,
        Err(_) => {
            let key_path = config
                .key_path
                .as_deref()
                .ok_or("Missing key_path in GcalConfig and no GOOGLE_CALENDAR_SERVICE_ACCOUNT_JSON set")?;
            read_service_account_key(Path::new(key_path)).await?
        }
    };

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    let hub = CalendarHub::new(client, auth);

    Ok(hub)
}
