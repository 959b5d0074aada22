// --- File: crates/hallbook_notify/src/service.rs ---
//! Transactional mail HTTP client.
//!
//! Implements the NotificationService capability against a template-based
//! mail API: the server renders a named template with the supplied data.
//! The API key comes from the MAIL_API_KEY env var, never from config
//! files.

use hallbook_common::services::{BoxFuture, BoxedError, NotificationResult, NotificationService};
use hallbook_common::HTTP_CLIENT;
use serde::Deserialize;
use serde_json::json;
use std::env;
use tracing::debug;

use crate::error::NotifyError;

#[derive(Deserialize, Debug)]
struct MessageResponse {
    id: String,
    status: String,
}

/// HTTP client for the transactional mail API.
pub struct MailHttpService {
    base_url: String,
    from_address: String,
}

impl MailHttpService {
    pub fn new(base_url: String, from_address: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            from_address,
        }
    }

    fn api_key() -> Result<String, NotifyError> {
        env::var("MAIL_API_KEY").map_err(|_| NotifyError::ConfigError)
    }
}

impl NotificationService for MailHttpService {
    type Error = BoxedError;

    fn send_templated(
        &self,
        template: &str,
        to: &str,
        data: serde_json::Value,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let template = template.to_string();
        let to = to.to_string();

        Box::pin(async move {
            let run = async {
                let api_key = Self::api_key()?;
                let url = format!("{}/messages", self.base_url);
                let body = json!({
                    "from": self.from_address,
                    "to": to,
                    "template": template,
                    "data": data,
                });

                debug!("Sending '{}' mail to {}", template, to);
                let response = HTTP_CLIENT
                    .post(&url)
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    return Err(NotifyError::ApiError { status, message });
                }

                let sent: MessageResponse = response.json().await?;
                Ok(NotificationResult {
                    id: sent.id,
                    status: sent.status,
                })
            };
            run.await.map_err(|e: NotifyError| BoxedError(Box::new(e)))
        })
    }
}
