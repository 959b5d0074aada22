// --- File: crates/hallbook_access/src/service.rs ---
//! Smart-lock HTTP API client.
//!
//! Implements the AccessControlService capability against a REST-style lock
//! vendor API: codes are created per device with a validity interval and a
//! free-form name, listed, and deleted by id. The API token comes from the
//! LOCK_API_TOKEN env var, never from config files.

use chrono::{DateTime, Utc};
use hallbook_common::services::{
    AccessCodeEntry, AccessCodeResult, AccessControlService, BoxFuture, BoxedError,
};
use hallbook_common::HTTP_CLIENT;
use serde::Deserialize;
use serde_json::json;
use std::env;
use tracing::debug;

use crate::error::AccessError;

#[derive(Deserialize, Debug)]
struct CodeResponse {
    id: String,
    code: String,
}

#[derive(Deserialize, Debug)]
struct CodeListEntry {
    id: String,
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CodeListResponse {
    codes: Vec<CodeListEntry>,
}

/// HTTP client for the lock vendor API.
pub struct LockApiService {
    base_url: String,
}

impl LockApiService {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_token() -> Result<String, AccessError> {
        env::var("LOCK_API_TOKEN").map_err(|_| AccessError::ConfigError)
    }

    async fn create(
        &self,
        device_id: &str,
        name: &str,
        code: Option<&str>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<AccessCodeResult, AccessError> {
        let token = Self::api_token()?;
        let url = format!("{}/devices/{}/codes", self.base_url, device_id);
        let mut body = json!({
            "name": name,
            "starts_at": starts_at.to_rfc3339(),
            "ends_at": ends_at.to_rfc3339(),
        });
        if let Some(code) = code {
            body["code"] = json!(code);
        }

        debug!("Creating access code '{}' on device {}", name, device_id);
        let response = HTTP_CLIENT
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AccessError::ApiError { status, message });
        }

        let created: CodeResponse = response.json().await?;
        Ok(AccessCodeResult {
            code_id: created.id,
            code: created.code,
        })
    }
}

impl AccessControlService for LockApiService {
    type Error = BoxedError;

    fn create_code(
        &self,
        device_id: &str,
        name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        let device_id = device_id.to_string();
        let name = name.to_string();
        Box::pin(async move {
            self.create(&device_id, &name, None, starts_at, ends_at)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn create_code_with_value(
        &self,
        device_id: &str,
        name: &str,
        code: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        let device_id = device_id.to_string();
        let name = name.to_string();
        let code = code.to_string();
        Box::pin(async move {
            self.create(&device_id, &name, Some(&code), starts_at, ends_at)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn list_codes(&self, device_id: &str) -> BoxFuture<'_, Vec<AccessCodeEntry>, Self::Error> {
        let device_id = device_id.to_string();
        Box::pin(async move {
            let run = async {
                let token = Self::api_token()?;
                let url = format!("{}/devices/{}/codes", self.base_url, device_id);
                let response = HTTP_CLIENT.get(&url).bearer_auth(token).send().await?;
                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    return Err(AccessError::ApiError { status, message });
                }
                let listed: CodeListResponse = response.json().await?;
                Ok(listed
                    .codes
                    .into_iter()
                    .map(|c| AccessCodeEntry {
                        code_id: c.id,
                        name: c.name.unwrap_or_default(),
                    })
                    .collect())
            };
            run.await.map_err(|e: AccessError| BoxedError(Box::new(e)))
        })
    }

    fn delete_code(&self, device_id: &str, code_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let device_id = device_id.to_string();
        let code_id = code_id.to_string();
        Box::pin(async move {
            let run = async {
                let token = Self::api_token()?;
                let url = format!(
                    "{}/devices/{}/codes/{}",
                    self.base_url, device_id, code_id
                );
                let response = HTTP_CLIENT.delete(&url).bearer_auth(token).send().await?;
                if !response.status().is_success() && response.status().as_u16() != 404 {
                    let status = response.status().as_u16();
                    let message = response.text().await.unwrap_or_default();
                    return Err(AccessError::ApiError { status, message });
                }
                Ok(())
            };
            run.await.map_err(|e: AccessError| BoxedError(Box::new(e)))
        })
    }
}
