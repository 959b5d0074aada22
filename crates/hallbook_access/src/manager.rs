// --- File: crates/hallbook_access/src/manager.rs ---
//! Access code lifecycle manager.
//!
//! Codes are keyed by a name embedding customer identity and event date, so
//! they can be located and deleted later without a persisted foreign key.
//! Validity is derived from the booking's *local* window in the venue's
//! fixed civil zone, with a 15 minute margin on both sides.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use hallbook_common::services::{AccessCodeResult, AccessControlService, BoxedError};
use hallbook_config::AccessConfig;
use hallbook_pricing::Window;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AccessError;

/// Margin applied on both sides of the occupancy window.
const ENTRY_MARGIN_MINUTES: i64 = 15;

struct LockSetup {
    service: Arc<dyn AccessControlService<Error = BoxedError>>,
    primary_device_id: String,
    secondary_device_id: Option<String>,
}

pub struct AccessCodeManager {
    lock: Option<LockSetup>,
    tz: Tz,
}

impl AccessCodeManager {
    pub fn new(
        service: Arc<dyn AccessControlService<Error = BoxedError>>,
        config: &AccessConfig,
        tz: Tz,
    ) -> Self {
        Self {
            lock: Some(LockSetup {
                service,
                primary_device_id: config.primary_device_id.clone(),
                secondary_device_id: config.secondary_device_id.clone(),
            }),
            tz,
        }
    }

    /// A manager for deployments without lock hardware. Every operation is
    /// a silent no-op.
    pub fn disabled(tz: Tz) -> Self {
        Self { lock: None, tz }
    }

    /// Name under which codes for this customer and date are filed.
    pub fn code_name(customer_name: &str, date: NaiveDate) -> String {
        format!("hallbook {} {}", customer_name, date)
    }

    /// Issue a code valid for [start - 15min, end + 15min].
    ///
    /// The primary entry device must succeed; the mirror onto the secondary
    /// device is best-effort since the primary code already opens the
    /// building.
    pub async fn issue(
        &self,
        customer_name: &str,
        window: Window,
    ) -> Result<Option<AccessCodeResult>, AccessError> {
        let Some(lock) = &self.lock else {
            debug!("Access control not configured, skipping code issuance");
            return Ok(None);
        };

        let starts_at: DateTime<Utc> =
            (window.start_in(self.tz) - Duration::minutes(ENTRY_MARGIN_MINUTES)).with_timezone(&Utc);
        let ends_at: DateTime<Utc> =
            (window.end_in(self.tz) + Duration::minutes(ENTRY_MARGIN_MINUTES)).with_timezone(&Utc);
        if ends_at <= starts_at {
            return Err(AccessError::InvalidWindow(format!(
                "code would end before it starts: {} - {}",
                starts_at, ends_at
            )));
        }

        let name = Self::code_name(customer_name, window.date);
        self.purge_named(lock, &name).await;
        let created = lock
            .service
            .create_code(&lock.primary_device_id, &name, starts_at, ends_at)
            .await
            .map_err(|e| AccessError::ServiceError(e.to_string()))?;
        info!(
            "Issued access code '{}' on device {} valid {} - {}",
            name, lock.primary_device_id, starts_at, ends_at
        );

        if let Some(secondary) = &lock.secondary_device_id {
            // mirror failure leaves the primary code valid
            if let Err(e) = lock
                .service
                .create_code_with_value(secondary, &name, &created.code, starts_at, ends_at)
                .await
            {
                warn!(
                    "Failed to mirror access code '{}' onto device {}: {}",
                    name, secondary, e
                );
            }
        }

        Ok(Some(created))
    }

    /// Delete codes already filed under this exact name, so a retried
    /// issuance replaces its code instead of accumulating duplicates on the
    /// lock. Best-effort: issuance proceeds even if the cleanup fails.
    async fn purge_named(&self, lock: &LockSetup, name: &str) {
        let mut devices = vec![lock.primary_device_id.as_str()];
        if let Some(secondary) = &lock.secondary_device_id {
            devices.push(secondary.as_str());
        }
        for device_id in devices {
            let codes = match lock.service.list_codes(device_id).await {
                Ok(codes) => codes,
                Err(e) => {
                    warn!("Could not list codes on device {}: {}", device_id, e);
                    continue;
                }
            };
            for entry in codes {
                if entry.name == name {
                    if let Err(e) = lock.service.delete_code(device_id, &entry.code_id).await {
                        warn!(
                            "Failed to delete stale access code {} on device {}: {}",
                            entry.code_id, device_id, e
                        );
                    }
                }
            }
        }
    }

    /// Delete every code on every managed device whose name contains both
    /// the customer name and the date. Returns the number deleted.
    pub async fn revoke(
        &self,
        customer_name: &str,
        date: NaiveDate,
    ) -> Result<u32, AccessError> {
        let Some(lock) = &self.lock else {
            debug!("Access control not configured, skipping code revocation");
            return Ok(0);
        };

        let date_key = date.to_string();
        let mut deleted = 0u32;
        let mut devices = vec![lock.primary_device_id.as_str()];
        if let Some(secondary) = &lock.secondary_device_id {
            devices.push(secondary.as_str());
        }

        for device_id in devices {
            let codes = lock
                .service
                .list_codes(device_id)
                .await
                .map_err(|e| AccessError::ServiceError(e.to_string()))?;
            for entry in codes {
                if entry.name.contains(customer_name) && entry.name.contains(&date_key) {
                    match lock.service.delete_code(device_id, &entry.code_id).await {
                        Ok(()) => {
                            deleted += 1;
                            info!(
                                "Revoked access code '{}' ({}) on device {}",
                                entry.name, entry.code_id, device_id
                            );
                        }
                        Err(e) => warn!(
                            "Failed to delete access code {} on device {}: {}",
                            entry.code_id, device_id, e
                        ),
                    }
                }
            }
        }
        Ok(deleted)
    }
}
