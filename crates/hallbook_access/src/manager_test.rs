use crate::manager::AccessCodeManager;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Europe::Zurich;
use hallbook_common::services::{
    AccessCodeEntry, AccessCodeResult, AccessControlService, BoxFuture, BoxedError,
};
use hallbook_config::AccessConfig;
use hallbook_pricing::{resolve_local, Window};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create {
        device: String,
        name: String,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
    Mirror {
        device: String,
        code: String,
    },
    Delete {
        device: String,
        code_id: String,
    },
}

#[derive(Default)]
struct FakeLockService {
    calls: Mutex<Vec<Call>>,
    listings: Mutex<HashMap<String, Vec<AccessCodeEntry>>>,
    fail_mirror: bool,
}

impl FakeLockService {
    fn with_listing(device: &str, entries: Vec<AccessCodeEntry>) -> Self {
        let fake = Self::default();
        fake.listings
            .lock()
            .unwrap()
            .insert(device.to_string(), entries);
        fake
    }
}

impl AccessControlService for FakeLockService {
    type Error = BoxedError;

    fn create_code(
        &self,
        device_id: &str,
        name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        self.calls.lock().unwrap().push(Call::Create {
            device: device_id.to_string(),
            name: name.to_string(),
            starts_at,
            ends_at,
        });
        Box::pin(async move {
            Ok(AccessCodeResult {
                code_id: "code-1".to_string(),
                code: "482913".to_string(),
            })
        })
    }

    fn create_code_with_value(
        &self,
        device_id: &str,
        _name: &str,
        code: &str,
        _starts_at: DateTime<Utc>,
        _ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        self.calls.lock().unwrap().push(Call::Mirror {
            device: device_id.to_string(),
            code: code.to_string(),
        });
        let fail = self.fail_mirror;
        let code = code.to_string();
        Box::pin(async move {
            if fail {
                Err(BoxedError::msg("secondary device offline"))
            } else {
                Ok(AccessCodeResult {
                    code_id: "code-2".to_string(),
                    code,
                })
            }
        })
    }

    fn list_codes(&self, device_id: &str) -> BoxFuture<'_, Vec<AccessCodeEntry>, Self::Error> {
        let entries = self
            .listings
            .lock()
            .unwrap()
            .get(device_id)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(entries) })
    }

    fn delete_code(&self, device_id: &str, code_id: &str) -> BoxFuture<'_, (), Self::Error> {
        self.calls.lock().unwrap().push(Call::Delete {
            device: device_id.to_string(),
            code_id: code_id.to_string(),
        });
        Box::pin(async move { Ok(()) })
    }
}

fn config(secondary: Option<&str>) -> AccessConfig {
    AccessConfig {
        base_url: "https://locks.example".to_string(),
        primary_device_id: "front-door".to_string(),
        secondary_device_id: secondary.map(|s| s.to_string()),
    }
}

fn window() -> Window {
    let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    Window {
        date,
        start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_date: date,
        end: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn issue_applies_fifteen_minute_margins() {
    let fake = Arc::new(FakeLockService::default());
    let manager = AccessCodeManager::new(fake.clone(), &config(None), Zurich);

    let result = manager.issue("Erika Muster", window()).await.unwrap();
    assert!(result.is_some());

    let calls = fake.calls.lock().unwrap();
    let Call::Create {
        device,
        name,
        starts_at,
        ends_at,
    } = &calls[0]
    else {
        panic!("expected a create call");
    };
    assert_eq!(device, "front-door");
    assert!(name.contains("Erika Muster"));
    assert!(name.contains("2025-06-14"));

    let w = window();
    let expected_start = resolve_local(Zurich, w.date.and_time(w.start)) - Duration::minutes(15);
    let expected_end = resolve_local(Zurich, w.end_date.and_time(w.end)) + Duration::minutes(15);
    assert_eq!(*starts_at, expected_start.with_timezone(&Utc));
    assert_eq!(*ends_at, expected_end.with_timezone(&Utc));
}

#[tokio::test]
async fn mirror_failure_does_not_fail_issuance() {
    let fake = Arc::new(FakeLockService {
        fail_mirror: true,
        ..Default::default()
    });
    let manager = AccessCodeManager::new(fake.clone(), &config(Some("inner-door")), Zurich);

    let result = manager.issue("Erika Muster", window()).await.unwrap();
    assert!(result.is_some(), "primary code remains valid");

    let calls = fake.calls.lock().unwrap();
    assert!(calls
        .iter()
        .any(|c| matches!(c, Call::Mirror { device, .. } if device == "inner-door")));
}

#[tokio::test]
async fn mirror_reuses_primary_code_value() {
    let fake = Arc::new(FakeLockService::default());
    let manager = AccessCodeManager::new(fake.clone(), &config(Some("inner-door")), Zurich);

    manager.issue("Erika Muster", window()).await.unwrap();

    let calls = fake.calls.lock().unwrap();
    assert!(calls
        .iter()
        .any(|c| matches!(c, Call::Mirror { code, .. } if code == "482913")));
}

#[tokio::test]
async fn reissue_replaces_the_previous_code() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    let fake = Arc::new(FakeLockService::with_listing(
        "front-door",
        vec![AccessCodeEntry {
            code_id: "stale".to_string(),
            name: AccessCodeManager::code_name("Erika Muster", date),
        }],
    ));
    let manager = AccessCodeManager::new(fake.clone(), &config(None), Zurich);

    manager.issue("Erika Muster", window()).await.unwrap();

    let calls = fake.calls.lock().unwrap();
    assert_eq!(
        calls[0],
        Call::Delete {
            device: "front-door".to_string(),
            code_id: "stale".to_string(),
        }
    );
    assert!(matches!(calls[1], Call::Create { .. }));
}

#[tokio::test]
async fn revoke_deletes_only_matching_codes() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    let fake = Arc::new(FakeLockService::with_listing(
        "front-door",
        vec![
            AccessCodeEntry {
                code_id: "a".to_string(),
                name: AccessCodeManager::code_name("Erika Muster", date),
            },
            AccessCodeEntry {
                code_id: "b".to_string(),
                name: AccessCodeManager::code_name("Someone Else", date),
            },
            AccessCodeEntry {
                code_id: "c".to_string(),
                name: "hallbook Erika Muster 2025-07-01".to_string(),
            },
        ],
    ));
    let manager = AccessCodeManager::new(fake.clone(), &config(None), Zurich);

    let deleted = manager.revoke("Erika Muster", date).await.unwrap();
    assert_eq!(deleted, 1);

    let calls = fake.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![Call::Delete {
            device: "front-door".to_string(),
            code_id: "a".to_string(),
        }]
    );
}

#[tokio::test]
async fn disabled_manager_is_a_silent_noop() {
    let manager = AccessCodeManager::disabled(Zurich);
    assert!(manager.issue("Erika", window()).await.unwrap().is_none());
    assert_eq!(
        manager
            .revoke("Erika", NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())
            .await
            .unwrap(),
        0
    );
}
