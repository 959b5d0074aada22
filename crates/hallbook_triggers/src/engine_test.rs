// --- File: crates/hallbook_triggers/src/engine_test.rs ---
use crate::engine::TriggerEngine;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Zurich;
use hallbook_access::AccessCodeManager;
use hallbook_common::services::{
    AccessCodeEntry, AccessCodeResult, AccessControlService, AuthorizationResult, BoxFuture,
    BoxedError, CreateAuthorizationRequest, CustomerResult, NotificationResult,
    NotificationService, PaymentService,
};
use hallbook_config::AccessConfig;
use hallbook_store::{
    Booking, BookingRepository, BookingStatus, DepositState, DepositStatus, InMemoryBookingStore,
    PaymentStatus,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, serde_json::Value)>>,
    fail: bool,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

impl NotificationService for RecordingNotifier {
    type Error = BoxedError;

    fn send_templated(
        &self,
        template: &str,
        to: &str,
        data: serde_json::Value,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let fail = self.fail;
        if !fail {
            self.sent
                .lock()
                .unwrap()
                .push((template.to_string(), to.to_string(), data));
        }
        Box::pin(async move {
            if fail {
                Err(BoxedError::msg("mail API down"))
            } else {
                Ok(NotificationResult {
                    id: "msg-1".to_string(),
                    status: "queued".to_string(),
                })
            }
        })
    }
}

struct FakePayments;

impl PaymentService for FakePayments {
    type Error = BoxedError;

    fn find_or_create_customer(
        &self,
        _email: &str,
        _name: &str,
    ) -> BoxFuture<'_, CustomerResult, Self::Error> {
        Box::pin(async move {
            Ok(CustomerResult {
                id: "cus_1".to_string(),
            })
        })
    }

    fn create_authorization(
        &self,
        request: CreateAuthorizationRequest,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error> {
        let amount = request.amount;
        let currency = request.currency;
        Box::pin(async move {
            Ok(AuthorizationResult {
                id: "pi_1".to_string(),
                status: "requires_confirmation".to_string(),
                amount,
                currency,
            })
        })
    }

    fn confirm_authorization(
        &self,
        authorization_id: &str,
        _payment_method: &str,
    ) -> BoxFuture<'_, AuthorizationResult, Self::Error> {
        let id = authorization_id.to_string();
        Box::pin(async move {
            Ok(AuthorizationResult {
                id,
                status: "requires_capture".to_string(),
                amount: 50_000,
                currency: "chf".to_string(),
            })
        })
    }
}

struct FakeLock {
    issued: Mutex<u32>,
}

impl AccessControlService for FakeLock {
    type Error = BoxedError;

    fn create_code(
        &self,
        _device_id: &str,
        _name: &str,
        _starts_at: DateTime<Utc>,
        _ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        *self.issued.lock().unwrap() += 1;
        Box::pin(async move {
            Ok(AccessCodeResult {
                code_id: "c1".to_string(),
                code: "482913".to_string(),
            })
        })
    }

    fn create_code_with_value(
        &self,
        _device_id: &str,
        _name: &str,
        code: &str,
        _starts_at: DateTime<Utc>,
        _ends_at: DateTime<Utc>,
    ) -> BoxFuture<'_, AccessCodeResult, Self::Error> {
        let code = code.to_string();
        Box::pin(async move {
            Ok(AccessCodeResult {
                code_id: "c2".to_string(),
                code,
            })
        })
    }

    fn list_codes(&self, _device_id: &str) -> BoxFuture<'_, Vec<AccessCodeEntry>, Self::Error> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn delete_code(&self, _device_id: &str, _code_id: &str) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { Ok(()) })
    }
}

// Saturday 2025-06-14, 18:00-21:00 in Zurich (16:00-19:00 UTC).
fn booking() -> Booking {
    let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        reference: "HB-AAAAAA".to_string(),
        customer_name: "Erika Muster".to_string(),
        customer_email: "erika@example.com".to_string(),
        customer_phone: None,
        event_date: date,
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_date: date,
        end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        price_cents: 90_000,
        payment_reference: None,
        payment_status: PaymentStatus::Succeeded,
        deposit: DepositState::new(50_000, Some("pm_1".to_string())),
        calendar_event_id: None,
        reminder_sent: false,
        followup_sent: false,
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    }
}

struct Harness {
    store: Arc<InMemoryBookingStore>,
    notifier: Arc<RecordingNotifier>,
    lock: Arc<FakeLock>,
    engine: TriggerEngine,
}

fn harness(notifier: RecordingNotifier) -> Harness {
    let store = Arc::new(InMemoryBookingStore::new());
    let notifier = Arc::new(notifier);
    let lock = Arc::new(FakeLock {
        issued: Mutex::new(0),
    });
    let access = Arc::new(AccessCodeManager::new(
        lock.clone(),
        &AccessConfig {
            base_url: "https://locks.example".to_string(),
            primary_device_id: "front-door".to_string(),
            secondary_device_id: None,
        },
        Zurich,
    ));
    let engine = TriggerEngine::new(
        store.clone(),
        Some(Arc::new(FakePayments)),
        Some(notifier.clone()),
        Some(access),
        "Gemeindesaal".to_string(),
        "chf".to_string(),
        3,
        Zurich,
    );
    Harness {
        store,
        notifier,
        lock,
        engine,
    }
}

#[tokio::test]
async fn reminder_fires_once_inside_its_window() {
    let h = harness(RecordingNotifier::new());
    let b = h.store.create(booking()).await.unwrap();

    // 30 hours before the 16:00 UTC start.
    let now = Utc.with_ymd_and_hms(2025, 6, 13, 10, 0, 0).unwrap();
    let summary = h.engine.run_pass(now).await.unwrap();
    assert_eq!(summary.reminders_sent, 1);

    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (template, to, data) = &sent[0];
    assert_eq!(template, "booking_reminder");
    assert_eq!(to, "erika@example.com");
    assert_eq!(data["access_code"], "482913");
    drop(sent);

    let after = h.store.get(b.id).await.unwrap().unwrap();
    assert!(after.reminder_sent);

    // Second tick in the same window changes nothing.
    let again = h.engine.run_pass(now).await.unwrap();
    assert_eq!(again.reminders_sent, 0);
    assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
    assert_eq!(*h.lock.issued.lock().unwrap(), 1);
}

#[tokio::test]
async fn reminder_stays_quiet_outside_its_window() {
    let h = harness(RecordingNotifier::new());
    h.store.create(booking()).await.unwrap();

    // 96 hours out: too early.
    let early = Utc.with_ymd_and_hms(2025, 6, 10, 16, 0, 0).unwrap();
    let summary = h.engine.run_pass(early).await.unwrap();
    assert_eq!(summary.reminders_sent, 0);

    // 12 hours out: too late, the window has closed.
    let late = Utc.with_ymd_and_hms(2025, 6, 14, 4, 0, 0).unwrap();
    let summary = h.engine.run_pass(late).await.unwrap();
    assert_eq!(summary.reminders_sent, 0);
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn followup_fires_after_the_event() {
    let h = harness(RecordingNotifier::new());
    let b = h.store.create(booking()).await.unwrap();

    // 30 hours past the 19:00 UTC end.
    let now = Utc.with_ymd_and_hms(2025, 6, 16, 1, 0, 0).unwrap();
    let summary = h.engine.run_pass(now).await.unwrap();
    assert_eq!(summary.followups_sent, 1);

    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent[0].0, "booking_followup");
    drop(sent);

    let after = h.store.get(b.id).await.unwrap().unwrap();
    assert!(after.followup_sent);

    let again = h.engine.run_pass(now).await.unwrap();
    assert_eq!(again.followups_sent, 0);
}

#[tokio::test]
async fn deposit_authorizes_exactly_three_local_days_before() {
    let h = harness(RecordingNotifier::new());
    let b = h.store.create(booking()).await.unwrap();

    // Two days out, then four days out: neither fires.
    for day in [12, 10] {
        let now = Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap();
        let summary = h.engine.run_pass(now).await.unwrap();
        assert_eq!(summary.deposits_authorized, 0);
    }

    // June 11 in Zurich is exactly three days before June 14.
    let now = Utc.with_ymd_and_hms(2025, 6, 11, 10, 0, 0).unwrap();
    let summary = h.engine.run_pass(now).await.unwrap();
    assert_eq!(summary.deposits_authorized, 1);

    let after = h.store.get(b.id).await.unwrap().unwrap();
    assert_eq!(after.deposit.status, DepositStatus::Authorized);
    assert_eq!(after.deposit.authorization_id.as_deref(), Some("pi_1"));

    let sent = h.notifier.sent.lock().unwrap();
    assert_eq!(sent[0].0, "deposit_authorized");
    drop(sent);

    // A later tick on the same day is a no-op.
    let again = h.engine.run_pass(now).await.unwrap();
    assert_eq!(again.deposits_authorized, 0);
}

#[tokio::test]
async fn notification_failure_leaves_the_flag_unset() {
    let h = harness(RecordingNotifier::failing());
    let b = h.store.create(booking()).await.unwrap();

    let now = Utc.with_ymd_and_hms(2025, 6, 13, 10, 0, 0).unwrap();
    let summary = h.engine.run_pass(now).await.unwrap();
    assert_eq!(summary.reminders_sent, 0);
    assert_eq!(summary.failed, 1);

    // The flag was not set, so a later pass will retry the send.
    let after = h.store.get(b.id).await.unwrap().unwrap();
    assert!(!after.reminder_sent);
}

#[tokio::test]
async fn cancelled_bookings_are_not_examined() {
    let h = harness(RecordingNotifier::new());
    let mut b = booking();
    b.status = BookingStatus::Cancelled;
    h.store.create(b).await.unwrap();

    let now = Utc.with_ymd_and_hms(2025, 6, 13, 10, 0, 0).unwrap();
    let summary = h.engine.run_pass(now).await.unwrap();
    assert_eq!(summary.examined, 0);
    assert!(h.notifier.sent.lock().unwrap().is_empty());
}
