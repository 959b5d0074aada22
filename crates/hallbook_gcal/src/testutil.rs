// --- File: crates/hallbook_gcal/src/testutil.rs ---
//! In-memory calendar double shared by the reconciliation and availability
//! tests.

use chrono::{DateTime, Utc};
use hallbook_common::services::{
    BookedEvent, BoxFuture, BoxedError, CalendarEvent, CalendarEventResult, CalendarService,
    WatchChannel,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct FakeCalendar {
    events: Mutex<Vec<BookedEvent>>,
    pub created: Mutex<Vec<CalendarEvent>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeCalendar {
    pub fn new(events: Vec<BookedEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

/// Build an event with zoned RFC3339 times and optional structured metadata.
pub fn event(
    event_id: &str,
    start_rfc3339: &str,
    end_rfc3339: &str,
    metadata: Option<HashMap<String, String>>,
) -> BookedEvent {
    BookedEvent {
        event_id: event_id.to_string(),
        summary: "Hall rental".to_string(),
        description: None,
        start_time: start_rfc3339.to_string(),
        end_time: end_rfc3339.to_string(),
        status: "confirmed".to_string(),
        metadata,
    }
}

impl CalendarService for FakeCalendar {
    type Error = BoxedError;

    fn list_events(
        &self,
        _calendar_id: &str,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error> {
        let events = self.events.lock().unwrap().clone();
        Box::pin(async move { Ok(events) })
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        self.created.lock().unwrap().push(event);
        Box::pin(async move {
            Ok(CalendarEventResult {
                event_id: Some("fake-event".to_string()),
                status: "confirmed".to_string(),
            })
        })
    }

    fn delete_event(&self, _calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        self.deleted.lock().unwrap().push(event_id.to_string());
        Box::pin(async move { Ok(()) })
    }

    fn watch(
        &self,
        _calendar_id: &str,
        _callback_url: &str,
    ) -> BoxFuture<'_, WatchChannel, Self::Error> {
        Box::pin(async move {
            Ok(WatchChannel {
                channel_id: "fake-channel".to_string(),
                resource_id: "fake-resource".to_string(),
                expiration: None,
            })
        })
    }

    fn stop(&self, _channel_id: &str, _resource_id: &str) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { Ok(()) })
    }
}
