// --- File: crates/hallbook_gcal/src/service.rs ---
//! Google Calendar implementation of the CalendarService capability.
//!
//! Events carry booking metadata as private extended properties; floating
//! event times (all-day or zone-less) are surfaced as naive timestamps and
//! interpreted by callers in the venue's zone.

use chrono::{DateTime, Utc};
use google_calendar3::api::{Channel, Event, EventDateTime, EventExtendedProperties};
use hallbook_common::services::{
    BookedEvent, BoxFuture, BoxedError, CalendarEvent, CalendarEventResult, CalendarService,
    WatchChannel,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::auth::HubType;
use crate::error::GcalError;

fn boxed(err: GcalError) -> BoxedError {
    BoxedError(Box::new(err))
}

/// Google Calendar service backed by an authenticated hub.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    /// Token to stamp onto push channels; echoed back by Google on every
    /// notification so the webhook can verify provenance.
    channel_token: Option<String>,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>, channel_token: Option<String>) -> Self {
        Self {
            calendar_hub,
            channel_token,
        }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = BoxedError;

    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BookedEvent>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_, events_list) = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(time_min)
                .time_max(time_max)
                .single_events(true) // Expand recurring events
                .order_by("startTime")
                .doit()
                .await
                .map_err(|e| boxed(GcalError::ApiError(e)))?;

            let mut booked_events = Vec::new();

            if let Some(items) = events_list.items {
                for event in items {
                    let status = event.status.as_deref().unwrap_or("confirmed");
                    if status == "cancelled" {
                        continue;
                    }

                    let event_id = event.id.unwrap_or_default();
                    let summary = event.summary.unwrap_or_default();
                    let description = event.description;

                    // Zoned events become RFC3339; all-day events stay naive
                    // and are anchored by the caller.
                    let start_time = match event.start {
                        Some(start) => match start.date_time {
                            Some(dt) => dt.to_rfc3339(),
                            None => match start.date {
                                Some(d) => format!("{}T00:00:00", d),
                                None => {
                                    warn!("Skipping event {} with no start time", event_id);
                                    continue;
                                }
                            },
                        },
                        None => {
                            warn!("Skipping event {} with no start time", event_id);
                            continue;
                        }
                    };

                    let end_time = match event.end {
                        Some(end) => match end.date_time {
                            Some(dt) => dt.to_rfc3339(),
                            None => match end.date {
                                Some(d) => format!("{}T00:00:00", d),
                                None => {
                                    warn!("Skipping event {} with no end time", event_id);
                                    continue;
                                }
                            },
                        },
                        None => {
                            warn!("Skipping event {} with no end time", event_id);
                            continue;
                        }
                    };

                    let status = event.status.unwrap_or_else(|| "confirmed".to_string());
                    let metadata = event.extended_properties.and_then(|p| p.private);

                    booked_events.push(BookedEvent {
                        event_id,
                        summary,
                        description,
                        start_time,
                        end_time,
                        status,
                        metadata,
                    });
                }
            }

            Ok(booked_events)
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let start_dt = DateTime::parse_from_rfc3339(&event.start_time)
                .map_err(|e| {
                    boxed(GcalError::TimeParseError(format!("Invalid start_time: {}", e)))
                })?
                .with_timezone(&Utc);
            let end_dt = DateTime::parse_from_rfc3339(&event.end_time)
                .map_err(|e| boxed(GcalError::TimeParseError(format!("Invalid end_time: {}", e))))?
                .with_timezone(&Utc);

            if end_dt <= start_dt {
                return Err(boxed(GcalError::TimeParseError(
                    "End time must be after start time".to_string(),
                )));
            }

            let extended_properties = event.metadata.map(|m| EventExtendedProperties {
                private: Some(m),
                ..Default::default()
            });

            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(start_dt),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(end_dt),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                extended_properties,
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await
                .map_err(|e| boxed(GcalError::ApiError(e)))?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            // An event that is already gone counts as deleted.
            let get_result = calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await;

            let event = match get_result {
                Ok((_response, event)) => event,
                Err(e) if e.to_string().contains("404") => return Ok(()),
                Err(e) => return Err(boxed(GcalError::ApiError(e))),
            };

            let delete_result = calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await;

            match delete_result {
                Ok(_) => Ok(()),
                Err(e) => {
                    let status = event.status.as_deref().unwrap_or("confirmed");
                    // Cancelled events refuse direct deletion; restore then
                    // delete, and give up quietly if the restore fails too.
                    if status == "cancelled"
                        || e.to_string().contains("403")
                        || e.to_string().contains("400")
                    {
                        let sequence = event.sequence.map(|n| n + 1).unwrap_or(1);
                        let restored_event = Event {
                            status: Some("confirmed".to_string()),
                            sequence: Some(sequence),
                            ..Default::default()
                        };

                        let restore_result = calendar_hub
                            .events()
                            .patch(restored_event, &calendar_id, &event_id)
                            .send_updates("none")
                            .doit()
                            .await;

                        match restore_result {
                            Ok(_) => {
                                calendar_hub
                                    .events()
                                    .delete(&calendar_id, &event_id)
                                    .send_updates("none")
                                    .doit()
                                    .await
                                    .map_err(|e| boxed(GcalError::ApiError(e)))?;
                                Ok(())
                            }
                            Err(_) => {
                                warn!(
                                    "Could not fully delete event {}, attempted restore and delete",
                                    event_id
                                );
                                Ok(())
                            }
                        }
                    } else {
                        Err(boxed(GcalError::ApiError(e)))
                    }
                }
            }
        })
    }

    fn watch(
        &self,
        calendar_id: &str,
        callback_url: &str,
    ) -> BoxFuture<'_, WatchChannel, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let callback_url = callback_url.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let token = self.channel_token.clone();

        Box::pin(async move {
            let channel = Channel {
                id: Some(Uuid::new_v4().to_string()),
                type_: Some("web_hook".to_string()),
                address: Some(callback_url),
                token,
                ..Default::default()
            };

            let (_response, registered) = calendar_hub
                .events()
                .watch(channel, &calendar_id)
                .doit()
                .await
                .map_err(|e| boxed(GcalError::ApiError(e)))?;

            Ok(WatchChannel {
                channel_id: registered.id.unwrap_or_default(),
                resource_id: registered.resource_id.unwrap_or_default(),
                expiration: registered.expiration,
            })
        })
    }

    fn stop(&self, channel_id: &str, resource_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let channel_id = channel_id.to_string();
        let resource_id = resource_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let channel = Channel {
                id: Some(channel_id),
                resource_id: Some(resource_id),
                ..Default::default()
            };

            calendar_hub
                .channels()
                .stop(channel)
                .doit()
                .await
                .map_err(|e| boxed(GcalError::ApiError(e)))?;

            Ok(())
        })
    }
}
