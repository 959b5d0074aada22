// --- File: crates/hallbook_gcal/src/parser.rs ---
//! Extraction of booking metadata from calendar events.
//!
//! Events created by this system carry structured private extended
//! properties. Events created or edited by hand in the calendar UI only
//! have a text description, so a label-line parser covers those. The
//! composite parser tries structured first and falls back to text.

use hallbook_common::services::{BookedEvent, CalendarEvent};
use std::collections::HashMap;

pub const META_REFERENCE: &str = "hallbook_reference";
pub const META_EVENT_TYPE: &str = "hallbook_event_type";
pub const META_CONTACT_NAME: &str = "hallbook_contact_name";
pub const META_CONTACT_EMAIL: &str = "hallbook_contact_email";
pub const META_CONTACT_PHONE: &str = "hallbook_contact_phone";
pub const META_ATTENDEE_COUNT: &str = "hallbook_attendee_count";
pub const META_ORGANIZATION: &str = "hallbook_organization";
pub const META_SPECIAL_REQUIREMENTS: &str = "hallbook_special_requirements";

/// Booking details recovered from a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventBookingMetadata {
    pub booking_reference: Option<String>,
    pub event_type: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub attendee_count: Option<u32>,
    pub organization: Option<String>,
    pub special_requirements: Option<String>,
}

impl EventBookingMetadata {
    /// Whether enough was recovered to treat the event as a booking event:
    /// either the stable reference, or event type plus the contact identity
    /// pair. Bare `Name:`/`Email:` lines in a hand-written event are not
    /// enough.
    pub fn is_matchable(&self) -> bool {
        self.booking_reference.is_some()
            || (self.event_type.is_some()
                && self.contact_name.is_some()
                && self.contact_email.is_some())
    }
}

/// A strategy for recovering booking metadata from an event.
pub trait EventMetadataParser: Send + Sync {
    /// Returns `None` when the event carries nothing this strategy can use.
    fn parse(&self, event: &BookedEvent) -> Option<EventBookingMetadata>;
}

/// Reads the structured private extended properties this system writes.
pub struct StructuredMetadataParser;

impl EventMetadataParser for StructuredMetadataParser {
    fn parse(&self, event: &BookedEvent) -> Option<EventBookingMetadata> {
        let meta = event.metadata.as_ref()?;

        let parsed = EventBookingMetadata {
            booking_reference: meta.get(META_REFERENCE).cloned(),
            event_type: meta.get(META_EVENT_TYPE).cloned(),
            contact_name: meta.get(META_CONTACT_NAME).cloned(),
            contact_email: meta.get(META_CONTACT_EMAIL).cloned(),
            contact_phone: meta.get(META_CONTACT_PHONE).cloned(),
            attendee_count: meta.get(META_ATTENDEE_COUNT).and_then(|v| v.parse().ok()),
            organization: meta.get(META_ORGANIZATION).cloned(),
            special_requirements: meta.get(META_SPECIAL_REQUIREMENTS).cloned(),
        };

        if parsed.is_matchable() {
            Some(parsed)
        } else {
            None
        }
    }
}

/// Parses `Label: value` lines out of the free-text event description.
pub struct DescriptionParser;

impl DescriptionParser {
    fn labelled_value(line: &str, label: &str) -> Option<String> {
        let rest = line.strip_prefix(label)?;
        let value = rest.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl EventMetadataParser for DescriptionParser {
    fn parse(&self, event: &BookedEvent) -> Option<EventBookingMetadata> {
        let description = event.description.as_deref()?;

        let mut parsed = EventBookingMetadata::default();
        for line in description.lines() {
            let line = line.trim();
            if let Some(v) = Self::labelled_value(line, "Booking ID:") {
                parsed.booking_reference = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Event Type:") {
                parsed.event_type = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Name:") {
                parsed.contact_name = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Email:") {
                parsed.contact_email = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Phone:") {
                parsed.contact_phone = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Guests:") {
                parsed.attendee_count = v.parse().ok();
            } else if let Some(v) = Self::labelled_value(line, "Organization:") {
                parsed.organization = Some(v);
            } else if let Some(v) = Self::labelled_value(line, "Special Requirements:") {
                parsed.special_requirements = Some(v);
            }
        }

        if parsed.is_matchable() {
            Some(parsed)
        } else {
            None
        }
    }
}

/// Structured properties first, description text as fallback.
pub struct CompositeParser {
    structured: StructuredMetadataParser,
    description: DescriptionParser,
}

impl CompositeParser {
    pub fn new() -> Self {
        Self {
            structured: StructuredMetadataParser,
            description: DescriptionParser,
        }
    }
}

impl Default for CompositeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMetadataParser for CompositeParser {
    fn parse(&self, event: &BookedEvent) -> Option<EventBookingMetadata> {
        self.structured
            .parse(event)
            .or_else(|| self.description.parse(event))
    }
}

/// Render the structured properties written onto created events.
pub fn render_metadata(meta: &EventBookingMetadata) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut put = |key: &str, value: &Option<String>| {
        if let Some(v) = value {
            map.insert(key.to_string(), v.clone());
        }
    };
    put(META_REFERENCE, &meta.booking_reference);
    put(META_EVENT_TYPE, &meta.event_type);
    put(META_CONTACT_NAME, &meta.contact_name);
    put(META_CONTACT_EMAIL, &meta.contact_email);
    put(META_CONTACT_PHONE, &meta.contact_phone);
    put(META_ORGANIZATION, &meta.organization);
    put(META_SPECIAL_REQUIREMENTS, &meta.special_requirements);
    if let Some(n) = meta.attendee_count {
        map.insert(META_ATTENDEE_COUNT.to_string(), n.to_string());
    }
    map
}

/// Render the human-readable description written onto created events. Uses
/// the same labels the description parser reads back.
pub fn render_description(meta: &EventBookingMetadata) -> String {
    let mut lines = Vec::new();
    if let Some(v) = &meta.booking_reference {
        lines.push(format!("Booking ID: {}", v));
    }
    if let Some(v) = &meta.event_type {
        lines.push(format!("Event Type: {}", v));
    }
    if let Some(v) = &meta.contact_name {
        lines.push(format!("Name: {}", v));
    }
    if let Some(v) = &meta.contact_email {
        lines.push(format!("Email: {}", v));
    }
    if let Some(v) = &meta.contact_phone {
        lines.push(format!("Phone: {}", v));
    }
    if let Some(n) = meta.attendee_count {
        lines.push(format!("Guests: {}", n));
    }
    if let Some(v) = &meta.organization {
        lines.push(format!("Organization: {}", v));
    }
    if let Some(v) = &meta.special_requirements {
        lines.push(format!("Special Requirements: {}", v));
    }
    lines.join("\n")
}

/// Build a full calendar event payload for a booking.
pub fn render_event(
    summary: String,
    start_time: String,
    end_time: String,
    meta: &EventBookingMetadata,
) -> CalendarEvent {
    CalendarEvent {
        start_time,
        end_time,
        summary,
        description: Some(render_description(meta)),
        metadata: Some(render_metadata(meta)),
    }
}
