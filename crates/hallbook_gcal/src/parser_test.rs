// --- File: crates/hallbook_gcal/src/parser_test.rs ---
use crate::parser::{
    render_description, render_metadata, CompositeParser, DescriptionParser,
    EventBookingMetadata, EventMetadataParser, StructuredMetadataParser, META_CONTACT_EMAIL,
    META_CONTACT_NAME, META_REFERENCE,
};
use hallbook_common::services::BookedEvent;
use std::collections::HashMap;

fn bare_event() -> BookedEvent {
    BookedEvent {
        event_id: "evt-1".to_string(),
        summary: "Hall rental".to_string(),
        description: None,
        start_time: "2025-06-14T18:00:00+02:00".to_string(),
        end_time: "2025-06-14T21:00:00+02:00".to_string(),
        status: "confirmed".to_string(),
        metadata: None,
    }
}

#[test]
fn structured_parser_reads_extended_properties() {
    let mut event = bare_event();
    let mut meta = HashMap::new();
    meta.insert(META_REFERENCE.to_string(), "HB-9F3A2C".to_string());
    meta.insert(META_CONTACT_NAME.to_string(), "Erika Muster".to_string());
    meta.insert(META_CONTACT_EMAIL.to_string(), "erika@example.com".to_string());
    event.metadata = Some(meta);

    let parsed = StructuredMetadataParser.parse(&event).unwrap();
    assert_eq!(parsed.booking_reference.as_deref(), Some("HB-9F3A2C"));
    assert_eq!(parsed.contact_name.as_deref(), Some("Erika Muster"));
    assert_eq!(parsed.contact_email.as_deref(), Some("erika@example.com"));
}

#[test]
fn description_parser_reads_labelled_lines() {
    let mut event = bare_event();
    event.description = Some(
        "Booking ID: HB-9F3A2C\n\
         Event Type: birthday\n\
         Name: Erika Muster\n\
         Email: erika@example.com\n\
         Guests: 40\n\
         Special Requirements: projector"
            .to_string(),
    );

    let parsed = DescriptionParser.parse(&event).unwrap();
    assert_eq!(parsed.booking_reference.as_deref(), Some("HB-9F3A2C"));
    assert_eq!(parsed.event_type.as_deref(), Some("birthday"));
    assert_eq!(parsed.attendee_count, Some(40));
    assert_eq!(parsed.special_requirements.as_deref(), Some("projector"));
}

#[test]
fn event_without_identity_is_not_matchable() {
    let mut event = bare_event();
    event.description = Some("Event Type: birthday\nGuests: 40".to_string());

    assert!(DescriptionParser.parse(&event).is_none());
    assert!(CompositeParser::new().parse(&event).is_none());
}

#[test]
fn contact_pair_without_event_type_is_not_a_booking_event() {
    let mut event = bare_event();
    event.description =
        Some("Name: Erika Muster\nEmail: erika@example.com".to_string());

    assert!(DescriptionParser.parse(&event).is_none());
    assert!(CompositeParser::new().parse(&event).is_none());
}

#[test]
fn event_type_with_contact_pair_is_matchable() {
    let mut event = bare_event();
    event.description = Some(
        "Event Type: birthday\nName: Erika Muster\nEmail: erika@example.com".to_string(),
    );

    let parsed = DescriptionParser.parse(&event).unwrap();
    assert!(parsed.booking_reference.is_none());
    assert!(parsed.is_matchable());
}

#[test]
fn composite_prefers_structured_over_description() {
    let mut event = bare_event();
    let mut meta = HashMap::new();
    meta.insert(META_REFERENCE.to_string(), "HB-STRUCT".to_string());
    meta.insert(META_CONTACT_NAME.to_string(), "Erika Muster".to_string());
    meta.insert(META_CONTACT_EMAIL.to_string(), "erika@example.com".to_string());
    event.metadata = Some(meta);
    event.description = Some("Booking ID: HB-TEXT\nName: X\nEmail: x@example.com".to_string());

    let parsed = CompositeParser::new().parse(&event).unwrap();
    assert_eq!(parsed.booking_reference.as_deref(), Some("HB-STRUCT"));
}

#[test]
fn rendered_description_parses_back() {
    let meta = EventBookingMetadata {
        booking_reference: Some("HB-9F3A2C".to_string()),
        event_type: Some("wedding".to_string()),
        contact_name: Some("Erika Muster".to_string()),
        contact_email: Some("erika@example.com".to_string()),
        contact_phone: Some("+41791234567".to_string()),
        attendee_count: Some(120),
        organization: None,
        special_requirements: None,
    };

    let mut event = bare_event();
    event.description = Some(render_description(&meta));
    let parsed = DescriptionParser.parse(&event).unwrap();
    assert_eq!(parsed, meta);
}

#[test]
fn rendered_metadata_omits_absent_fields() {
    let meta = EventBookingMetadata {
        booking_reference: Some("HB-9F3A2C".to_string()),
        contact_name: Some("Erika Muster".to_string()),
        contact_email: Some("erika@example.com".to_string()),
        ..Default::default()
    };

    let map = render_metadata(&meta);
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(META_REFERENCE).map(String::as_str), Some("HB-9F3A2C"));
}
