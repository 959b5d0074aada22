// --- File: crates/hallbook_notify/src/templates.rs ---
//! Template names and data payloads for the booking lifecycle mails.
//!
//! The mail API renders the templates server-side; this module only
//! decides which template fires and what data it gets.

use hallbook_store::Booking;
use serde_json::{json, Value};

pub const TEMPLATE_REMINDER: &str = "booking_reminder";
pub const TEMPLATE_FOLLOWUP: &str = "booking_followup";
pub const TEMPLATE_DEPOSIT_AUTHORIZED: &str = "deposit_authorized";

fn base_data(booking: &Booking, venue_name: &str) -> Value {
    json!({
        "reference": booking.reference,
        "customer_name": booking.customer_name,
        "venue_name": venue_name,
        "event_date": booking.event_date.to_string(),
        "start_time": booking.start_time.format("%H:%M").to_string(),
        "end_time": booking.end_time.format("%H:%M").to_string(),
    })
}

/// Data for the pre-event reminder. The access code is included when one
/// was issued; the template omits the door section otherwise.
pub fn reminder_data(booking: &Booking, venue_name: &str, access_code: Option<&str>) -> Value {
    let mut data = base_data(booking, venue_name);
    if let Some(code) = access_code {
        data["access_code"] = json!(code);
    }
    data
}

/// Data for the post-event follow-up.
pub fn followup_data(booking: &Booking, venue_name: &str) -> Value {
    base_data(booking, venue_name)
}

/// Data for the deposit-hold confirmation.
pub fn deposit_authorized_data(booking: &Booking, venue_name: &str, currency: &str) -> Value {
    let mut data = base_data(booking, venue_name);
    data["deposit_amount"] = json!(format!(
        "{}.{:02} {}",
        booking.deposit.amount_cents / 100,
        booking.deposit.amount_cents % 100,
        currency.to_uppercase()
    ));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use hallbook_store::{Booking, BookingStatus, DepositState, PaymentStatus};
    use uuid::Uuid;

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
            end_time: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            price_cents: 90_000,
            payment_reference: None,
            payment_status: PaymentStatus::Succeeded,
            deposit: DepositState::new(50_000, None),
            calendar_event_id: None,
            reminder_sent: false,
            followup_sent: false,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reminder_includes_code_only_when_issued() {
        let with = reminder_data(&booking(), "Gemeindesaal", Some("482913"));
        assert_eq!(with["access_code"], "482913");
        assert_eq!(with["start_time"], "18:00");

        let without = reminder_data(&booking(), "Gemeindesaal", None);
        assert!(without.get("access_code").is_none());
    }

    #[test]
    fn deposit_amount_is_formatted_in_major_units() {
        let data = deposit_authorized_data(&booking(), "Gemeindesaal", "chf");
        assert_eq!(data["deposit_amount"], "500.00 CHF");
    }
}
