use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).unwrap()
}

#[test]
fn saturday_full_day_is_900() {
    // 2025-06-14 is a Saturday
    let q = quote(date(2025, 6, 14), BookingMode::FullDay, None, None).unwrap();
    assert_eq!(q.price_cents, 90_000);
    assert_eq!(q.window.start, time(8, 0));
    assert_eq!(q.window.end, time(23, 0));
    assert_eq!(q.window.end_date, q.window.date);
}

#[test]
fn full_day_ignores_supplied_start_time() {
    let with_start = quote(
        date(2025, 6, 14),
        BookingMode::FullDay,
        Some(3),
        Some(time(13, 0)),
    )
    .unwrap();
    let without = quote(date(2025, 6, 14), BookingMode::FullDay, None, None).unwrap();
    assert_eq!(with_start.window, without.window);
    assert_eq!(with_start.price_cents, without.price_cents);
}

#[test]
fn tuesday_hourly_three_hours_is_150() {
    // 2025-06-10 is a Tuesday
    let q = quote(
        date(2025, 6, 10),
        BookingMode::Hourly,
        Some(3),
        Some(time(18, 0)),
    )
    .unwrap();
    assert_eq!(q.price_cents, 15_000);
    assert_eq!(q.window.start, time(18, 0));
    assert_eq!(q.window.end, time(21, 0));
    assert_eq!(q.window.end_date, q.window.date);
}

#[test]
fn friday_counts_as_weekend() {
    // 2025-06-13 is a Friday
    let q = quote(
        date(2025, 6, 13),
        BookingMode::Hourly,
        Some(2),
        Some(time(10, 0)),
    )
    .unwrap();
    assert_eq!(q.price_cents, 20_000);
    assert_eq!(
        quote(date(2025, 6, 13), BookingMode::FullDay, None, None)
            .unwrap()
            .price_cents,
        90_000
    );
}

#[test]
fn midnight_rollover_ends_on_next_date() {
    // start 22:00, 3 hours: ends 01:00 on the following date, not 01:00 same day
    let q = quote(
        date(2025, 6, 10),
        BookingMode::Hourly,
        Some(3),
        Some(time(22, 0)),
    )
    .unwrap();
    assert_eq!(q.window.end, time(1, 0));
    assert_eq!(q.window.end_date, date(2025, 6, 11));
}

#[test]
fn hourly_duration_out_of_range_rejected() {
    for bad in [0, 8, -1] {
        let err = quote(
            date(2025, 6, 10),
            BookingMode::Hourly,
            Some(bad),
            Some(time(10, 0)),
        )
        .unwrap_err();
        assert_eq!(err, PricingError::DurationOutOfRange(bad));
    }
}

#[test]
fn hourly_requires_start_and_duration() {
    assert_eq!(
        quote(date(2025, 6, 10), BookingMode::Hourly, None, Some(time(10, 0))).unwrap_err(),
        PricingError::MissingDuration
    );
    assert_eq!(
        quote(date(2025, 6, 10), BookingMode::Hourly, Some(2), None).unwrap_err(),
        PricingError::MissingStartTime
    );
}

#[test]
fn discount_percent_fixed_full() {
    assert_eq!(apply_discount(90_000, DiscountKind::Percent, 10), 81_000);
    assert_eq!(apply_discount(90_000, DiscountKind::Fixed, 20_000), 70_000);
    assert_eq!(apply_discount(90_000, DiscountKind::Full, 0), 0);
    // never below zero
    assert_eq!(apply_discount(5_000, DiscountKind::Fixed, 10_000), 0);
    assert_eq!(apply_discount(5_000, DiscountKind::Percent, 250), 0);
}

#[test]
fn window_instants_follow_venue_zone() {
    use chrono_tz::Europe::Zurich;
    let q = quote(
        date(2025, 6, 10),
        BookingMode::Hourly,
        Some(3),
        Some(time(22, 0)),
    )
    .unwrap();
    let start = q.window.start_in(Zurich);
    let end = q.window.end_in(Zurich);
    assert_eq!(end - start, Duration::hours(3));
    assert_eq!(start.time(), time(22, 0));
}
