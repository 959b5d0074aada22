use super::*;
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // a few years around the ones the venue actually books
    (2024i32..2028, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn hourly_price_is_rate_times_duration(
        date in arb_date(),
        duration in 1i64..=7,
        hour in 0u32..24,
    ) {
        let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        let q = quote(date, BookingMode::Hourly, Some(duration), Some(start)).unwrap();
        let rate = if is_weekend(date) { 10_000 } else { 5_000 };
        prop_assert_eq!(q.price_cents, duration * rate);
    }

    #[test]
    fn full_day_price_independent_of_start(
        date in arb_date(),
        hour in 0u32..24,
    ) {
        let start = NaiveTime::from_hms_opt(hour, 0, 0).unwrap();
        let q = quote(date, BookingMode::FullDay, None, Some(start)).unwrap();
        let expected = if is_weekend(date) { 90_000 } else { 75_000 };
        prop_assert_eq!(q.price_cents, expected);
        prop_assert_eq!(q.window.start, full_day_start());
        prop_assert_eq!(q.window.end, full_day_end());
    }

    #[test]
    fn hourly_end_is_start_plus_duration(
        date in arb_date(),
        duration in 1i64..=7,
        hour in 0u32..24,
        minute in prop::sample::select(vec![0u32, 15, 30, 45]),
    ) {
        let start = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let q = quote(date, BookingMode::Hourly, Some(duration), Some(start)).unwrap();
        let expected_end = date.and_time(start) + Duration::hours(duration);
        prop_assert_eq!(q.window.end_date.and_time(q.window.end), expected_end);
        // rollover lands on the next calendar date, never wraps in place
        if hour as i64 + duration >= 24 {
            prop_assert_eq!(q.window.end_date, date + Duration::days(1));
        } else {
            prop_assert_eq!(q.window.end_date, date);
        }
    }

    #[test]
    fn discounts_never_go_negative(
        price in 0i64..200_000,
        value in 0i64..500_000,
        kind in prop::sample::select(vec![DiscountKind::Percent, DiscountKind::Fixed, DiscountKind::Full]),
    ) {
        let discounted = apply_discount(price, kind, value);
        prop_assert!(discounted >= 0);
        prop_assert!(discounted <= price);
    }
}
