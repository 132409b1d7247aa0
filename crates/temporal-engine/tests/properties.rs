use proptest::prelude::*;
use temporal_engine::{
    calendar, Calendar, DifferenceOptions, Duration, ErrorKind, Instant, Overflow, PlainDate,
    PlainDateTime, PlainTime, Unit,
};

const NS_MAX_INSTANT: i128 = 8_640_000_000_000_000_000_000;

fn plain_date() -> impl Strategy<Value = PlainDate> {
    (-9999i64..=9999, 1i64..=12, 1i64..=31).prop_map(|(y, m, d)| {
        PlainDate::new_with_overflow(y, m, d, Calendar::Iso8601, Overflow::Constrain).unwrap()
    })
}

fn plain_time() -> impl Strategy<Value = PlainTime> {
    (0i64..24, 0i64..60, 0i64..60, 0i64..1000, 0i64..1000, 0i64..1000)
        .prop_map(|(h, m, s, ms, us, ns)| PlainTime::try_new(h, m, s, ms, us, ns).unwrap())
}

/// Same-sign durations whose sub-second parts stay below one second, so the
/// canonical string carries every component back unchanged.
fn duration() -> impl Strategy<Value = Duration> {
    (
        prop::array::uniform4(0i64..500),
        prop::array::uniform3(0i64..100),
        prop::array::uniform3(0i64..1000),
        any::<bool>(),
    )
        .prop_map(|(date, clock, sub, negative)| {
            let mut fields = [0i64; 10];
            fields[..4].copy_from_slice(&date);
            fields[4..7].copy_from_slice(&clock);
            fields[7..].copy_from_slice(&sub);
            let d = Duration::from_components(fields).unwrap();
            if negative {
                d.negated()
            } else {
                d
            }
        })
}

proptest! {
    #[test]
    fn plain_date_round_trips(date in plain_date()) {
        let text = date.to_string();
        prop_assert_eq!(text.parse::<PlainDate>().unwrap(), date);
    }

    #[test]
    fn plain_date_time_round_trips(date in plain_date(), time in plain_time()) {
        let value = date.to_plain_date_time(Some(time)).unwrap();
        prop_assert_eq!(value.to_string().parse::<PlainDateTime>().unwrap(), value);
    }

    #[test]
    fn instant_round_trips(ns in -NS_MAX_INSTANT..=NS_MAX_INSTANT) {
        let instant = Instant::try_new(ns).unwrap();
        let parsed: Instant = instant.to_string().parse().unwrap();
        prop_assert_eq!(parsed.epoch_nanoseconds_i128(), ns);
        prop_assert_eq!(instant.epoch_nanoseconds(), ns.to_string());
    }

    #[test]
    fn duration_round_trips(d in duration()) {
        let parsed: Duration = d.to_string().parse().unwrap();
        prop_assert_eq!(parsed.components(), d.components());
    }

    #[test]
    fn duration_sign_is_shared(d in duration()) {
        let sign = d.sign();
        for value in d.components() {
            prop_assert!(value == 0 || value.signum() as i8 == sign);
        }
        prop_assert_eq!(d.negated().sign(), -sign);
        prop_assert_eq!(d.abs().sign(), sign.abs());
    }

    #[test]
    fn mixed_signs_are_rejected(a in 1i64..1000, b in 1i64..1000, i in 0usize..10, j in 0usize..10) {
        prop_assume!(i != j);
        let mut fields = [0i64; 10];
        fields[i] = a;
        fields[j] = -b;
        prop_assert!(Duration::from_components(fields).is_err());
    }

    #[test]
    fn duration_subtract_undoes_add(d in duration(), e in duration()) {
        match d.add(&e) {
            Ok(sum) => prop_assert_eq!(sum.subtract(&e).unwrap(), d),
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::Range);
                prop_assert!(d.sign() * e.sign() < 0);
            }
        }
    }

    #[test]
    fn leap_years_have_366_days(year in -271_820i32..275_760) {
        let leap = calendar::is_leap_year(year);
        prop_assert_eq!(calendar::days_in_year(year) == 366, leap);
        prop_assert_eq!(calendar::days_in_month(year, 2) == 29, leap);
        let total: u16 = (1..=12).map(|m| u16::from(calendar::days_in_month(year, m))).sum();
        prop_assert_eq!(total, calendar::days_in_year(year));
    }

    #[test]
    fn adding_days_is_invertible(date in plain_date(), days in -100_000i64..100_000) {
        let d = Duration::from_components([0, 0, 0, days, 0, 0, 0, 0, 0, 0]).unwrap();
        let moved = date.add(&d).unwrap();
        prop_assert_eq!(moved.subtract(&d).unwrap(), date);
    }

    #[test]
    fn until_then_add_lands_on_target(a in plain_date(), b in plain_date()) {
        for largest in [Unit::Year, Unit::Month, Unit::Week, Unit::Day] {
            let diff = a.until(&b, DifferenceOptions::largest(largest)).unwrap();
            prop_assert_eq!(a.add(&diff).unwrap(), b);
        }
    }

    #[test]
    fn since_negates_until(a in plain_date(), b in plain_date(), t in plain_time(), u in plain_time()) {
        let options = DifferenceOptions::default();
        prop_assert_eq!(
            a.since(&b, options).unwrap(),
            a.until(&b, options).unwrap().negated()
        );
        prop_assert_eq!(
            t.since(&u, options).unwrap(),
            t.until(&u, options).unwrap().negated()
        );
    }

    #[test]
    fn time_arithmetic_is_invertible(t in plain_time(), ns in -86_400_000_000_000i64..86_400_000_000_000) {
        let d = Duration::from_components([0, 0, 0, 0, 0, 0, 0, 0, 0, ns]).unwrap();
        prop_assert_eq!(t.add(&d).unwrap().subtract(&d).unwrap(), t);
    }

    #[test]
    fn instant_arithmetic_is_invertible(s in -1_000_000_000i64..1_000_000_000, ms in -1_000_000_000i64..1_000_000_000) {
        let start = Instant::from_epoch_seconds(s).unwrap();
        let d = Duration::from_components([0, 0, 0, 0, 0, 0, 0, ms, 0, 0]).unwrap();
        prop_assert_eq!(start.add(&d).unwrap().subtract(&d).unwrap(), start);
    }

    #[test]
    fn calendar_fields_stay_valid(date in plain_date()) {
        prop_assert!((1..=7).contains(&date.day_of_week()));
        prop_assert!((1..=53).contains(&date.week_of_year()));
        prop_assert!((28..=31).contains(&date.days_in_month()));
        prop_assert!(date.day() <= date.days_in_month());
        prop_assert!(date.day_of_year() <= date.days_in_year());
        prop_assert_eq!(date.in_leap_year(), calendar::is_leap_year(date.year()));
        prop_assert!((date.year_of_week() - date.year()).abs() <= 1);
    }
}
