use chrono::{NaiveDate, NaiveDateTime};
use surftemp_core::error::EngineError;
use surftemp_core::timestamp::{parse_instant, MinuteRounding, TimestampNormalizer};
use surftemp_parser::{GroundRecord, Product, SatelliteRecord, SatelliteSource, TimeOfDay};

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn aqua_day(date: &str, hours: Option<f64>, value: f64) -> SatelliteRecord {
    SatelliteRecord {
        date: date.to_string(),
        view_time_hours: hours,
        value,
        source: SatelliteSource::modis(Product::Aqua, TimeOfDay::Day),
    }
}

#[test]
fn fractional_hour_becomes_minutes() {
    let normalizer = TimestampNormalizer::default();
    let ts = normalizer.normalize("2020-06-15", Some(14.5)).unwrap();
    assert_eq!(ts, at("2020-06-15 14:30:00"));

    let ts = normalizer.normalize("2020-06-15", Some(9.25)).unwrap();
    assert_eq!(ts, at("2020-06-15 09:15:00"));
}

#[test]
fn date_without_time_is_midnight() {
    let normalizer = TimestampNormalizer::default();
    let ts = normalizer.normalize("2021-03-04", None).unwrap();
    assert_eq!(ts, at("2021-03-04 00:00:00"));
}

#[test]
fn full_instant_is_accepted_without_view_time() {
    let normalizer = TimestampNormalizer::default();
    let ts = normalizer.normalize("2021-03-04 07:45:10", None).unwrap();
    assert_eq!(ts, at("2021-03-04 07:45:10"));

    let ts = normalizer.normalize("2021-03-04T07:45", None);
    assert!(matches!(ts, Err(EngineError::MalformedTimestamp { .. })));
}

#[test]
fn malformed_date_is_rejected() {
    let normalizer = TimestampNormalizer::default();
    for bad in ["2020/01/01", "not a date", "2020-13-01", ""] {
        let result = normalizer.normalize(bad, Some(10.0));
        assert!(
            matches!(result, Err(EngineError::MalformedTimestamp { .. })),
            "{bad:?} should be malformed"
        );
    }
}

#[test]
fn view_time_outside_day_is_rejected() {
    let normalizer = TimestampNormalizer::default();
    for hours in [24.0, -0.5, f64::NAN, f64::INFINITY] {
        let result = normalizer.normalize("2020-01-01", Some(hours));
        assert!(matches!(result, Err(EngineError::MalformedTimestamp { .. })));
    }
}

#[test]
fn floor_rounding_never_reaches_sixty_minutes() {
    let normalizer = TimestampNormalizer::new(MinuteRounding::Floor);
    let ts = normalizer.normalize("2020-01-01", Some(14.9999)).unwrap();
    assert_eq!(ts, at("2020-01-01 14:59:00"));
}

#[test]
fn nearest_rounding_rolls_over_hour_and_day() {
    let normalizer = TimestampNormalizer::new(MinuteRounding::Nearest);

    let ts = normalizer.normalize("2020-01-01", Some(14.9999)).unwrap();
    assert_eq!(ts, at("2020-01-01 15:00:00"));

    let ts = normalizer.normalize("2020-12-31", Some(23.9999)).unwrap();
    assert_eq!(ts, at("2021-01-01 00:00:00"));
}

#[test]
fn at_fractional_hour_keeps_seconds_at_zero() {
    let normalizer = TimestampNormalizer::default();
    let day = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
    let ts = normalizer.at_fractional_hour(day, 0.75).unwrap();
    assert_eq!(ts, at("2020-02-29 00:45:00"));
}

#[test]
fn satellite_batch_skips_bad_rows_and_keeps_order() {
    let records = vec![
        aqua_day("2020-01-01", Some(10.5), 21.0),
        aqua_day("2020-01-xx", Some(10.5), 22.0),
        aqua_day("2020-01-03", Some(11.0), f64::NAN),
        aqua_day("2020-01-02", Some(13.0), 23.0),
    ];

    let normalized = TimestampNormalizer::default().normalize_satellite(&records);

    assert_eq!(normalized.series.len(), 2);
    assert_eq!(normalized.series[0].timestamp(), at("2020-01-01 10:30:00"));
    assert_eq!(normalized.series[1].timestamp(), at("2020-01-02 13:00:00"));
    assert!(normalized.series[0].source().is_satellite());

    let skipped: Vec<usize> = normalized.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2]);
    assert!(normalized.skipped[1].reason.contains("not finite"));
}

#[test]
fn ground_batch_requires_time_of_day() {
    let records = vec![
        GroundRecord::new("2020-01-01 09:00:00", 20.0),
        GroundRecord::new("2020-01-01", 21.0),
        GroundRecord::new("2020-01-01T09:10:00.250", 22.0),
    ];

    let normalized = TimestampNormalizer::default().normalize_ground(&records);

    assert_eq!(normalized.series.len(), 2);
    assert_eq!(normalized.skipped.len(), 1);
    assert_eq!(normalized.skipped[0].index, 1);
    assert_eq!(normalized.skipped[0].raw, "2020-01-01");
    assert!(parse_instant("2020-01-01").is_err());
}
