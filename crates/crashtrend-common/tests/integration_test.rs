//! Integration tests for crashtrend-common crate.

use crashtrend_common::{BucketCount, Channel, Day, DailyAggregate, VersionInfo};
use std::collections::BTreeMap;

#[test]
fn test_daily_aggregate_serialization_field_names() {
    let mut buckets = BTreeMap::new();
    buckets.insert("Browser".to_string(), BucketCount::Scalar(1000.0));
    let aggregate = DailyAggregate {
        day: Day::parse_strict("2024-01-10").unwrap(),
        total_install_count: 500_000,
        buckets,
    };

    let json = serde_json::to_value(&aggregate).unwrap();
    assert_eq!(json["day"], "2024-01-10");
    assert_eq!(json["total_install_count"], 500_000);
    assert_eq!(json["buckets"]["Browser"], 1000.0);

    let back: DailyAggregate = serde_json::from_value(json).unwrap();
    assert_eq!(back, aggregate);
}

#[test]
fn test_channel_round_trips_through_serde() {
    for channel in [
        Channel::Release,
        Channel::Beta,
        Channel::Aurora,
        Channel::Nightly,
    ] {
        let json = serde_json::to_string(&channel).unwrap();
        assert_eq!(json, format!("\"{channel}\""));
        let back: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, channel);
    }

    // Unknown build types deserialize into the catch-all.
    let other: Channel = serde_json::from_str("\"esr\"").unwrap();
    assert_eq!(other, Channel::Other);
}

#[test]
fn test_version_info_catalog_row_round_trip() {
    let row = VersionInfo {
        product: "Firefox".to_string(),
        version: "120.0".to_string(),
        channel: Channel::Release,
        start_date: Day::parse_strict("2024-01-02").unwrap(),
        throttle: 10.0,
    };
    let json = serde_json::to_string(&row).unwrap();
    let back: VersionInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, row);
    assert!((back.tfactor().unwrap() - 10.0).abs() < f64::EPSILON);
}

mod forced_date_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_strict_accepts_exactly_what_it_formats(
            year in 1970i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let formatted = format!("{year:04}-{month:02}-{day:02}");
            let parsed = Day::parse_strict(&formatted).unwrap();
            prop_assert_eq!(parsed.to_string(), formatted);
        }

        #[test]
        fn parse_strict_never_panics(s in "\\PC*") {
            let _ = Day::parse_strict(&s);
        }
    }
}
