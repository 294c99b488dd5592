//! Core domain types and error definitions for crash-data aggregation.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A calendar day in ISO `YYYY-MM-DD` form.
///
/// Ordering is chronological, which for this format coincides with the
/// lexicographic ordering of the serialized string, so `Day` keys stay
/// sorted on both sides of serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(pub NaiveDate);

impl Day {
    /// Parses a strict `YYYY-MM-DD` string.
    ///
    /// The input must be exactly ten characters of digits and dashes and
    /// must round-trip through date parsing unchanged, so syntactically
    /// plausible but invalid dates (`2021-13-40`) and unpadded forms
    /// (`2021-1-1`) are rejected.
    pub fn parse_strict(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 {
            return None;
        }
        let well_formed = bytes.iter().enumerate().all(|(i, b)| {
            if i == 4 || i == 7 {
                *b == b'-'
            } else {
                b.is_ascii_digit()
            }
        });
        if !well_formed {
            return None;
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        let day = Self(date);
        (day.to_string() == s).then_some(day)
    }

    /// Today's date in UTC.
    pub fn today_utc() -> Self {
        Self(Utc::now().date_naive())
    }

    /// The following calendar day.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    /// The day `delta` before this one.
    #[must_use]
    pub fn minus(self, delta: Duration) -> Self {
        Self(self.0 - delta)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A release train with its own version cadence and build-age window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Stable release channel.
    Release,
    /// Beta channel.
    Beta,
    /// Aurora / developer edition channel.
    Aurora,
    /// Nightly channel.
    Nightly,
    /// Catch-all for unrecognized build types.
    #[serde(other)]
    Other,
}

impl Channel {
    /// Maps an upstream catalog `build_type` value onto a channel.
    pub fn from_build_type(s: &str) -> Self {
        match s {
            "release" => Self::Release,
            "beta" => Self::Beta,
            "aurora" => Self::Aurora,
            "nightly" => Self::Nightly,
            _ => Self::Other,
        }
    }

    /// The lowercase channel name as used in store file names and queries.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Aurora => "aurora",
            Self::Nightly => "nightly",
            Self::Other => "other",
        }
    }

    /// How far back a build may date and still count for this channel.
    ///
    /// `version_overall` selects the wider window used when resolving the
    /// full version set for a run rather than the builds of a single day.
    /// The `Other` age is an upper bound over every known channel, which is
    /// what makes it usable for the earliest-catalog-date computation.
    pub fn max_build_age(self, version_overall: bool) -> Duration {
        match self {
            Self::Release => Duration::weeks(12),
            Self::Beta => Duration::weeks(4),
            Self::Aurora if version_overall => Duration::weeks(9),
            Self::Aurora => Duration::weeks(2),
            Self::Nightly if version_overall => Duration::weeks(9),
            Self::Nightly => Duration::weeks(1),
            Self::Other => Duration::days(365),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the upstream version catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Product the version belongs to.
    pub product: String,
    /// Version string, e.g. `120.0`.
    pub version: String,
    /// Release channel the version ships on.
    pub channel: Channel,
    /// First day the version was live.
    pub start_date: Day,
    /// Server-side sampling percentage in `(0, 100]`.
    pub throttle: f64,
}

impl VersionInfo {
    /// Multiplicative correction that inflates sampled counts back to
    /// estimated true volume.
    ///
    /// A non-positive throttle is a fault in the upstream catalog; callers
    /// drop the version and keep processing the day.
    pub fn tfactor(&self) -> Result<f64> {
        if self.throttle > 0.0 {
            Ok(100.0 / self.throttle)
        } else {
            Err(CrashTrendError::DataIntegrity(format!(
                "throttle {} for {} {}",
                self.throttle, self.product, self.version
            )))
        }
    }
}

/// A single bucket value: a weighted scalar, or a per-process breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketCount {
    /// A single weighted crash count.
    Scalar(f64),
    /// Weighted crash counts split by process type.
    PerProcess(BTreeMap<String, f64>),
}

/// One day's aggregated crash counts for a (product, channel) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// The day the counts belong to.
    pub day: Day,
    /// Total active daily installations over the versions that contributed.
    pub total_install_count: u64,
    /// Weighted crash counts keyed by process-type or category name.
    pub buckets: BTreeMap<String, BucketCount>,
}

/// One day's crash volume and active installs for a single version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRate {
    /// Throttle-corrected crash count.
    pub crashes: f64,
    /// Active daily users reported for the version on that day.
    pub adu: u64,
}

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum CrashTrendError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Upstream data failed an integrity check.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Common result type for the workspace.
pub type Result<T> = std::result::Result<T, CrashTrendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_parses_and_displays_round_trip() {
        let day = Day::parse_strict("2024-01-10").unwrap();
        assert_eq!(day.to_string(), "2024-01-10");
        assert_eq!(day.next().to_string(), "2024-01-11");
    }

    #[test]
    fn day_rejects_invalid_and_unpadded_input() {
        assert!(Day::parse_strict("2021-13-40").is_none());
        assert!(Day::parse_strict("2021-1-1").is_none());
        assert!(Day::parse_strict("21-01-01").is_none());
        assert!(Day::parse_strict("2021/01/01").is_none());
        assert!(Day::parse_strict("2021-01-01x").is_none());
    }

    #[test]
    fn day_ordering_matches_string_ordering() {
        let a = Day::parse_strict("2023-12-31").unwrap();
        let b = Day::parse_strict("2024-01-01").unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn day_works_as_json_map_key() {
        let mut map = BTreeMap::new();
        map.insert(Day::parse_strict("2024-01-10").unwrap(), 1u32);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2024-01-10":1}"#);
        let back: BTreeMap<Day, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn channel_build_age_table() {
        assert_eq!(Channel::Release.max_build_age(true), Duration::weeks(12));
        assert_eq!(Channel::Beta.max_build_age(false), Duration::weeks(4));
        assert_eq!(Channel::Aurora.max_build_age(false), Duration::weeks(2));
        assert_eq!(Channel::Aurora.max_build_age(true), Duration::weeks(9));
        assert_eq!(Channel::Nightly.max_build_age(false), Duration::weeks(1));
        assert_eq!(Channel::Nightly.max_build_age(true), Duration::weeks(9));
        assert_eq!(Channel::Other.max_build_age(true), Duration::days(365));
    }

    #[test]
    fn channel_from_build_type() {
        assert_eq!(Channel::from_build_type("release"), Channel::Release);
        assert_eq!(Channel::from_build_type("esr"), Channel::Other);
    }

    #[test]
    fn tfactor_inverts_throttle() {
        let ver = VersionInfo {
            product: "Firefox".to_string(),
            version: "120.0".to_string(),
            channel: Channel::Release,
            start_date: Day::parse_strict("2024-01-01").unwrap(),
            throttle: 10.0,
        };
        assert!((ver.tfactor().unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tfactor_rejects_zero_throttle() {
        let ver = VersionInfo {
            product: "Firefox".to_string(),
            version: "120.0".to_string(),
            channel: Channel::Release,
            start_date: Day::parse_strict("2024-01-01").unwrap(),
            throttle: 0.0,
        };
        assert!(matches!(
            ver.tfactor(),
            Err(CrashTrendError::DataIntegrity(_))
        ));
    }

    #[test]
    fn bucket_count_serializes_untagged() {
        let scalar = BucketCount::Scalar(25.0);
        assert_eq!(serde_json::to_string(&scalar).unwrap(), "25.0");

        let mut per_process = BTreeMap::new();
        per_process.insert("browser".to_string(), 10.0);
        per_process.insert("content".to_string(), 5.0);
        let split = BucketCount::PerProcess(per_process);
        assert_eq!(
            serde_json::to_string(&split).unwrap(),
            r#"{"browser":10.0,"content":5.0}"#
        );
    }
}
