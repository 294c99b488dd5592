//! Test utilities and shared test helpers for the crashtrend workspace.
//!
//! This module provides common fixtures and helper functions used across
//! the workspace crates for unit and integration testing.

use crate::types::{Channel, Day, VersionInfo};

#[cfg(feature = "tracing-subscriber")]
use std::sync::Once;
#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
#[cfg(feature = "tracing-subscriber")]
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        fmt().with_test_writer().with_env_filter(filter).init();
    });
}

/// No-op version when tracing-subscriber is not available.
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {}

/// Test fixture for creating a day from its components.
pub fn mock_day(year: i32, month: u32, day: u32) -> Day {
    Day(chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Version-catalog fixtures shared by resolver and engine tests.
pub mod catalog_fixtures {
    use super::*;

    /// A catalog row with the given coordinates and a 100% throttle.
    pub fn version(product: &str, version: &str, channel: Channel, start: Day) -> VersionInfo {
        VersionInfo {
            product: product.to_string(),
            version: version.to_string(),
            channel,
            start_date: start,
            throttle: 100.0,
        }
    }

    /// A small mixed catalog: two Firefox release versions, one beta,
    /// one Android release row.
    pub fn sample_catalog() -> Vec<VersionInfo> {
        vec![
            version("Firefox", "120.0", Channel::Release, mock_day(2024, 1, 2)),
            version("Firefox", "119.0", Channel::Release, mock_day(2023, 10, 24)),
            version("Firefox", "121.0b5", Channel::Beta, mock_day(2023, 12, 20)),
            version(
                "FennecAndroid",
                "120.0",
                Channel::Release,
                mock_day(2024, 1, 2),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_mock_day() {
        let day = mock_day(2024, 1, 10);
        assert_eq!(day.to_string(), "2024-01-10");
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(1.0, 0.9999, 0.001);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.05);
    }

    #[test]
    fn test_sample_catalog_products() {
        let catalog = catalog_fixtures::sample_catalog();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.iter().any(|v| v.product == "FennecAndroid"));
    }
}
