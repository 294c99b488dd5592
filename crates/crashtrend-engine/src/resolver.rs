//! Per-day resolution of eligible product versions and sampling weights.

use crashtrend_common::{Channel, Day, VersionInfo};
use std::collections::HashMap;
use tracing::warn;

/// The versions eligible for one (product, channel, day) and their
/// sampling-correction weights.
#[derive(Debug, Clone, Default)]
pub struct ResolvedVersions {
    /// Version strings eligible on the day, in catalog order.
    pub versions: Vec<String>,
    /// Per-version correction factors (`100 / throttle`).
    pub weights: HashMap<String, f64>,
}

impl ResolvedVersions {
    /// Whether no version qualified.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Filters `catalog` down to the versions of `product` on `channel` whose
/// start date falls inside the channel's build-age window before `day`.
///
/// `version_overall` widens the window for the channels that need it when
/// resolving a run's full version set. A version with a non-positive
/// throttle is dropped here with a warning; a broken catalog row must not
/// abort the day.
pub fn resolve(
    catalog: &[VersionInfo],
    product: &str,
    channel: Channel,
    day: Day,
    version_overall: bool,
) -> ResolvedVersions {
    let min_start = day.minus(channel.max_build_age(version_overall));
    let mut resolved = ResolvedVersions::default();
    for ver in catalog {
        if ver.product != product || ver.channel != channel || ver.start_date <= min_start {
            continue;
        }
        match ver.tfactor() {
            Ok(tfactor) => {
                resolved.weights.insert(ver.version.clone(), tfactor);
                resolved.versions.push(ver.version.clone());
            }
            Err(err) => warn!("Dropping {} {}: {}", ver.product, ver.version, err),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crashtrend_common::test_utils::{catalog_fixtures, mock_day};

    fn firefox_release(version: &str, start: Day, throttle: f64) -> VersionInfo {
        VersionInfo {
            product: "Firefox".to_string(),
            version: version.to_string(),
            channel: Channel::Release,
            start_date: start,
            throttle,
        }
    }

    #[test]
    fn resolve_filters_by_product_channel_and_age() {
        let catalog = catalog_fixtures::sample_catalog();
        let resolved = resolve(
            &catalog,
            "Firefox",
            Channel::Release,
            mock_day(2024, 1, 10),
            true,
        );

        // 119.0 started 2023-10-24, inside the 12-week release window;
        // the beta and Android rows do not match.
        assert_eq!(resolved.versions, vec!["120.0", "119.0"]);
        assert!((resolved.weights["120.0"] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resolve_excludes_versions_older_than_build_age() {
        let catalog = vec![firefox_release("118.0", mock_day(2023, 9, 1), 100.0)];
        let resolved = resolve(
            &catalog,
            "Firefox",
            Channel::Release,
            mock_day(2024, 1, 10),
            true,
        );
        assert!(resolved.is_empty());
    }

    #[test]
    fn resolve_boundary_start_date_is_excluded() {
        // Exactly `day - max_build_age` fails the strictly-after check.
        let day = mock_day(2024, 1, 10);
        let boundary = day.minus(Channel::Release.max_build_age(true));
        let catalog = vec![firefox_release("117.0", boundary, 100.0)];
        let resolved = resolve(&catalog, "Firefox", Channel::Release, day, true);
        assert!(resolved.is_empty());

        let catalog = vec![firefox_release("117.0", boundary.next(), 100.0)];
        let resolved = resolve(&catalog, "Firefox", Channel::Release, day, true);
        assert_eq!(resolved.versions, vec!["117.0"]);
    }

    #[test]
    fn resolve_computes_tfactor_from_throttle() {
        let catalog = vec![firefox_release("120.0", mock_day(2024, 1, 2), 10.0)];
        let resolved = resolve(
            &catalog,
            "Firefox",
            Channel::Release,
            mock_day(2024, 1, 10),
            true,
        );
        assert!((resolved.weights["120.0"] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resolve_drops_zero_throttle_versions_without_failing() {
        let catalog = vec![
            firefox_release("120.0", mock_day(2024, 1, 2), 0.0),
            firefox_release("119.0", mock_day(2023, 10, 24), 25.0),
        ];
        let resolved = resolve(
            &catalog,
            "Firefox",
            Channel::Release,
            mock_day(2024, 1, 10),
            true,
        );

        assert_eq!(resolved.versions, vec!["119.0"]);
        assert!((resolved.weights["119.0"] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resolve_narrow_window_excludes_what_overall_window_keeps() {
        let catalog = vec![VersionInfo {
            product: "Firefox".to_string(),
            version: "122.0a1".to_string(),
            channel: Channel::Nightly,
            start_date: mock_day(2023, 12, 20),
            throttle: 100.0,
        }];
        let day = mock_day(2024, 1, 10);

        // 1-week nightly window misses a three-week-old build;
        // the 9-week overall window keeps it.
        assert!(resolve(&catalog, "Firefox", Channel::Nightly, day, false).is_empty());
        assert!(!resolve(&catalog, "Firefox", Channel::Nightly, day, true).is_empty());
    }

    mod throttle_properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tfactor_is_inverse_of_valid_throttle(throttle in 0.01f64..=100.0) {
                let catalog = vec![firefox_release("120.0", mock_day(2024, 1, 2), throttle)];
                let resolved = resolve(
                    &catalog,
                    "Firefox",
                    Channel::Release,
                    mock_day(2024, 1, 10),
                    true,
                );
                let tfactor = resolved.weights["120.0"];
                prop_assert!((tfactor * throttle / 100.0 - 1.0).abs() < 1e-9);
            }

            #[test]
            fn non_positive_throttle_never_yields_weights(throttle in -100.0f64..=0.0) {
                let catalog = vec![firefox_release("120.0", mock_day(2024, 1, 2), throttle)];
                let resolved = resolve(
                    &catalog,
                    "Firefox",
                    Channel::Release,
                    mock_day(2024, 1, 10),
                    true,
                );
                prop_assert!(resolved.is_empty());
            }
        }
    }
}
