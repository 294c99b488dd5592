//! Response models and query parameters for the crash-stats endpoints.

use crashtrend_common::Day;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One `ADI` hit: active install count for a version on one day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdiHit {
    /// Version the count belongs to.
    pub version: String,
    /// Active daily installations.
    pub adi_count: u64,
}

/// One term of a server-computed facet, e.g. a process type with its count.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetBucket {
    /// Facet term, e.g. `content` or `T`.
    pub term: String,
    /// Raw (throttled) crash count for the term.
    pub count: u64,
}

/// Sub-facets nested under one version term of a `SuperSearch` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubFacets {
    /// Counts grouped by crashing process type.
    #[serde(default)]
    pub process_type: Vec<FacetBucket>,
    /// Counts grouped by the boolean plugin-hang flag (`T`/`F`).
    #[serde(default)]
    pub plugin_hang: Vec<FacetBucket>,
}

/// One version term of a `SuperSearch` response, with its sub-facets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionFacet {
    /// Version string the counts belong to.
    pub term: String,
    /// Raw crash count for the version across all processes.
    pub count: u64,
    /// Nested per-process and per-hang-flag breakdowns.
    #[serde(default)]
    pub facets: SubFacets,
}

/// One row of the `CurrentVersions` catalog (the older catalog shape).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentVersion {
    /// Product the version belongs to.
    pub product: String,
    /// Version string.
    pub version: String,
    /// Last day the version is considered active.
    pub end_date: Day,
    /// Server-side sampling percentage in `(0, 100]`.
    pub throttle: f64,
}

/// One day's entry of a `CrashesPerAdu` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRateHit {
    /// Version string (repeated inside the nested mapping upstream).
    pub version: String,
    /// Raw (throttled) crash report count.
    pub report_count: f64,
    /// Active daily users for the version on that day.
    pub adu: u64,
}

/// `CrashesPerAdu` hits: version key to per-day entries.
pub type CrashesPerAduHits = BTreeMap<String, BTreeMap<Day, DailyRateHit>>;

/// Which facets a `SuperSearch` query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetMode {
    /// Per-version process-type and plugin-hang sub-facets (by-type data).
    TypeAndHang,
    /// Per-version process-type sub-facet only (category reports).
    ProcessOnly,
}

/// Parameters of one crash-facet (`SuperSearch`) query.
///
/// The standard filter restricts results to a product, a version list, and
/// the half-open interval `[day, day+1)`; category reports merge their own
/// filter parameters on top.
#[derive(Debug, Clone)]
pub struct FacetQuery<'a> {
    /// Product filter.
    pub product: &'a str,
    /// Versions to restrict the search to.
    pub versions: &'a [String],
    /// The day being aggregated.
    pub day: Day,
    /// Requested facet layout.
    pub mode: FacetMode,
    /// Report-specific filter parameters, appended as repeated keys.
    pub extra_filters: &'a [(&'static str, &'static [&'static str])],
}

impl FacetQuery<'_> {
    /// Renders the query as repeated key/value pairs for the HTTP layer.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("product".to_string(), self.product.to_string())];
        for version in self.versions {
            params.push(("version".to_string(), version.clone()));
        }
        params.push(("date".to_string(), format!(">={}", self.day)));
        params.push(("date".to_string(), format!("<{}", self.day.next())));
        params.push(("_aggs.version".to_string(), "process_type".to_string()));
        match self.mode {
            FacetMode::TypeAndHang => {
                params.push(("_aggs.version".to_string(), "plugin_hang".to_string()));
            }
            FacetMode::ProcessOnly => {
                params.push(("_facets".to_string(), "process_type".to_string()));
            }
        }
        params.push(("_results_number".to_string(), "0".to_string()));
        for (key, values) in self.extra_filters {
            for value in *values {
                params.push(((*key).to_string(), (*value).to_string()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crashtrend_common::test_utils::mock_day;

    #[test]
    fn facet_query_renders_standard_filter() {
        let versions = vec!["120.0".to_string(), "119.0".to_string()];
        let query = FacetQuery {
            product: "Firefox",
            versions: &versions,
            day: mock_day(2024, 1, 10),
            mode: FacetMode::TypeAndHang,
            extra_filters: &[],
        };
        let params = query.to_params();

        assert!(params.contains(&("product".to_string(), "Firefox".to_string())));
        assert!(params.contains(&("version".to_string(), "120.0".to_string())));
        assert!(params.contains(&("version".to_string(), "119.0".to_string())));
        assert!(params.contains(&("date".to_string(), ">=2024-01-10".to_string())));
        assert!(params.contains(&("date".to_string(), "<2024-01-11".to_string())));
        assert!(params.contains(&("_aggs.version".to_string(), "plugin_hang".to_string())));
        assert!(params.contains(&("_results_number".to_string(), "0".to_string())));
    }

    #[test]
    fn facet_query_appends_extra_filters_in_order() {
        let versions = vec!["120.0".to_string()];
        let query = FacetQuery {
            product: "Firefox",
            versions: &versions,
            day: mock_day(2024, 1, 10),
            mode: FacetMode::ProcessOnly,
            extra_filters: &[("signature", &["=OOM | small"])],
        };
        let params = query.to_params();

        assert!(params.contains(&("_facets".to_string(), "process_type".to_string())));
        assert!(!params.contains(&("_aggs.version".to_string(), "plugin_hang".to_string())));
        assert_eq!(
            params.last(),
            Some(&("signature".to_string(), "=OOM | small".to_string()))
        );
    }

    #[test]
    fn version_facet_deserializes_with_missing_subfacets() {
        let facet: VersionFacet =
            serde_json::from_str(r#"{"term": "120.0", "count": 120}"#).unwrap();
        assert_eq!(facet.term, "120.0");
        assert_eq!(facet.count, 120);
        assert!(facet.facets.process_type.is_empty());
        assert!(facet.facets.plugin_hang.is_empty());
    }
}
