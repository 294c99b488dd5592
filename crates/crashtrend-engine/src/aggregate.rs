//! Weighted folding of crash facets into per-day aggregates.

use crate::resolver::ResolvedVersions;
use crate::rules::{CategoryRule, RuleKind};
use crashtrend_api::{CrashDataSource, CrashesPerAduHits, FacetMode, FacetQuery};
use crashtrend_common::{capitalize, BucketCount, DailyAggregate, DailyRate, Day};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::info;

/// By-type bucket for crashes in plugin processes.
const OOP_PLUGIN: &str = "OOP Plugin";
/// By-type bucket for plugin hangs, counted separately upstream.
const HANG_PLUGIN: &str = "Hang Plugin";
/// By-type bucket for the main process.
const BROWSER: &str = "Browser";

/// Why a planned day produced no aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An upstream response was unusable; the day is retried next run.
    Fetch(String),
    /// No install counts or raw crashes are available for the day yet.
    NoData,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(message) => write!(f, "fetch failed: {message}"),
            Self::NoData => f.write_str("no data available yet"),
        }
    }
}

/// Outcome of aggregating one (product, channel, day).
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// The day folded into a persistable aggregate.
    Aggregate(DailyAggregate),
    /// The day was skipped; the reason says whether a later run retries it.
    Skip(SkipReason),
}

/// Folds install counts and crash facets into daily aggregates for one
/// (product, channel) pair.
pub struct AggregationEngine<'a, S: CrashDataSource> {
    source: &'a S,
    platforms: &'a [String],
}

impl<'a, S: CrashDataSource> AggregationEngine<'a, S> {
    /// Creates an engine over `source`; `platforms` scopes ADI queries.
    pub fn new(source: &'a S, platforms: &'a [String]) -> Self {
        Self { source, platforms }
    }

    /// Aggregates one day's crashes by crashing process type.
    ///
    /// Only versions present in both the facet response and the ADI
    /// response contribute; a version missing either is excluded without
    /// invalidating the rest of the day. A day with zero total installs
    /// is reported as [`SkipReason::NoData`] so a later run retries it.
    pub async fn aggregate_by_type(
        &self,
        product: &str,
        day: Day,
        resolved: &ResolvedVersions,
    ) -> DayOutcome {
        let adi_hits = match self
            .source
            .adi(product, &resolved.versions, day, self.platforms)
            .await
        {
            Ok(hits) => hits,
            Err(err) => return DayOutcome::Skip(SkipReason::Fetch(err.to_string())),
        };
        let adi: HashMap<&str, u64> = adi_hits
            .iter()
            .map(|hit| (hit.version.as_str(), hit.adi_count))
            .collect();

        let facets = match self
            .source
            .super_search(FacetQuery {
                product,
                versions: &resolved.versions,
                day,
                mode: FacetMode::TypeAndHang,
                extra_filters: &[],
            })
            .await
        {
            Ok(facets) => facets,
            Err(err) => return DayOutcome::Skip(SkipReason::Fetch(err.to_string())),
        };

        let mut total_install_count = 0u64;
        let mut crashes: BTreeMap<String, f64> = BTreeMap::new();
        for facet in &facets {
            let Some(&install_count) = adi.get(facet.term.as_str()) else {
                continue;
            };
            let Some(&tfactor) = resolved.weights.get(&facet.term) else {
                continue;
            };
            total_install_count += install_count;

            for hang in &facet.facets.plugin_hang {
                if hang.term == "T" {
                    *crashes.entry(HANG_PLUGIN.to_string()).or_default() +=
                        hang.count as f64 * tfactor;
                }
            }

            let mut nonbrowser = 0u64;
            for process in &facet.facets.process_type {
                let bucket = if process.term == "plugin" {
                    OOP_PLUGIN.to_string()
                } else {
                    capitalize(&process.term)
                };
                *crashes.entry(bucket).or_default() += process.count as f64 * tfactor;
                nonbrowser += process.count;
            }

            // The version total counts every process; what the process
            // facet does not cover crashed in the main process.
            *crashes.entry(BROWSER.to_string()).or_default() +=
                (facet.count as f64 - nonbrowser as f64) * tfactor;
        }

        // Hangs are a subset of the plugin-process count upstream;
        // subtract so the two buckets do not double count.
        if let Some(&hangs) = crashes.get(HANG_PLUGIN) {
            if let Some(oop) = crashes.get_mut(OOP_PLUGIN) {
                *oop -= hangs;
            }
        }

        if total_install_count == 0 {
            return DayOutcome::Skip(SkipReason::NoData);
        }
        DayOutcome::Aggregate(DailyAggregate {
            day,
            total_install_count,
            buckets: crashes
                .into_iter()
                .map(|(name, count)| (name, BucketCount::Scalar(count)))
                .collect(),
        })
    }

    /// Aggregates one day's category reports.
    ///
    /// Rules marked desktop-only are skipped for non-desktop products.
    /// `install_count` comes from the day's by-type aggregate, which must
    /// already exist before category data is attempted. The day yields a
    /// result only if at least one rule saw a non-zero raw count; a bad
    /// facet response abandons the whole day so no partial record is ever
    /// persisted.
    pub async fn aggregate_by_category(
        &self,
        product: &str,
        desktop_product: bool,
        day: Day,
        resolved: &ResolvedVersions,
        rules: &[CategoryRule],
        install_count: u64,
    ) -> DayOutcome {
        let mut buckets: BTreeMap<String, BucketCount> = BTreeMap::new();
        let mut raw_total = 0u64;

        for rule in rules.iter().filter(|r| r.applies_to(desktop_product)) {
            info!("    * {}", rule.name);

            let facets = match self
                .source
                .super_search(FacetQuery {
                    product,
                    versions: &resolved.versions,
                    day,
                    mode: FacetMode::ProcessOnly,
                    extra_filters: rule.filters,
                })
                .await
            {
                Ok(facets) => facets,
                Err(err) => return DayOutcome::Skip(SkipReason::Fetch(err.to_string())),
            };

            match rule.kind {
                RuleKind::ProcessSplit => {
                    let mut split: BTreeMap<String, f64> = BTreeMap::new();
                    for facet in &facets {
                        let Some(&tfactor) = resolved.weights.get(&facet.term) else {
                            continue;
                        };
                        let mut nonbrowser = 0u64;
                        for process in &facet.facets.process_type {
                            *split.entry(process.term.clone()).or_default() +=
                                process.count as f64 * tfactor;
                            nonbrowser += process.count;
                        }
                        *split.entry("browser".to_string()).or_default() +=
                            (facet.count as f64 - nonbrowser as f64) * tfactor;
                        raw_total += facet.count;
                    }
                    buckets.insert(rule.name.to_string(), BucketCount::PerProcess(split));
                }
                RuleKind::Scalar => {
                    let mut total = 0.0f64;
                    for facet in &facets {
                        let Some(&tfactor) = resolved.weights.get(&facet.term) else {
                            continue;
                        };
                        total += facet.count as f64 * tfactor;
                        raw_total += facet.count;
                    }
                    buckets.insert(rule.name.to_string(), BucketCount::Scalar(total));
                }
            }
        }

        if raw_total == 0 {
            return DayOutcome::Skip(SkipReason::NoData);
        }
        DayOutcome::Aggregate(DailyAggregate {
            day,
            total_install_count: install_count,
            buckets,
        })
    }
}

/// Folds `CrashesPerAdu` hits into per-version daily rates, weighting raw
/// report counts by each version's sampling factor.
///
/// Entries with neither crashes nor active users are not recorded.
/// Returns the folded entries and the newest day seen upstream, which the
/// caller compares against yesterday to spot lagging data.
pub fn fold_daily_rates(
    hits: &CrashesPerAduHits,
    weights: &HashMap<String, f64>,
) -> (Vec<(String, Day, DailyRate)>, Option<Day>) {
    let mut entries = Vec::new();
    let mut max_day: Option<Day> = None;
    for per_day in hits.values() {
        for (&day, hit) in per_day {
            if max_day.map_or(true, |m| m < day) {
                max_day = Some(day);
            }
            let Some(&tfactor) = weights.get(&hit.version) else {
                continue;
            };
            let crashes = hit.report_count * tfactor;
            if crashes > 0.0 || hit.adu > 0 {
                entries.push((
                    hit.version.clone(),
                    day,
                    DailyRate {
                        crashes,
                        adu: hit.adu,
                    },
                ));
            }
        }
    }
    (entries, max_day)
}
