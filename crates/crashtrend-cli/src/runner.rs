//! Sequential run loops over products, channels, and days.

use crate::error::AppResult;
use chrono::Duration;
use crashtrend_api::CrashDataSource;
use crashtrend_common::{capitalize, Channel, Day};
use crashtrend_config::Config;
use crashtrend_engine::{
    fold_daily_rates, plan, resolve, AggregateStore, AggregationEngine, DailyRateStore,
    DayOutcome, CATEGORY_RULES,
};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// One gatherable data kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Per-process-type daily aggregates.
    ByType,
    /// Crash-signature category aggregates.
    Categories,
    /// Per-version daily crash rates.
    Daily,
}

/// Orchestrates one crashtrend run over a data source.
///
/// Each (product, channel) pair is processed independently and
/// sequentially; a failed per-run fetch aborts only the current data
/// kind, and per-day problems never abort a loop.
pub struct Runner<'a, S: CrashDataSource> {
    config: &'a Config,
    source: &'a S,
    data_dir: PathBuf,
    today: Day,
}

impl<'a, S: CrashDataSource> Runner<'a, S> {
    /// Creates a runner writing stores under `data_dir`. `today` anchors
    /// the backlog windows and is a parameter so tests never read the
    /// clock.
    pub fn new(config: &'a Config, source: &'a S, data_dir: PathBuf, today: Day) -> Self {
        Self {
            config,
            source,
            data_dir,
            today,
        }
    }

    /// Runs the given data kinds in order. Every kind is attempted even
    /// when an earlier one failed; the first error is reported at the end
    /// so the process still exits nonzero.
    pub async fn run(&self, kinds: &[DataKind], forced: &BTreeSet<Day>) -> AppResult<()> {
        let mut first_error = None;
        for &kind in kinds {
            let outcome = match kind {
                DataKind::ByType => self.run_by_type(forced).await,
                DataKind::Categories => self.run_categories(forced).await,
                DataKind::Daily => self.run_daily().await,
            };
            if let Err(err) = outcome {
                error!("{kind:?} task failed: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Gathers per-process-type daily aggregates for every configured
    /// (product, channel) pair.
    async fn run_by_type(&self, forced: &BTreeSet<Day>) -> AppResult<()> {
        let window = plan(self.today, self.config.run.bytype_backlog_days, forced);
        let Some(&earliest) = window.first() else {
            return Ok(());
        };

        let platforms = self.source.platforms().await?;
        let catalog = self.fetch_catalog(earliest).await?;
        let engine = AggregationEngine::new(self.source, &platforms);

        for product in &self.config.products {
            for &channel in &product.channels {
                let path = self.store_path(&product.name, channel, "bytype");
                let mut store = AggregateStore::load(&path)?;
                info!(
                    "Read stored {} {} per-type data ({} days)",
                    product.name,
                    capitalize(channel.as_str()),
                    store.len()
                );

                for &day in &window {
                    if !forced.contains(&day) && store.is_complete(day) {
                        continue;
                    }
                    info!(
                        "Fetching {} {} per-type daily data for {}",
                        product.name,
                        capitalize(channel.as_str()),
                        day
                    );
                    let resolved = resolve(&catalog, &product.name, channel, day, true);
                    match engine.aggregate_by_type(&product.name, day, &resolved).await {
                        DayOutcome::Aggregate(aggregate) => {
                            store.merge(aggregate, forced.contains(&day));
                        }
                        DayOutcome::Skip(reason) => {
                            warn!("Skipping {} {} {}: {reason}", product.name, channel, day);
                        }
                    }
                }
                store.save()?;
            }
        }
        Ok(())
    }

    /// Gathers category aggregates. A day is only attempted when its
    /// by-type aggregate already exists; that entry also supplies the
    /// recorded install count.
    async fn run_categories(&self, forced: &BTreeSet<Day>) -> AppResult<()> {
        let window = plan(self.today, self.config.run.bytype_backlog_days, forced);
        let Some(&earliest) = window.first() else {
            return Ok(());
        };

        let catalog = self.fetch_catalog(earliest).await?;
        let engine = AggregationEngine::new(self.source, &[]);

        for product in &self.config.products {
            for &channel in &product.channels {
                let path = self.store_path(&product.name, channel, "categories");
                let mut store = AggregateStore::load(&path)?;
                let bytype_store =
                    AggregateStore::load(self.store_path(&product.name, channel, "bytype"))?;
                info!(
                    "Read stored {} {} category data ({} days)",
                    product.name,
                    capitalize(channel.as_str()),
                    store.len()
                );

                for &day in &window {
                    if !forced.contains(&day) && store.contains(day) {
                        continue;
                    }
                    let Some(install_count) =
                        bytype_store.get(day).map(|a| a.total_install_count)
                    else {
                        continue;
                    };
                    info!(
                        "Category counts: looking at {} {} data for {}",
                        product.name,
                        capitalize(channel.as_str()),
                        day
                    );
                    let resolved = resolve(&catalog, &product.name, channel, day, true);
                    match engine
                        .aggregate_by_category(
                            &product.name,
                            product.desktop,
                            day,
                            &resolved,
                            CATEGORY_RULES,
                            install_count,
                        )
                        .await
                    {
                        DayOutcome::Aggregate(aggregate) => {
                            store.merge(aggregate, forced.contains(&day));
                        }
                        DayOutcome::Skip(reason) => {
                            warn!("Skipping {} {} {}: {reason}", product.name, channel, day);
                        }
                    }
                }
                store.save()?;
            }
        }
        Ok(())
    }

    /// Gathers per-version daily crash rates for every configured product.
    async fn run_daily(&self) -> AppResult<()> {
        let day_start = self
            .today
            .minus(Duration::days(i64::from(self.config.run.backlog_days)));
        let day_end = self.today.minus(Duration::days(1));

        for product in &self.config.products {
            let path = self.data_dir.join(format!("{}-daily.json", product.name));
            let mut store = DailyRateStore::load(&path)?;

            let catalog = self.source.current_versions().await?;
            let mut versions = Vec::new();
            let mut weights = HashMap::new();
            for ver in catalog {
                if ver.product != product.name || ver.end_date <= day_start {
                    continue;
                }
                if ver.throttle > 0.0 {
                    weights.insert(ver.version.clone(), 100.0 / ver.throttle);
                    versions.push(ver.version);
                } else {
                    warn!(
                        "Dropping {} {}: throttle {}",
                        ver.product, ver.version, ver.throttle
                    );
                }
            }

            info!("Fetch daily data for {} {}", product.name, versions.join(", "));
            let hits = self
                .source
                .crashes_per_adu(&product.name, &versions, day_start, day_end)
                .await?;
            let (entries, max_day) = fold_daily_rates(&hits, &weights);
            for (version, day, rate) in entries {
                store.record(&version, day, rate);
            }
            match max_day {
                Some(max) if max < day_end => error!(
                    "Last day retrieved for {} is {max} while yesterday was {day_end}",
                    product.name
                ),
                None => warn!("No daily data retrieved for {}", product.name),
                _ => {}
            }
            store.save()?;
        }
        Ok(())
    }

    /// One catalog fetch covers every product and channel of the run:
    /// the unknown-channel build age bounds all per-channel windows.
    async fn fetch_catalog(
        &self,
        earliest: Day,
    ) -> AppResult<Vec<crashtrend_common::VersionInfo>> {
        let start = earliest.minus(Channel::Other.max_build_age(false));
        Ok(self
            .source
            .product_versions(&self.config.product_names(), start)
            .await?)
    }

    fn store_path(&self, product: &str, channel: Channel, kind: &str) -> PathBuf {
        self.data_dir
            .join(format!("{product}-{channel}-crashes-{kind}.json"))
    }
}
