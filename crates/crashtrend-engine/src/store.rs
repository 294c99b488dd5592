//! Incrementally growing, day-ordered aggregate stores with atomic
//! persistence.

use crashtrend_common::{CrashTrendError, DailyAggregate, DailyRate, Day, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A day-ordered mapping of aggregates for one (product, channel) pair,
/// bound to the JSON file it persists to.
#[derive(Debug)]
pub struct AggregateStore {
    path: PathBuf,
    days: BTreeMap<Day, DailyAggregate>,
}

impl AggregateStore {
    /// Loads the store at `path`. A missing file is an empty store, not
    /// an error; anything else (unreadable file, malformed JSON) is.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let days = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, days })
    }

    /// Whether `day` already holds a completed entry, i.e. one with a
    /// non-zero install count. Zero-install entries never exist in a
    /// store, so presence alone implies completeness for merged data;
    /// the install check guards against hand-edited files.
    pub fn is_complete(&self, day: Day) -> bool {
        self.days
            .get(&day)
            .is_some_and(|aggregate| aggregate.total_install_count > 0)
    }

    /// Whether `day` has any entry at all.
    pub fn contains(&self, day: Day) -> bool {
        self.days.contains_key(&day)
    }

    /// The aggregate recorded for `day`, if any.
    pub fn get(&self, day: Day) -> Option<&DailyAggregate> {
        self.days.get(&day)
    }

    /// Number of recorded days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the store has no recorded days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The recorded days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.keys().copied()
    }

    /// Merges a computed aggregate under the skip rule: an existing
    /// completed entry wins unless the day was forced, and a zero-install
    /// aggregate is never stored so the day stays retryable. Returns
    /// whether the store changed.
    pub fn merge(&mut self, aggregate: DailyAggregate, forced: bool) -> bool {
        if aggregate.total_install_count == 0 {
            return false;
        }
        if !forced && self.is_complete(aggregate.day) {
            return false;
        }
        self.days.insert(aggregate.day, aggregate);
        true
    }

    /// Writes the full day-ordered mapping, replacing prior content.
    /// The write goes through a same-directory temp file and an atomic
    /// rename, so a failed save never leaves a truncated store behind.
    pub fn save(&self) -> Result<()> {
        write_json_atomically(&self.path, &self.days)
    }
}

/// Per-product store of per-version daily crash rates, from the
/// `CrashesPerAdu` data kind.
#[derive(Debug)]
pub struct DailyRateStore {
    path: PathBuf,
    versions: BTreeMap<String, BTreeMap<Day, DailyRate>>,
}

impl DailyRateStore {
    /// Loads the store at `path`; a missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let versions = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, versions })
    }

    /// Records (or overwrites) the rate for one version and day.
    pub fn record(&mut self, version: &str, day: Day, rate: DailyRate) {
        self.versions
            .entry(version.to_string())
            .or_default()
            .insert(day, rate);
    }

    /// The rate recorded for one version and day, if any.
    pub fn get(&self, version: &str, day: Day) -> Option<&DailyRate> {
        self.versions.get(version).and_then(|days| days.get(&day))
    }

    /// Whether no rates are recorded.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Writes the full version- and day-ordered mapping atomically.
    pub fn save(&self) -> Result<()> {
        write_json_atomically(&self.path, &self.versions)
    }
}

/// Serializes `value` as JSON to `path` through a same-directory temp
/// file and an atomic rename.
fn write_json_atomically<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut tmp, value)?;
    tmp.persist(path).map_err(|err| {
        CrashTrendError::Storage(format!("replacing {}: {}", path.display(), err))
    })?;
    Ok(())
}
