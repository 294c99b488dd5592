//! Configuration schema definitions using serde.

use crashtrend_common::{Channel, CrashTrendError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for crashtrend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Crash-stats API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Data storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Run window configuration.
    #[serde(default)]
    pub run: RunConfig,
    /// Products and the channels to process for each.
    #[serde(default = "crate::defaults::default_products")]
    pub products: Vec<ProductConfig>,
}

/// Crash-stats API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the crash-stats REST API.
    pub base_url: String,
}

/// Data storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit data directory; skips the candidate search when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Candidate directories tried in order when `data_dir` is unset.
    pub search_paths: Vec<PathBuf>,
}

/// Run window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Trailing window for the per-version daily totals.
    pub backlog_days: u32,
    /// Trailing window for by-type and category data.
    pub bytype_backlog_days: u32,
    /// Trailing window for the explosive-crash variants.
    pub explosive_backlog_days: u32,
}

/// One product to process and the channels it ships on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Product name as known to the crash-stats service.
    pub name: String,
    /// Whether the product is a desktop product; desktop-only category
    /// reports are skipped otherwise.
    pub desktop: bool,
    /// Channels to aggregate for the product.
    pub channels: Vec<Channel>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(CrashTrendError::Config(
                "API base URL cannot be empty".to_string(),
            ));
        }
        if self.storage.data_dir.is_none() && self.storage.search_paths.is_empty() {
            return Err(CrashTrendError::Config(
                "no data directory and no search paths configured".to_string(),
            ));
        }
        if self.run.backlog_days == 0 || self.run.bytype_backlog_days == 0 {
            return Err(CrashTrendError::Config(
                "backlog windows must cover at least one day".to_string(),
            ));
        }
        if self.products.is_empty() {
            return Err(CrashTrendError::Config(
                "no products configured".to_string(),
            ));
        }
        for product in &self.products {
            if product.channels.is_empty() {
                return Err(CrashTrendError::Config(format!(
                    "product {} has no channels",
                    product.name
                )));
            }
        }
        Ok(())
    }

    /// Resolves the directory the stores live in: the explicit
    /// `data_dir` when set, otherwise the first existing candidate.
    /// No usable directory is the one fatal configuration fault of a run.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        self.storage
            .data_dir
            .iter()
            .chain(self.storage.search_paths.iter())
            .find(|candidate| candidate.is_dir())
            .cloned()
            .ok_or_else(|| CrashTrendError::Config("no data path found".to_string()))
    }

    /// Product names, for the catalog query that spans all of them.
    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }
}
