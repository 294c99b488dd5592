//! Default values matching the standard deployment.

use crate::schema::{ApiConfig, Config, ProductConfig, RunConfig, StorageConfig};
use crashtrend_common::Channel;
use std::path::PathBuf;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            run: RunConfig::default(),
            products: default_products(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://crash-stats.mozilla.com/api/".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            search_paths: vec![
                PathBuf::from("/srv/crashtrend/data"),
                PathBuf::from("/var/lib/crashtrend"),
                PathBuf::from("data"),
            ],
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backlog_days: 7,
            bytype_backlog_days: 15,
            explosive_backlog_days: 20,
        }
    }
}

/// The standard product/channel map: desktop Firefox and Android, each
/// across all four release trains.
pub fn default_products() -> Vec<ProductConfig> {
    let channels = vec![
        Channel::Release,
        Channel::Beta,
        Channel::Aurora,
        Channel::Nightly,
    ];
    vec![
        ProductConfig {
            name: "Firefox".to_string(),
            desktop: true,
            channels: channels.clone(),
        },
        ProductConfig {
            name: "FennecAndroid".to_string(),
            desktop: false,
            channels,
        },
    ]
}
