//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use crashtrend_common::{CrashTrendError, Result};
use std::path::PathBuf;
use tracing::debug;

/// Configuration loader bound to a TOML file path.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and validates the configuration file.
    pub async fn load(&self) -> Result<Config> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let config: Config = toml::from_str(&contents).map_err(|err| {
            CrashTrendError::Config(format!("parsing {}: {err}", self.path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file when it exists; a missing file yields the default
    /// configuration rather than an error.
    pub async fn load_or_default(&self) -> Result<Config> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let config: Config = toml::from_str(&contents).map_err(|err| {
                    CrashTrendError::Config(format!("parsing {}: {err}", self.path.display()))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Saves the configuration atomically through a same-directory temp
    /// file, so a failed write never truncates the previous file.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let rendered = toml::to_string_pretty(config).map_err(|err| {
            CrashTrendError::Config(format!("serializing configuration: {err}"))
        })?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => std::path::Path::new("."),
            };
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            std::io::Write::write_all(&mut tmp, rendered.as_bytes())?;
            tmp.persist(&path).map_err(|err| {
                CrashTrendError::Storage(format!("replacing {}: {}", path.display(), err))
            })?;
            Ok(())
        })
        .await
        .map_err(|err| CrashTrendError::Config(format!("config save task failed: {err}")))?
    }
}
