//! Command-line interface definitions using clap.

use crate::runner::DataKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Daily crash-report aggregation from the crash-stats API.
#[derive(Debug, Parser)]
#[command(name = "crashtrend", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, env = "CRASHTREND_CONFIG", default_value = "crashtrend.toml")]
    pub config: PathBuf,

    /// Overrides the configured data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Data kind to gather; all kinds when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Data kinds the tool can gather.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-process-type daily aggregates.
    Bytype {
        /// Days to reprocess even when already complete (YYYY-MM-DD).
        dates: Vec<String>,
    },
    /// Crash-signature category aggregates.
    Categories {
        /// Days to reprocess even when already complete (YYYY-MM-DD).
        dates: Vec<String>,
    },
    /// Per-version daily crash rates.
    Daily,
    /// All data kinds in order.
    All {
        /// Days to reprocess even when already complete (YYYY-MM-DD).
        dates: Vec<String>,
    },
}

impl Cli {
    /// The data kinds this invocation processes, in run order.
    pub fn kinds(&self) -> Vec<DataKind> {
        match &self.command {
            Some(Command::Bytype { .. }) => vec![DataKind::ByType],
            Some(Command::Categories { .. }) => vec![DataKind::Categories],
            Some(Command::Daily) => vec![DataKind::Daily],
            Some(Command::All { .. }) | None => {
                vec![DataKind::ByType, DataKind::Categories, DataKind::Daily]
            }
        }
    }

    /// Raw forced-date arguments, still unvalidated.
    pub fn forced_date_args(&self) -> &[String] {
        match &self.command {
            Some(Command::Bytype { dates })
            | Some(Command::Categories { dates })
            | Some(Command::All { dates }) => dates,
            Some(Command::Daily) | None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_runs_everything() {
        let cli = Cli::try_parse_from(["crashtrend"]).unwrap();
        assert_eq!(
            cli.kinds(),
            vec![DataKind::ByType, DataKind::Categories, DataKind::Daily]
        );
        assert!(cli.forced_date_args().is_empty());
    }

    #[test]
    fn bytype_collects_forced_dates() {
        let cli =
            Cli::try_parse_from(["crashtrend", "bytype", "2024-01-10", "2024-01-11"]).unwrap();
        assert_eq!(cli.kinds(), vec![DataKind::ByType]);
        assert_eq!(cli.forced_date_args(), ["2024-01-10", "2024-01-11"]);
    }

    #[test]
    fn daily_takes_no_dates() {
        let cli = Cli::try_parse_from(["crashtrend", "daily"]).unwrap();
        assert_eq!(cli.kinds(), vec![DataKind::Daily]);
        assert!(cli.forced_date_args().is_empty());
    }

    #[test]
    fn config_path_has_a_default() {
        let cli = Cli::try_parse_from(["crashtrend"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("crashtrend.toml"));
    }
}
