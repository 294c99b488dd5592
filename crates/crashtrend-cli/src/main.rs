//! Main entry point for crashtrend.

use clap::Parser;
use crashtrend_api::ApiClient;
use crashtrend_cli::{AppResult, Cli, Runner};
use crashtrend_common::Day;
use crashtrend_config::ConfigLoader;
use crashtrend_engine::verify_forced_dates;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crashtrend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!("Starting crashtrend");

    let mut config = ConfigLoader::new(&cli.config).load_or_default().await?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }
    config.validate().map_err(|err| {
        error!("Invalid configuration: {err}");
        err
    })?;

    let data_dir = config.resolve_data_dir().map_err(|err| {
        error!("No data path found, aborting!");
        err
    })?;

    let forced = verify_forced_dates(cli.forced_date_args().iter().map(String::as_str));
    let source = ApiClient::new(&config.api.base_url)?;
    let runner = Runner::new(&config, &source, data_dir, Day::today_utc());
    runner.run(&cli.kinds(), &forced).await
}
