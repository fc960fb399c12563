//! handset-scraper binary: run the scrape pipeline once
//!
//! Usage: `handset-scraper [--config <path>]`. Exits non-zero when the run
//! fails; nothing is uploaded in that case.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use handset_scraper::application::ScrapePipeline;
use handset_scraper::infrastructure::{
    ConfigManager, HttpClient, LocalObjectStore, SystemClock, init_logging_with_config,
    logging::log_system_info,
};

fn config_path_from_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config requires a path")?;
                path = Some(PathBuf::from(value));
            }
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let manager = match config_path_from_args()? {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config = manager
        .load_config()
        .with_context(|| format!("Failed to load configuration from {:?}", manager.config_path()))?;

    init_logging_with_config(&config.logging)?;
    log_system_info();
    info!("Configuration file: {:?}", manager.config_path());

    let fetcher = Arc::new(HttpClient::new(config.http.clone())?);
    let storage = Arc::new(LocalObjectStore::new(config.storage.root_dir.clone()));
    let pipeline = ScrapePipeline::from_config(&config, Arc::new(SystemClock), fetcher, storage)?;

    match pipeline.run().await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                rows = report.merged_rows,
                columns = report.columns,
                bytes = report.bytes,
                digest = %report.digest,
                "Published {}",
                report.object_name
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), "Run aborted, nothing was published");
            Err(e.into())
        }
    }
}
