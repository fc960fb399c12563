//! Scrape run orchestration
//!
//! Wires the listing, detail, merge and publish stages together and runs
//! them strictly in order. The first failure ends the run; nothing is
//! uploaded unless every earlier stage succeeded.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::detail_fetcher::DetailTableFetcher;
use super::error::{PipelineError, PipelineResult};
use super::listing_fetcher::ListingFetcher;
use super::merger::merge;
use super::publisher::{Publisher, upload_name};
use crate::domain::events::PipelineStage;
use crate::domain::services::{Clock, ObjectStorage, PageFetcher};
use crate::infrastructure::config::{AppConfig, SiteConfig};
use crate::infrastructure::parsing::{ParsingConfig, ProductListParser, SpecTableParser};

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub object_name: String,
    pub summaries: usize,
    pub detail_tables: usize,
    pub merged_rows: usize,
    pub columns: usize,
    pub fanned_out_links: usize,
    pub bytes: usize,
    pub digest: String,
    pub stage: PipelineStage,
}

/// One configured scrape-merge-publish run
pub struct ScrapePipeline {
    upload_prefix: String,
    clock: Arc<dyn Clock>,
    listing: ListingFetcher,
    details: DetailTableFetcher,
    publisher: Publisher,
}

impl ScrapePipeline {
    pub fn new(
        upload_prefix: impl Into<String>,
        bucket: impl Into<String>,
        site: SiteConfig,
        selectors: &ParsingConfig,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn ObjectStorage>,
    ) -> PipelineResult<Self> {
        let upload_prefix = upload_prefix.into();
        let bucket = bucket.into();

        if upload_prefix.trim().is_empty() {
            return Err(PipelineError::Configuration("upload prefix is empty".to_string()));
        }
        if bucket.trim().is_empty() {
            return Err(PipelineError::Configuration("bucket is empty".to_string()));
        }

        let list_parser = ProductListParser::with_config(&selectors.listing)
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let table_parser = SpecTableParser::with_config(&selectors.detail)
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(Self {
            upload_prefix,
            clock,
            listing: ListingFetcher::new(Arc::clone(&fetcher), list_parser, site),
            details: DetailTableFetcher::new(fetcher, table_parser),
            publisher: Publisher::new(storage, bucket),
        })
    }

    /// Build a pipeline from loaded configuration
    pub fn from_config(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn ObjectStorage>,
    ) -> PipelineResult<Self> {
        Self::new(
            config.publish.upload_prefix.clone(),
            config.publish.bucket.clone(),
            config.site.clone(),
            &config.selectors,
            clock,
            fetcher,
            storage,
        )
    }

    /// Execute the run once
    pub async fn run(&self) -> PipelineResult<PipelineReport> {
        let (_, result) = self.run_tracked().await;
        result
    }

    /// Run and report the stage the run ended in: `Done` or `Failed`
    async fn run_tracked(&self) -> (PipelineStage, PipelineResult<PipelineReport>) {
        let run_id = Uuid::new_v4();
        let span = info_span!("scrape_run", %run_id, bucket = self.publisher.bucket());

        let mut stage = PipelineStage::NotStarted;
        let result = self.execute(run_id, &mut stage).instrument(span).await;

        if let Err(e) = &result {
            error!(
                %run_id,
                kind = e.kind(),
                phase = %e.phase_hint(stage),
                "❌ Scrape run failed: {}",
                e
            );
            stage = PipelineStage::Failed;
        }
        debug!(%run_id, %stage, "Scrape run ended");
        (stage, result)
    }

    async fn execute(&self, run_id: Uuid, stage: &mut PipelineStage) -> PipelineResult<PipelineReport> {
        info!("🚀 Starting scrape run");

        *stage = stage.advance();
        let harvest = self.listing.fetch_all().await?;
        info!("✅ Listing phase complete: {} summaries", harvest.len());

        *stage = stage.advance();
        let tables = self.details.fetch_all(&harvest.links).await?;
        info!("✅ Detail phase complete: {} tables", tables.len());

        *stage = stage.advance();
        let dataset = merge(&harvest.summaries, &tables)?;
        info!(
            "✅ Merge complete: {} rows x {} columns",
            dataset.len(),
            dataset.columns.len()
        );

        *stage = stage.advance();
        let object_name = upload_name(&self.upload_prefix, self.clock.today());
        let receipt = self.publisher.publish(&dataset, &object_name).await?;

        *stage = stage.advance();
        info!("🎉 Scrape run finished: {}", receipt.object_name);

        Ok(PipelineReport {
            run_id,
            object_name: receipt.object_name,
            summaries: harvest.len(),
            detail_tables: tables.len(),
            merged_rows: dataset.len(),
            columns: dataset.columns.len(),
            fanned_out_links: dataset.fanned_out_links.len(),
            bytes: receipt.bytes,
            digest: receipt.digest,
            stage: *stage,
        })
    }
}

/// Run the pipeline once against the O2 shop with default site settings
pub async fn run_pipeline(
    upload_prefix: &str,
    bucket: &str,
    clock: Arc<dyn Clock>,
    fetcher: Arc<dyn PageFetcher>,
    storage: Arc<dyn ObjectStorage>,
) -> PipelineResult<PipelineReport> {
    ScrapePipeline::new(
        upload_prefix,
        bucket,
        SiteConfig::default(),
        &ParsingConfig::default(),
        clock,
        fetcher,
        storage,
    )?
    .run()
    .await
}
