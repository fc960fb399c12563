//! Listing stage: segment listing pages → product summaries + links

use std::sync::Arc;
use tracing::info;

use super::error::{PipelineError, PipelineResult};
use crate::domain::product::ListingHarvest;
use crate::domain::services::PageFetcher;
use crate::infrastructure::config::SiteConfig;
use crate::infrastructure::parsing::{ContextualParser, ParseContext, ProductListParser};

/// Collects product summaries from every configured segment
pub struct ListingFetcher {
    fetcher: Arc<dyn PageFetcher>,
    parser: ProductListParser,
    site: SiteConfig,
}

impl ListingFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: ProductListParser, site: SiteConfig) -> Self {
        Self { fetcher, parser, site }
    }

    /// Fetch and parse each segment's listing in order
    ///
    /// Products listed under several segments appear once per segment.
    pub async fn fetch_all(&self) -> PipelineResult<ListingHarvest> {
        let mut harvest = ListingHarvest::default();

        for &segment in &self.site.segments {
            let url = self.site.listing_url(segment);
            let body = self
                .fetcher
                .fetch_text(&url)
                .await
                .map_err(|e| PipelineError::fetch(&url, e))?;

            let context = ParseContext::new(segment, self.site.base_url.clone()).with_source_url(url.clone());
            let summaries = self
                .parser
                .parse_document(&body, &context)
                .map_err(|e| PipelineError::extraction(&url, e))?;

            info!("📋 {} products listed under '{}'", summaries.len(), segment);
            for summary in summaries {
                harvest.push(summary);
            }
        }

        Ok(harvest)
    }
}
