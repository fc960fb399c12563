//! Detail stage: product links → raw specification tables

use std::sync::Arc;
use tracing::info;

use super::error::{PipelineError, PipelineResult};
use crate::domain::services::PageFetcher;
use crate::domain::spec_table::DetailTable;
use crate::infrastructure::parsing::{ContextualParser, DetailParseContext, SpecTableParser};

/// Fetches the specification table of every harvested link
pub struct DetailTableFetcher {
    fetcher: Arc<dyn PageFetcher>,
    parser: SpecTableParser,
}

impl DetailTableFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: SpecTableParser) -> Self {
        Self { fetcher, parser }
    }

    /// One table per link, in link order; repeated links are fetched again
    pub async fn fetch_all(&self, links: &[String]) -> PipelineResult<Vec<DetailTable>> {
        let total = links.len();
        let mut tables = Vec::with_capacity(total);

        for (index, link) in links.iter().enumerate() {
            info!("Extracting spec data {} out of {}...", index, total);

            let body = self
                .fetcher
                .fetch_text(link)
                .await
                .map_err(|e| PipelineError::fetch(link, e))?;

            let table = self
                .parser
                .parse_document(&body, &DetailParseContext::new(link.clone(), index))
                .map_err(|e| PipelineError::extraction(link, e))?;

            tables.push(DetailTable {
                link: link.clone(),
                table,
            });
        }

        Ok(tables)
    }
}
