//! Product list parser
//!
//! Extracts one `ProductSummary` per product anchor found inside the
//! listing's tile groups. Extraction is strict: a tile missing any field
//! fails the whole page.

use super::config::{ListingSelectors, compile_selectors};
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::product::{
    ContractType, MONTHLY_PRICE_NOT_APPLICABLE, ProductSummary, format_reviews, round_rating,
};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Parser for extracting product summaries from listing pages
pub struct ProductListParser {
    tile_group_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    brand_selectors: Vec<Selector>,
    model_selectors: Vec<Selector>,
    rating_selectors: Vec<Selector>,
    review_count_selectors: Vec<Selector>,
    upfront_cost_selectors: Vec<Selector>,
    monthly_pounds_selectors: Vec<Selector>,
    monthly_pence_selectors: Vec<Selector>,
    pence_markers: Vec<String>,
}

impl ProductListParser {
    /// Create a new product list parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors) -> ParsingResult<Self> {
        Ok(Self {
            tile_group_selectors: compile_selectors(&selectors.tile_group)?,
            link_selectors: compile_selectors(&selectors.product_link)?,
            brand_selectors: compile_selectors(&selectors.brand)?,
            model_selectors: compile_selectors(&selectors.model)?,
            rating_selectors: compile_selectors(&selectors.rating)?,
            review_count_selectors: compile_selectors(&selectors.review_count)?,
            upfront_cost_selectors: compile_selectors(&selectors.upfront_cost)?,
            monthly_pounds_selectors: compile_selectors(&selectors.monthly_pounds)?,
            monthly_pence_selectors: compile_selectors(&selectors.monthly_pence)?,
            pence_markers: selectors.pence_markers.clone(),
        })
    }
}

impl ContextualParser for ProductListParser {
    type Output = Vec<ProductSummary>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let groups: Vec<ElementRef> = self
            .tile_group_selectors
            .iter()
            .map(|selector| html.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        debug!(
            "Found {} tile groups for segment '{}' on {}",
            groups.len(),
            context.segment,
            context.source_url
        );

        let mut products = Vec::new();
        for group in &groups {
            for anchor in Self::select_all(group, &self.link_selectors) {
                // Anchors without an href are not product links
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                products.push(self.extract_summary(&anchor, href, context)?);
            }
        }

        debug!(
            "Extracted {} products for segment '{}'",
            products.len(),
            context.segment
        );
        Ok(products)
    }
}

impl ProductListParser {
    /// Extract one summary from a product anchor
    fn extract_summary(
        &self,
        anchor: &ElementRef,
        href: &str,
        context: &ParseContext,
    ) -> ParsingResult<ProductSummary> {
        let brand = self.required_text(anchor, &self.brand_selectors, "brand")?;
        let model = self.required_text(anchor, &self.model_selectors, "model")?;
        let link = Self::resolve_link(&context.base_url, href)?;

        let rating_text = self.required_text(anchor, &self.rating_selectors, "rating")?;
        let rating = rating_text
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| ParsingError::invalid_number("rating", &rating_text))?;

        let review_count = self.required_text(anchor, &self.review_count_selectors, "review_count")?;
        let upfront_cost = self.required_text(anchor, &self.upfront_cost_selectors, "upfront_cost")?;

        let monthly_price = match context.segment {
            ContractType::PayMonthly => {
                let pounds = self.required_text(anchor, &self.monthly_pounds_selectors, "monthly_pounds")?;
                let pence = self.required_text(anchor, &self.monthly_pence_selectors, "monthly_pence")?;
                format!("{pounds}{}", self.strip_markers(&pence))
            }
            ContractType::PayAsYouGo => MONTHLY_PRICE_NOT_APPLICABLE.to_string(),
        };

        Ok(ProductSummary {
            brand,
            model,
            upfront_cost,
            monthly_price,
            link,
            rating: round_rating(rating),
            reviews: format_reviews(&review_count),
            contract_type: context.segment,
        })
    }

    /// Every element matching the first selector that matches anything
    fn select_all<'a>(element: &ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
        selectors
            .iter()
            .map(|selector| element.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    /// Trimmed text of the first element matched by any selector
    ///
    /// A matched but empty element still counts as present.
    fn required_text(&self, element: &ElementRef, selectors: &[Selector], field: &str) -> ParsingResult<String> {
        selectors
            .iter()
            .find_map(|selector| element.select(selector).next())
            .map(|e| e.text().collect::<String>().trim().to_string())
            .ok_or_else(|| ParsingError::required_field_missing(field, "product tile"))
    }

    fn strip_markers(&self, text: &str) -> String {
        let stripped = self
            .pence_markers
            .iter()
            .fold(text.to_string(), |acc, marker| acc.replace(marker.as_str(), ""));
        stripped.trim().to_string()
    }

    /// Join the base URL and the raw href without normalizing either
    fn resolve_link(base_url: &str, href: &str) -> ParsingResult<String> {
        let link = format!("{base_url}{href}");
        Url::parse(&link).map_err(|e| ParsingError::UrlResolutionFailed {
            url: link.clone(),
            reason: e.to_string(),
        })?;
        Ok(link)
    }
}
