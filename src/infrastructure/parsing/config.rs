//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors. Each field takes a list of selectors tried in
//! order; the first one that matches wins.

use serde::{Deserialize, Serialize};
use scraper::Selector;

use super::{ParsingError, ParsingResult};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Product listing selectors
    pub listing: ListingSelectors,

    /// Product detail selectors
    pub detail: DetailSelectors,
}

impl ParsingConfig {
    /// Compile every configured selector, failing on the first invalid one
    pub fn check(&self) -> ParsingResult<()> {
        let l = &self.listing;
        let d = &self.detail;
        for group in [
            &l.tile_group,
            &l.product_link,
            &l.brand,
            &l.model,
            &l.rating,
            &l.review_count,
            &l.upfront_cost,
            &l.monthly_pounds,
            &l.monthly_pence,
            &d.table,
            &d.row,
            &d.cell,
        ] {
            compile_selectors(group)?;
        }
        Ok(())
    }
}

/// CSS selectors for listing tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Repeated product tile groups
    pub tile_group: Vec<String>,

    /// Anchors carrying product links inside a tile group
    pub product_link: Vec<String>,

    pub brand: Vec<String>,
    pub model: Vec<String>,
    pub rating: Vec<String>,
    pub review_count: Vec<String>,
    pub upfront_cost: Vec<String>,

    /// Whole-pound part of the monthly price (Pay Monthly only)
    pub monthly_pounds: Vec<String>,

    /// Pence part of the monthly price (Pay Monthly only)
    pub monthly_pence: Vec<String>,

    /// Markers stripped from the pence text, e.g. the `*` footnote
    pub pence_markers: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            tile_group: vec!["div.device-tile-wrapper".to_string()],
            product_link: vec!["a[href]".to_string()],
            brand: vec!["span.brand-name".to_string()],
            model: vec!["div.model-family".to_string()],
            rating: vec!["span[itemprop='ratingValue']".to_string()],
            review_count: vec!["span[itemprop='bestRating']".to_string()],
            upfront_cost: vec!["span.headline".to_string()],
            monthly_pounds: vec!["span.costVal".to_string()],
            monthly_pence: vec!["span.costPence".to_string()],
            pence_markers: vec!["*".to_string()],
        }
    }
}

/// CSS selectors for detail page specification tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Specification table; the first match in document order is used
    pub table: Vec<String>,

    /// Rows inside the table
    pub row: Vec<String>,

    /// Cells inside a row
    pub cell: Vec<String>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            table: vec!["table".to_string()],
            row: vec!["tr".to_string()],
            cell: vec!["th, td".to_string()],
        }
    }
}

/// Compile selector strings into `Selector` objects
pub fn compile_selectors(selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    if selector_strings.is_empty() {
        return Err(ParsingError::invalid_selector("<empty>", "no selectors configured"));
    }

    selector_strings
        .iter()
        .map(|s| Selector::parse(s).map_err(|e| ParsingError::invalid_selector(s, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        assert!(ParsingConfig::default().check().is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let mut config = ParsingConfig::default();
        config.listing.brand = vec!["span[".to_string()];
        let err = config.check().unwrap_err();
        assert!(matches!(err, ParsingError::InvalidSelector { ref selector, .. } if selector == "span["));
    }

    #[test]
    fn test_empty_selector_list_is_rejected() {
        assert!(compile_selectors(&[]).is_err());
    }
}
