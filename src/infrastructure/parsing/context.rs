//! Parsing context for HTML extraction

use crate::domain::product::ContractType;

/// Context information for parsing a listing page
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Segment the listing page belongs to
    pub segment: ContractType,

    /// Base URL prepended to relative product hrefs
    pub base_url: String,

    /// URL the page was fetched from, for error messages
    pub source_url: String,
}

impl ParseContext {
    /// Create new parse context
    pub fn new(segment: ContractType, base_url: impl Into<String>) -> Self {
        Self {
            segment,
            base_url: base_url.into(),
            source_url: String::new(),
        }
    }

    /// Record the page URL
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }
}

/// Context for parsing a product detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Product link the page was fetched from; also the join key
    pub link: String,

    /// Position of the link in the harvested link list
    pub index: usize,
}

impl DetailParseContext {
    pub fn new(link: impl Into<String>, index: usize) -> Self {
        Self {
            link: link.into(),
            index,
        }
    }
}
