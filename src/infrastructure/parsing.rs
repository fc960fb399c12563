//! HTML parsing infrastructure
//!
//! Selector-driven extraction of listing tiles and detail page
//! specification tables.

pub mod config;
pub mod context;
pub mod error;
pub mod product_list_parser;
pub mod spec_table_parser;

// Re-export public types
pub use config::{DetailSelectors, ListingSelectors, ParsingConfig};
pub use context::{DetailParseContext, ParseContext};
pub use error::{ParsingError, ParsingResult};
pub use product_list_parser::ProductListParser;
pub use spec_table_parser::SpecTableParser;

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;

    /// Parse a raw document body
    fn parse_document(&self, body: &str, context: &Self::Context) -> ParsingResult<Self::Output> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }
}
