//! Specification table parser for product detail pages
//!
//! Reads the first table of the page into a grid of cell texts. Rows come
//! from `<tr>` elements in document order, cells from `<th>`/`<td>`.
//! Header rows (`<thead>`, or leading all-`<th>` rows) are column labels,
//! not specifications, and are left out.

use super::config::{DetailSelectors, compile_selectors};
use super::{ContextualParser, DetailParseContext, ParsingError, ParsingResult};
use crate::domain::spec_table::RawTable;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Parser turning a detail page into a `RawTable`
pub struct SpecTableParser {
    table_selectors: Vec<Selector>,
    row_selectors: Vec<Selector>,
    cell_selectors: Vec<Selector>,
}

impl SpecTableParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            table_selectors: compile_selectors(&selectors.table)?,
            row_selectors: compile_selectors(&selectors.row)?,
            cell_selectors: compile_selectors(&selectors.cell)?,
        })
    }

    /// Cell text with whitespace runs collapsed to single spaces
    fn cell_text(cell: &ElementRef) -> String {
        let text = cell.text().collect::<String>();
        WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
    }

    /// Descendants of `parent` matched by the first productive selector
    /// whose closest `owner_tag` ancestor is `parent` itself
    fn own_matches<'a>(parent: &ElementRef<'a>, selectors: &[Selector], owner_tag: &str) -> Vec<ElementRef<'a>> {
        let parent_id = parent.id();
        let owned = |el: &ElementRef<'a>| {
            el.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == owner_tag)
                .is_none_or(|owner| owner.id() == parent_id)
        };

        selectors
            .iter()
            .map(|selector| parent.select(selector).filter(|el| owned(el)).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    fn rows<'a>(&self, table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
        Self::own_matches(table, &self.row_selectors, "table")
    }

    fn cells<'a>(&self, row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
        Self::own_matches(row, &self.cell_selectors, "tr")
    }

    /// Row sits in a `<thead>` of `table`
    fn in_thead(row: &ElementRef, table: &ElementRef) -> bool {
        let table_id = table.id();
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|e| e.id() != table_id)
            .any(|e| e.value().name() == "thead")
    }

    fn all_header_cells(cells: &[ElementRef]) -> bool {
        cells.iter().all(|c| c.value().name() == "th")
    }

    /// Data rows of `table`, header rows removed
    ///
    /// Header rows are the `<thead>` rows, or without a `<thead>` the
    /// leading rows made only of `<th>` cells.
    fn data_rows(&self, table: &ElementRef) -> Vec<Vec<String>> {
        let rows: Vec<(bool, Vec<ElementRef>)> = self
            .rows(table)
            .iter()
            .map(|row| (Self::in_thead(row, table), self.cells(row)))
            .filter(|(_, cells)| !cells.is_empty())
            .collect();

        let has_thead = rows.iter().any(|(in_thead, _)| *in_thead);
        let body: Vec<&Vec<ElementRef>> = if has_thead {
            rows.iter().filter(|(in_thead, _)| !in_thead).map(|(_, cells)| cells).collect()
        } else {
            rows.iter()
                .map(|(_, cells)| cells)
                .skip_while(|cells| Self::all_header_cells(cells))
                .collect()
        };

        body.into_iter()
            .map(|cells| cells.iter().map(Self::cell_text).collect())
            .collect()
    }
}

impl ContextualParser for SpecTableParser {
    type Output = RawTable;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let table = self
            .table_selectors
            .iter()
            .find_map(|selector| html.select(selector).next())
            .ok_or_else(|| ParsingError::TableNotFound {
                url: context.link.clone(),
            })?;

        let rows = self.data_rows(&table);

        if rows.is_empty() {
            return Err(ParsingError::EmptyTable {
                url: context.link.clone(),
            });
        }

        debug!(
            "Parsed spec table with {} rows from {} (#{})",
            rows.len(),
            context.link,
            context.index
        );
        Ok(RawTable::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ParsingResult<RawTable> {
        SpecTableParser::new()
            .unwrap()
            .parse_document(body, &DetailParseContext::new("https://shop/a", 0))
    }

    #[test]
    fn test_first_table_becomes_grid() {
        let body = r"
            <table>
              <tr><th>Screen</th><td>6.1 inch
                   OLED</td></tr>
              <tr><th>Battery</th><td>3240mAh</td></tr>
            </table>
            <table><tr><td>Other</td><td>ignored</td></tr></table>";
        let table = parse(body).unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec!["Screen".to_string(), "6.1 inch OLED".to_string()],
                vec!["Battery".to_string(), "3240mAh".to_string()],
            ]
        );
    }

    #[test]
    fn test_nested_table_rows_are_skipped() {
        let body = r"
            <table>
              <tr><td>Colours</td><td><table><tr><td>inner</td></tr></table></td></tr>
              <tr><td>Weight</td><td>174g</td></tr>
            </table>";
        let table = parse(body).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Colours".to_string(), "inner".to_string()]);
        assert_eq!(table.rows[1], vec!["Weight".to_string(), "174g".to_string()]);
    }

    #[test]
    fn test_thead_rows_are_dropped() {
        let body = r"
            <table>
              <thead><tr><th>Feature</th><th>Detail</th></tr></thead>
              <tbody>
                <tr><th>Screen</th><td>6.1 inch</td></tr>
                <tr><th>Battery</th><td>3240mAh</td></tr>
              </tbody>
            </table>";
        let table = parse(body).unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec!["Screen".to_string(), "6.1 inch".to_string()],
                vec!["Battery".to_string(), "3240mAh".to_string()],
            ]
        );
    }

    #[test]
    fn test_leading_header_only_rows_are_dropped() {
        let body = r"
            <table>
              <tr><th>Feature</th><th>Detail</th></tr>
              <tr><th>Screen</th><td>6.1 inch</td></tr>
              <tr><th>Battery</th><td>3240mAh</td></tr>
              <tr><th>Notes</th><th>none</th></tr>
            </table>";
        let table = parse(body).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Screen".to_string(), "6.1 inch".to_string()]);
        // Only leading header rows count as labels
        assert_eq!(table.rows[2], vec!["Notes".to_string(), "none".to_string()]);
    }

    #[test]
    fn test_header_feeds_no_spec_column() {
        use crate::domain::spec_table::{DetailTable, SpecFrame};

        let body = r"
            <table>
              <thead><tr><th>Feature</th><th>Detail</th></tr></thead>
              <tr><th>Screen</th><td>6.1 inch</td></tr>
              <tr><th>Battery</th><td>3240mAh</td></tr>
            </table>";
        let frame = SpecFrame::from_detail(&DetailTable {
            link: "https://shop/a".to_string(),
            table: parse(body).unwrap(),
        });
        assert_eq!(frame.columns, vec!["Screen", "Battery", "link"]);
    }

    #[test]
    fn test_page_without_table_fails() {
        let err = parse("<html><body><p>No specs</p></body></html>").unwrap_err();
        assert_eq!(err, ParsingError::TableNotFound { url: "https://shop/a".to_string() });
    }

    #[test]
    fn test_table_without_rows_fails() {
        let err = parse("<table></table>").unwrap_err();
        assert!(matches!(err, ParsingError::EmptyTable { .. }));
    }
}
