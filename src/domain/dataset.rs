//! Merged product dataset published by a run

use serde_json::{Map, Value};
use std::collections::HashMap;

use super::product::ProductSummary;
use super::spec_table::{LINK_COLUMN, SpecFrame};

/// One output row: summary fields followed by specification columns
pub type MergedRecord = Map<String, Value>;

/// Result of left-joining summaries onto specification rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDataset {
    pub columns: Vec<String>,
    pub records: Vec<MergedRecord>,
    /// Links that matched more than one specification row
    pub fanned_out_links: Vec<String>,
}

impl MergedDataset {
    /// Left join `summaries` onto `specs` using the link column
    ///
    /// Every summary survives in input order. A link with several spec rows
    /// produces one output row per match; a link with none gets `null` spec
    /// cells. Overlapping non-key column names are suffixed `_x` (summary)
    /// and `_y` (spec).
    pub fn left_join(summaries: &[ProductSummary], specs: &SpecFrame) -> Self {
        let spec_link_idx = specs.column_index(LINK_COLUMN);

        let mut by_link: HashMap<&str, Vec<usize>> = HashMap::new();
        if let Some(link_idx) = spec_link_idx {
            for (row_idx, row) in specs.rows.iter().enumerate() {
                if let Some(Some(link)) = row.get(link_idx) {
                    by_link.entry(link.as_str()).or_default().push(row_idx);
                }
            }
        }

        let spec_columns: Vec<(usize, &str)> = specs
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != spec_link_idx)
            .map(|(idx, name)| (idx, name.as_str()))
            .collect();

        let overlaps = |name: &str| name != LINK_COLUMN && ProductSummary::FIELDS.contains(&name);

        let summary_names: Vec<(&str, String)> = ProductSummary::FIELDS
            .iter()
            .map(|field| {
                let collides = spec_columns.iter().any(|(_, n)| *n == *field) && overlaps(field);
                let out = if collides { format!("{field}_x") } else { (*field).to_string() };
                (*field, out)
            })
            .collect();

        let spec_names: Vec<(usize, String)> = spec_columns
            .iter()
            .map(|(idx, name)| {
                let out = if overlaps(name) { format!("{name}_y") } else { (*name).to_string() };
                (*idx, out)
            })
            .collect();

        let columns: Vec<String> = summary_names
            .iter()
            .map(|(_, out)| out.clone())
            .chain(spec_names.iter().map(|(_, out)| out.clone()))
            .collect();

        let mut records = Vec::with_capacity(summaries.len());
        let mut fanned_out_links = Vec::new();

        for summary in summaries {
            let mut base = Map::new();
            for (field, out) in &summary_names {
                base.insert(out.clone(), summary.field_value(field).unwrap_or(Value::Null));
            }

            match by_link.get(summary.link.as_str()) {
                Some(matches) => {
                    if matches.len() > 1 && !fanned_out_links.contains(&summary.link) {
                        fanned_out_links.push(summary.link.clone());
                    }
                    for &row_idx in matches {
                        let row = &specs.rows[row_idx];
                        let mut record = base.clone();
                        for (idx, out) in &spec_names {
                            let cell = row.get(*idx).cloned().flatten().map_or(Value::Null, Value::String);
                            record.insert(out.clone(), cell);
                        }
                        records.push(record);
                    }
                }
                None => {
                    let mut record = base;
                    for (_, out) in &spec_names {
                        record.insert(out.clone(), Value::Null);
                    }
                    records.push(record);
                }
            }
        }

        Self {
            columns,
            records,
            fanned_out_links,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// JSON array of records, keys in column order
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{ContractType, format_reviews};
    use crate::domain::spec_table::{DetailTable, RawTable};

    fn summary(link: &str, contract_type: ContractType) -> ProductSummary {
        ProductSummary {
            brand: "Samsung".to_string(),
            model: "Galaxy S21".to_string(),
            upfront_cost: "£0".to_string(),
            monthly_price: "30.00".to_string(),
            link: link.to_string(),
            rating: 4.2,
            reviews: format_reviews("12"),
            contract_type,
        }
    }

    fn frame(link: &str, rows: &[[&str; 2]]) -> SpecFrame {
        SpecFrame::from_detail(&DetailTable {
            link: link.to_string(),
            table: RawTable::new(rows.iter().map(|r| r.iter().map(|c| (*c).to_string()).collect()).collect()),
        })
    }

    #[test]
    fn test_left_join_matches_rows_by_link() {
        let summaries = vec![summary("A", ContractType::PayMonthly), summary("B", ContractType::PayMonthly)];
        let specs = SpecFrame::concat([
            frame("A", &[["Screen", "6.1in"], ["Battery", "4000mAh"]]),
            frame("B", &[["Screen", "6.7in"], ["Battery", "5000mAh"]]),
        ]);

        let merged = MergedDataset::left_join(&summaries, &specs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.records[0]["link"], "A");
        assert_eq!(merged.records[0]["Screen"], "6.1in");
        assert_eq!(merged.records[1]["Battery"], "5000mAh");
        assert!(merged.fanned_out_links.is_empty());
    }

    #[test]
    fn test_left_join_keeps_unmatched_summary_with_nulls() {
        let summaries = vec![summary("A", ContractType::PayMonthly), summary("C", ContractType::PayAsYouGo)];
        let specs = frame("A", &[["Screen", "6.1in"]]);

        let merged = MergedDataset::left_join(&summaries, &specs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.records[1]["link"], "C");
        assert_eq!(merged.records[1]["Screen"], Value::Null);
    }

    #[test]
    fn test_left_join_fans_out_duplicate_spec_rows() {
        let summaries = vec![summary("A", ContractType::PayMonthly)];
        let specs = SpecFrame::concat([frame("A", &[["Screen", "6.1in"]]), frame("A", &[["Screen", "6.1in"]])]);

        let merged = MergedDataset::left_join(&summaries, &specs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.fanned_out_links, vec!["A".to_string()]);
    }

    #[test]
    fn test_overlapping_column_names_are_suffixed() {
        let summaries = vec![summary("A", ContractType::PayMonthly)];
        let specs = frame("A", &[["model", "SM-G991B"], ["Screen", "6.2in"]]);

        let merged = MergedDataset::left_join(&summaries, &specs);
        assert!(merged.columns.contains(&"model_x".to_string()));
        assert!(merged.columns.contains(&"model_y".to_string()));
        assert!(!merged.columns.contains(&"model".to_string()));
        assert_eq!(merged.records[0]["model_x"], "Galaxy S21");
        assert_eq!(merged.records[0]["model_y"], "SM-G991B");
    }

    #[test]
    fn test_every_record_has_full_column_set_in_order() {
        let summaries = vec![summary("A", ContractType::PayMonthly), summary("B", ContractType::PayMonthly)];
        let specs = SpecFrame::concat([frame("A", &[["Screen", "6.1in"]]), frame("B", &[["Battery", "5000mAh"]])]);

        let merged = MergedDataset::left_join(&summaries, &specs);
        for record in &merged.records {
            let keys: Vec<&String> = record.keys().collect();
            let expected: Vec<&String> = merged.columns.iter().collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_json_output_is_stable() {
        let summaries = vec![summary("A", ContractType::PayMonthly)];
        let specs = frame("A", &[["Screen", "6.1in"]]);

        let first = MergedDataset::left_join(&summaries, &specs).to_json_bytes().unwrap();
        let second = MergedDataset::left_join(&summaries, &specs).to_json_bytes().unwrap();
        assert_eq!(first, second);
        assert!(String::from_utf8(first).unwrap().starts_with("[{\"brand\":\"Samsung\""));
    }
}
