//! Merge stage: reshape detail tables and left-join them onto summaries

use tracing::{debug, warn};

use super::error::{PipelineError, PipelineResult};
use crate::domain::dataset::MergedDataset;
use crate::domain::product::ProductSummary;
use crate::domain::spec_table::{DetailTable, SpecFrame};

/// Build the published dataset from summaries and their detail tables
pub fn merge(summaries: &[ProductSummary], details: &[DetailTable]) -> PipelineResult<MergedDataset> {
    if details.is_empty() {
        return Err(PipelineError::merge("no detail tables to concatenate"));
    }
    if let Some(empty) = details.iter().find(|d| d.table.is_empty()) {
        return Err(PipelineError::merge(format!(
            "detail table for {} has no header row",
            empty.link
        )));
    }

    let frames: Vec<SpecFrame> = details.iter().map(SpecFrame::from_detail).collect();
    for (detail, frame) in details.iter().zip(&frames) {
        debug!(
            "Spec frame for {}: {} columns, {} rows",
            detail.link,
            frame.columns.len(),
            frame.len()
        );
    }

    let specs = SpecFrame::concat(frames);
    let merged = MergedDataset::left_join(summaries, &specs);

    // Known quirk: several spec rows per link multiply the summary row
    for link in &merged.fanned_out_links {
        warn!("⚠️ Link {} matched multiple spec rows; summary row fanned out", link);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{ContractType, format_reviews};
    use crate::domain::spec_table::RawTable;
    use serde_json::Value;

    fn summary(link: &str) -> ProductSummary {
        ProductSummary {
            brand: "Google".to_string(),
            model: "Pixel 6".to_string(),
            upfront_cost: "£0".to_string(),
            monthly_price: "29.50".to_string(),
            link: link.to_string(),
            rating: 4.1,
            reviews: format_reviews("5"),
            contract_type: ContractType::PayMonthly,
        }
    }

    fn detail(link: &str, screen: &str, battery: &str) -> DetailTable {
        DetailTable {
            link: link.to_string(),
            table: RawTable::new(vec![
                vec!["Screen".to_string(), screen.to_string()],
                vec!["Battery".to_string(), battery.to_string()],
            ]),
        }
    }

    #[test]
    fn test_two_products_two_tables() {
        let summaries = vec![summary("A"), summary("B")];
        let details = vec![detail("A", "6.4in", "4614mAh"), detail("B", "6.7in", "5003mAh")];

        let merged = merge(&summaries, &details).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.records[0]["link"], "A");
        assert_eq!(merged.records[0]["Screen"], "6.4in");
        assert_eq!(merged.records[0]["Battery"], "4614mAh");
        assert_eq!(merged.records[1]["link"], "B");
        assert_eq!(merged.records[1]["Screen"], "6.7in");
        assert_eq!(merged.records[1]["brand"], "Google");
    }

    #[test]
    fn test_summary_without_detail_has_null_specs() {
        let summaries = vec![summary("A"), summary("B")];
        let details = vec![detail("B", "6.7in", "5003mAh")];

        let merged = merge(&summaries, &details).unwrap();
        assert_eq!(merged.records[0]["link"], "A");
        assert_eq!(merged.records[0]["Screen"], Value::Null);
        assert_eq!(merged.records[0]["Battery"], Value::Null);
    }

    #[test]
    fn test_duplicate_links_across_segments_fan_out() {
        let mut payg = summary("A");
        payg.contract_type = ContractType::PayAsYouGo;
        let summaries = vec![summary("A"), payg];
        let details = vec![detail("A", "6.4in", "4614mAh"), detail("A", "6.4in", "4614mAh")];

        let merged = merge(&summaries, &details).unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.fanned_out_links, vec!["A".to_string()]);
    }

    #[test]
    fn test_no_details_is_a_merge_error() {
        let err = merge(&[summary("A")], &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Merge { .. }));

        let err = merge(&[], &[]).unwrap_err();
        assert_eq!(err.kind(), "merge-error");
    }

    #[test]
    fn test_empty_table_is_a_merge_error() {
        let details = vec![DetailTable {
            link: "A".to_string(),
            table: RawTable::default(),
        }];
        let err = merge(&[summary("A")], &details).unwrap_err();
        assert!(matches!(err, PipelineError::Merge { .. }));
    }
}
