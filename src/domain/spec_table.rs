//! Specification tables scraped from product detail pages
//!
//! A detail page lists one specification per row (`name | value`). The
//! reshaping steps turn that into a one-row-per-product frame whose
//! columns are the specification names.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the join column attached to every specification frame
pub const LINK_COLUMN: &str = "link";

/// First HTML table of a detail page as a grid of cell texts
///
/// Rows may be ragged when the markup uses uneven cell counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Swap rows and columns, padding short rows with `None`
    pub fn transpose(&self) -> Vec<Vec<Option<String>>> {
        let width = self.width();
        (0..width)
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| row.get(col).cloned())
                    .collect()
            })
            .collect()
    }
}

/// Detail table of a raw table paired with the link it was fetched from
#[derive(Debug, Clone, PartialEq)]
pub struct DetailTable {
    pub link: String,
    pub table: RawTable,
}

/// Column-oriented specification data for one or more products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl SpecFrame {
    /// Reshape a detail table into a frame keyed by its link
    ///
    /// Transposes the grid, promotes the first resulting row to the header,
    /// attaches the link column and prunes duplicate column names.
    pub fn from_detail(detail: &DetailTable) -> Self {
        let mut transposed = detail.table.transpose().into_iter();
        let header = transposed.next().unwrap_or_default();
        let columns = header
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();

        let mut frame = Self {
            columns,
            rows: transposed.collect(),
        };
        frame.set_column(LINK_COLUMN, &detail.link);
        frame.dedupe_columns();
        frame
    }

    /// Set every row of `name` to `value`
    ///
    /// Overwrites the first column of that name in place, or appends a new one.
    pub fn set_column(&mut self, name: &str, value: &str) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    if row.len() <= idx {
                        row.resize(idx + 1, None);
                    }
                    row[idx] = Some(value.to_string());
                }
            }
            None => {
                let width = self.columns.len();
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.resize(width, None);
                    row.push(Some(value.to_string()));
                }
            }
        }
    }

    /// Drop every column whose name repeats an earlier one (first occurrence wins)
    pub fn dedupe_columns(&mut self) {
        let keep = first_occurrence_mask(&self.columns);
        if keep.iter().all(|k| *k) {
            return;
        }

        self.columns = self
            .columns
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(c, _)| c.clone())
            .collect();

        for row in &mut self.rows {
            *row = keep
                .iter()
                .enumerate()
                .filter(|(_, k)| **k)
                .map(|(idx, _)| row.get(idx).cloned().flatten())
                .collect();
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stack frames vertically over the union of their columns
    ///
    /// Columns keep first-seen order; cells a frame lacks are `None`.
    pub fn concat<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = SpecFrame>,
    {
        let mut out = SpecFrame::default();

        for frame in frames {
            let positions: Vec<usize> = frame
                .columns
                .iter()
                .map(|name| match out.column_index(name) {
                    Some(idx) => idx,
                    None => {
                        out.columns.push(name.clone());
                        out.columns.len() - 1
                    }
                })
                .collect();

            for row in frame.rows {
                let mut merged = vec![None; out.columns.len()];
                for (cell, &pos) in row.into_iter().zip(&positions) {
                    merged[pos] = cell;
                }
                out.rows.push(merged);
            }
        }

        let width = out.columns.len();
        for row in &mut out.rows {
            row.resize(width, None);
        }
        out
    }
}

/// `true` for every name not seen earlier in the slice
pub fn first_occurrence_mask(names: &[String]) -> Vec<bool> {
    let mut seen = HashSet::new();
    names.iter().map(|name| seen.insert(name.as_str())).collect()
}
