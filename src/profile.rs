//! Column analysis: inferred type and missing-value percentage per column.
//!
//! Type inference only looks at the first [`TYPE_SAMPLE_ROWS`] records. A
//! column whose numeric values only show up further down a large file is
//! reported as categorical.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    data::{is_missing, parse_numeric, round_half_up},
    dataset::Dataset,
};

pub const TYPE_SAMPLE_ROWS: usize = 100;
/// Share of numeric-looking cells a column must strictly exceed to be numerical.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColumnType {
    Numerical,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numerical => write!(f, "Numerical"),
            ColumnType::Categorical => write!(f, "Categorical"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    /// 0–100, rounded to one decimal place.
    pub missing_percentage: f64,
}

/// One profile per column, in header order.
pub fn analyze_columns(dataset: &Dataset) -> Vec<ColumnProfile> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnProfile {
            name: name.clone(),
            inferred_type: infer_column_type(dataset, idx),
            missing_percentage: missing_percentage(dataset, idx),
        })
        .collect()
}

pub fn infer_column_type(dataset: &Dataset, column_index: usize) -> ColumnType {
    let mut non_empty = 0usize;
    let mut numeric_like = 0usize;
    for cell in dataset
        .column_values(column_index)
        .take(TYPE_SAMPLE_ROWS)
        .flatten()
    {
        if cell.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if parse_numeric(cell).is_some() {
            numeric_like += 1;
        }
    }
    classify(numeric_like, non_empty)
}

fn classify(numeric_like: usize, non_empty: usize) -> ColumnType {
    if non_empty == 0 {
        return ColumnType::Categorical;
    }
    let ratio = numeric_like as f64 / non_empty as f64;
    if ratio > NUMERIC_RATIO_THRESHOLD {
        ColumnType::Numerical
    } else {
        ColumnType::Categorical
    }
}

/// Share of records (all of them, not the type sample) missing this column.
pub fn missing_percentage(dataset: &Dataset, column_index: usize) -> f64 {
    let total = dataset.record_count();
    if total == 0 {
        return 0.0;
    }
    let missing = dataset
        .column_values(column_index)
        .filter(|cell| is_missing(*cell))
        .count();
    round_half_up(100.0 * missing as f64 / total as f64, 1)
}
