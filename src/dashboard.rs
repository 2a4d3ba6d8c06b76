//! Headline figures behind the chart dashboard: row count, the mean of the
//! first numerical column, and the value distribution of the first
//! categorical column.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::DashboardArgs,
    data::{format_fixed, is_missing},
    dataset::Dataset,
    io_utils,
    profile::{ColumnType, analyze_columns},
    stats::summarize_column,
    table,
};

pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_rows: usize,
    pub numeric_column: Option<String>,
    pub numeric_mean: Option<f64>,
    pub category_column: Option<String>,
    pub categories: Vec<CategoryCount>,
}

pub fn summarize(dataset: &Dataset, top: usize) -> DashboardSummary {
    let profiles = analyze_columns(dataset);
    let first_of = |kind: ColumnType| {
        profiles
            .iter()
            .position(|profile| profile.inferred_type == kind)
    };

    let numeric_idx = first_of(ColumnType::Numerical);
    let numeric_mean = numeric_idx
        .and_then(|idx| summarize_column(dataset, idx).ok())
        .map(|summary| summary.mean);

    let category_idx = first_of(ColumnType::Categorical);
    let categories = category_idx
        .map(|idx| category_counts(dataset, idx, top))
        .unwrap_or_default();

    DashboardSummary {
        total_rows: dataset.record_count(),
        numeric_column: numeric_idx.map(|idx| dataset.columns()[idx].clone()),
        numeric_mean,
        category_column: category_idx.map(|idx| dataset.columns()[idx].clone()),
        categories,
    }
}

/// Top `top` values by count (ties by value), remainder folded into `Other`.
/// `top == 0` keeps every value.
pub fn category_counts(dataset: &Dataset, column_index: usize, top: usize) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in dataset.column_values(column_index) {
        if is_missing(cell) {
            continue;
        }
        if let Some(value) = cell {
            *counts.entry(value.trim()).or_insert(0) += 1;
        }
    }
    let mut items = counts.into_iter().collect::<Vec<_>>();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let rest = if top > 0 && items.len() > top {
        items.split_off(top)
    } else {
        Vec::new()
    };
    let mut result = items
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    let other = rest.iter().map(|(_, count)| count).sum::<usize>();
    if other > 0 {
        result.push(CategoryCount {
            value: OTHER_BUCKET.to_string(),
            count: other,
        });
    }
    result
}

pub fn execute(args: &DashboardArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let dataset = Dataset::load(&args.input, delimiter, encoding)
        .with_context(|| format!("Loading dashboard data from {:?}", args.input))?;
    let summary = summarize(&dataset, args.top);

    let headline = vec![
        vec!["total_rows".to_string(), summary.total_rows.to_string()],
        vec![
            "numeric_column".to_string(),
            summary.numeric_column.clone().unwrap_or_default(),
        ],
        vec![
            "numeric_mean".to_string(),
            summary
                .numeric_mean
                .map(|mean| format_fixed(mean, 2))
                .unwrap_or_else(|| "N/A".to_string()),
        ],
        vec![
            "category_column".to_string(),
            summary.category_column.clone().unwrap_or_default(),
        ],
    ];
    table::print_table(&["metric".to_string(), "value".to_string()], &headline);

    if !summary.categories.is_empty() {
        println!();
        let total = summary.categories.iter().map(|c| c.count).sum::<usize>();
        let rows = summary
            .categories
            .iter()
            .map(|category| {
                let percent = 100.0 * category.count as f64 / total as f64;
                vec![
                    category.value.clone(),
                    category.count.to_string(),
                    format!("{}%", format_fixed(percent, 1)),
                ]
            })
            .collect::<Vec<_>>();
        let headers = vec!["value".to_string(), "count".to_string(), "percent".to_string()];
        table::print_table(&headers, &rows);
    }
    info!(
        "Summarised {} row(s) from {:?}",
        summary.total_rows, args.input
    );
    Ok(())
}
