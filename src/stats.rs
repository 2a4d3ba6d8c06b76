use std::{collections::HashMap, fmt};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{parse_numeric, round_half_up},
    dataset::Dataset,
    profile::{ColumnProfile, ColumnType},
};

/// Descriptive statistics for a numerical column, kept at full precision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Lower middle element for an even sample size.
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by `n`).
    pub std_dev: f64,
}

impl NumericSummary {
    /// Presentation copy with every statistic rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self {
            count: self.count,
            mean: round_half_up(self.mean, 2),
            median: round_half_up(self.median, 2),
            min: round_half_up(self.min, 2),
            max: round_half_up(self.max, 2),
            std_dev: round_half_up(self.std_dev, 2),
        }
    }
}

/// Soft per-column failure; rendered as `N/A` in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotComputable {
    pub reason: String,
}

impl NotComputable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for NotComputable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N/A ({})", self.reason)
    }
}

pub type ColumnStatistics = Result<NumericSummary, NotComputable>;

/// Statistics for every numerical column, keyed by column name.
pub fn summarize_numeric_columns(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
) -> HashMap<String, ColumnStatistics> {
    profiles
        .iter()
        .filter(|profile| profile.inferred_type == ColumnType::Numerical)
        .map(|profile| {
            let stats = match dataset.column_index(&profile.name) {
                Some(idx) => summarize_column(dataset, idx),
                None => Err(NotComputable::new("column not found")),
            };
            if let Err(reason) = &stats {
                debug!("Column '{}' statistics skipped: {}", profile.name, reason.reason);
            }
            (profile.name.clone(), stats)
        })
        .collect()
}

/// Statistics over the cells of one column that parse as numbers. Empty,
/// absent and non-numeric cells are skipped.
pub fn summarize_column(dataset: &Dataset, column_index: usize) -> ColumnStatistics {
    let mut accumulator = NumericAccumulator::default();
    for cell in dataset.column_values(column_index).flatten() {
        if let Some(value) = parse_numeric(cell) {
            accumulator.add(value);
        }
    }
    accumulator.finish()
}

#[derive(Debug, Default)]
pub struct NumericAccumulator {
    values: Vec<f64>,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
        self.values.push(value);
    }

    pub fn finish(mut self) -> ColumnStatistics {
        let (Some(min), Some(max)) = (self.min, self.max) else {
            return Err(NotComputable::new("no numeric values"));
        };
        let count = self.values.len();
        let n = count as f64;
        let mut mean = self.sum / n;
        if !mean.is_finite() {
            // running sum overflowed; divide before adding
            mean = self.values.iter().map(|value| value / n).sum();
        }
        let std_dev = population_std_dev(&self.values, mean, min.abs().max(max.abs()));
        self.values.sort_by(f64::total_cmp);
        let median = self.values[count / 2];
        Ok(NumericSummary {
            count,
            mean,
            median,
            min,
            max,
            std_dev,
        })
    }
}

/// Two-pass population standard deviation. Deviations are rescaled by
/// `magnitude` when squaring them directly would overflow.
fn population_std_dev(values: &[f64], mean: f64, magnitude: f64) -> f64 {
    let n = values.len() as f64;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / n;
    if variance.is_finite() || magnitude == 0.0 {
        return variance.sqrt();
    }
    let scaled_mean = mean / magnitude;
    let scaled_variance = values
        .iter()
        .map(|value| (value / magnitude - scaled_mean).powi(2) / n)
        .sum::<f64>();
    scaled_variance.sqrt() * magnitude
}
