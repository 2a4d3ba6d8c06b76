//! Report assembly and rendering.
//!
//! A [`Report`] always carries its Markdown text. Reports produced in-process
//! also carry the structured [`Analysis`] behind that text, which is what the
//! JSON and YAML output formats serialise.

use std::{collections::HashMap, fmt::Write as _};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    cli::OutputFormat,
    data::format_fixed,
    profile::{ColumnProfile, ColumnType},
    stats::{ColumnStatistics, NotComputable, NumericSummary},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Overview {
    pub record_count: usize,
    pub column_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsEntry {
    Computed(NumericSummary),
    NotComputable(NotComputable),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnSection {
    #[serde(flatten)]
    pub profile: ColumnProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Analysis {
    pub overview: Overview,
    pub columns: Vec<ColumnSection>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    text: String,
    analysis: Option<Analysis>,
}

#[derive(Serialize)]
struct TextOnly<'a> {
    report: &'a str,
}

impl Report {
    /// Wraps free-form report text that has no structured analysis behind it.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            analysis: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match (format, &self.analysis) {
            (OutputFormat::Markdown, _) => Ok(self.text.clone()),
            (OutputFormat::Json, Some(analysis)) => {
                serde_json::to_string_pretty(analysis).context("Serialising report as JSON")
            }
            (OutputFormat::Json, None) => serde_json::to_string_pretty(&TextOnly {
                report: &self.text,
            })
            .context("Serialising report as JSON"),
            (OutputFormat::Yaml, Some(analysis)) => {
                serde_yaml::to_string(analysis).context("Serialising report as YAML")
            }
            (OutputFormat::Yaml, None) => serde_yaml::to_string(&TextOnly {
                report: &self.text,
            })
            .context("Serialising report as YAML"),
        }
    }
}

/// Builds the report from the dataset's cardinalities, the column profiles in
/// header order, and the statistics of the numerical columns.
///
/// A numerical column with no entry in `statistics` is reported as not
/// computable rather than dropped.
pub fn assemble_report(
    overview: Overview,
    profiles: &[ColumnProfile],
    statistics: &HashMap<String, ColumnStatistics>,
) -> Report {
    let columns = profiles
        .iter()
        .map(|profile| {
            let entry = (profile.inferred_type == ColumnType::Numerical).then(|| {
                match statistics.get(&profile.name) {
                    Some(Ok(summary)) => StatisticsEntry::Computed(summary.rounded()),
                    Some(Err(reason)) => StatisticsEntry::NotComputable(reason.clone()),
                    None => StatisticsEntry::NotComputable(NotComputable::new("not analysed")),
                }
            });
            ColumnSection {
                profile: profile.clone(),
                statistics: entry,
            }
        })
        .collect::<Vec<_>>();
    let numerical = columns.iter().filter(|c| c.statistics.is_some()).count();
    let summary = format!(
        "The dataset contains {} {} across {} {}, {} of which {} numerical.",
        overview.record_count,
        plural(overview.record_count, "row", "rows"),
        overview.column_count,
        plural(overview.column_count, "column", "columns"),
        numerical,
        plural(numerical, "is", "are"),
    );
    let analysis = Analysis {
        overview,
        columns,
        summary,
    };
    Report {
        text: render_markdown(&analysis),
        analysis: Some(analysis),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn render_markdown(analysis: &Analysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Data Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Data Overview");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Rows: {}", analysis.overview.record_count);
    let _ = writeln!(out, "- Columns: {}", analysis.overview.column_count);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Column Analysis");
    let _ = writeln!(out);
    for column in &analysis.columns {
        let _ = writeln!(
            out,
            "- **{}**: {}, {}% missing",
            column.profile.name,
            column.profile.inferred_type,
            format_fixed(column.profile.missing_percentage, 1)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Basic Statistics");
    let _ = writeln!(out);
    let mut any_numerical = false;
    for column in &analysis.columns {
        let Some(entry) = &column.statistics else {
            continue;
        };
        any_numerical = true;
        let _ = writeln!(out, "### {}", column.profile.name);
        let _ = writeln!(out);
        match entry {
            StatisticsEntry::Computed(summary) => {
                let _ = writeln!(out, "- Mean: {}", format_fixed(summary.mean, 2));
                let _ = writeln!(out, "- Median: {}", format_fixed(summary.median, 2));
                let _ = writeln!(out, "- Min: {}", format_fixed(summary.min, 2));
                let _ = writeln!(out, "- Max: {}", format_fixed(summary.max, 2));
                let _ = writeln!(out, "- Std Dev: {}", format_fixed(summary.std_dev, 2));
            }
            StatisticsEntry::NotComputable(reason) => {
                let _ = writeln!(out, "- Statistics: {reason}");
            }
        }
        let _ = writeln!(out);
    }
    if !any_numerical {
        let _ = writeln!(out, "No numerical columns detected.");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", analysis.summary);
    out
}
