//! Report generation strategies behind one [`ReportGenerator`] interface.
//!
//! [`StatisticalReportGenerator`] runs the in-process pipeline (column
//! analysis, numeric aggregation, assembly) and is fully deterministic.
//! [`PromptReportGenerator`] hands the dataset to a text-completion backend
//! with an analyst prompt; its output is natural language and only checked
//! for being non-empty.

use log::{info, warn};

use crate::{
    dataset::Dataset,
    error::ReportError,
    profile::analyze_columns,
    report::{Overview, Report, assemble_report},
    stats::summarize_numeric_columns,
};

pub trait ReportGenerator {
    fn name(&self) -> &'static str;
    fn generate(&self, dataset: &Dataset) -> Result<Report, ReportError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticalReportGenerator;

impl ReportGenerator for StatisticalReportGenerator {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn generate(&self, dataset: &Dataset) -> Result<Report, ReportError> {
        if dataset.record_count() == 0 {
            return Err(ReportError::EmptyInput);
        }
        let profiles = analyze_columns(dataset);
        let statistics = summarize_numeric_columns(dataset, &profiles);
        Ok(assemble_report(
            Overview {
                record_count: dataset.record_count(),
                column_count: dataset.column_count(),
            },
            &profiles,
            &statistics,
        ))
    }
}

/// A single request/response call to a text-generation provider.
pub trait CompletionBackend {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

impl<F> CompletionBackend for F
where
    F: Fn(&str) -> anyhow::Result<String>,
{
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self(prompt)
    }
}

pub struct PromptReportGenerator<B> {
    backend: B,
}

impl<B: CompletionBackend> PromptReportGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: CompletionBackend> ReportGenerator for PromptReportGenerator<B> {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn generate(&self, dataset: &Dataset) -> Result<Report, ReportError> {
        let prompt = render_prompt(dataset)?;
        info!(
            "Requesting generated report for {} row(s) ({} prompt bytes)",
            dataset.record_count(),
            prompt.len()
        );
        // one attempt only; the caller decides what to show on failure
        let response = self.backend.complete(&prompt).map_err(|err| {
            warn!("Report backend failed: {err:#}");
            generation_failed()
        })?;
        if response.trim().is_empty() {
            warn!("Report backend returned an empty report");
            return Err(generation_failed());
        }
        Ok(Report::from_text(response))
    }
}

/// Backend detail stays in the log; callers only see this message.
fn generation_failed() -> ReportError {
    ReportError::ExternalService(GENERATION_FAILED.to_string())
}

pub const GENERATION_FAILED: &str = "Failed to generate data report";

/// The analyst prompt for `dataset`, with the data embedded as CSV.
pub fn render_prompt(dataset: &Dataset) -> Result<String, ReportError> {
    if dataset.record_count() == 0 {
        return Err(ReportError::EmptyInput);
    }
    let csv_text = dataset
        .to_csv_string()
        .map_err(|err| ReportError::ExternalService(format!("serialising dataset: {err}")))?;
    Ok(PROMPT_TEMPLATE.replace("{{csv}}", csv_text.trim_end()))
}

const PROMPT_TEMPLATE: &str = r#"You are an expert data analyst. Analyze the CSV data below and write a comprehensive report in Markdown.

```csv
{{csv}}
```

Use these sections, in this order:

1. **Data Overview**: number of rows (excluding the header) and number of columns.
2. **Column Analysis**: for each column, its name, its inferred data type (Numerical, Categorical, Text, Date, Boolean), and the percentage of missing or empty values to one decimal place (e.g. 15.2%).
3. **Basic Statistics**: for each Numerical column, Mean, Median, Min, Max and Std Dev to two decimal places. If a statistic cannot be calculated, write "N/A" with a short reason instead of stopping the analysis.
4. **Key Insights & Observations**: patterns, outliers, data quality issues, and suggested next steps.
5. **Summary**: one paragraph describing the dataset's main characteristics.

Return valid Markdown only.
"#;

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_csv_str("city,price\nOslo,10\nLima,12\n").unwrap()
    }

    #[test]
    fn statistical_generator_is_deterministic() {
        let generator = StatisticalReportGenerator;
        let first = generator.generate(&dataset()).unwrap();
        let second = generator.generate(&dataset()).unwrap();
        assert_eq!(first.text(), second.text());
        assert_eq!(generator.name(), "statistical");
    }

    #[test]
    fn prompt_embeds_csv_block() {
        let prompt = render_prompt(&dataset()).unwrap();
        assert!(prompt.contains("```csv\ncity,price\nOslo,10\nLima,12\n```"));
        assert!(prompt.contains("**Basic Statistics**"));
    }

    #[test]
    fn prompt_generator_calls_backend_once() {
        let calls = Cell::new(0);
        let backend = |prompt: &str| -> anyhow::Result<String> {
            calls.set(calls.get() + 1);
            assert!(prompt.contains("Oslo,10"));
            Ok("# Report\n\nTwo rows.".to_string())
        };
        let generator = PromptReportGenerator::new(backend);
        let report = generator.generate(&dataset()).unwrap();
        assert_eq!(report.text(), "# Report\n\nTwo rows.");
        assert!(report.analysis().is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn backend_failure_is_not_retried() {
        let calls = Cell::new(0);
        let backend = |_: &str| -> anyhow::Result<String> {
            calls.set(calls.get() + 1);
            Err(anyhow!("quota exceeded"))
        };
        let err = PromptReportGenerator::new(backend)
            .generate(&dataset())
            .unwrap_err();
        assert_eq!(err, ReportError::ExternalService(GENERATION_FAILED.to_string()));
        assert!(!err.to_string().contains("quota exceeded"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn blank_backend_response_is_a_failure() {
        let backend = |_: &str| -> anyhow::Result<String> { Ok("   \n".to_string()) };
        let err = PromptReportGenerator::new(backend)
            .generate(&dataset())
            .unwrap_err();
        assert_eq!(err, ReportError::ExternalService(GENERATION_FAILED.to_string()));
    }
}
