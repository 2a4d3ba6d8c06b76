//! Exact-duplicate row removal.
//!
//! Two rows are duplicates when their field sequences are identical, which is
//! the same as their serialised CSV lines being equal. The first occurrence
//! wins and source order is preserved; the header is never touched.

use std::path::PathBuf;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{cli::DedupeArgs, error::ReportError, io_utils};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeOutcome {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub removed: usize,
}

pub fn dedupe_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> DedupeOutcome {
    let original = rows.len();
    let rows = rows.into_iter().unique().collect::<Vec<_>>();
    DedupeOutcome {
        headers,
        removed: original - rows.len(),
        rows,
    }
}

impl DedupeOutcome {
    pub fn to_csv_string(&self, delimiter: u8) -> Result<String> {
        let mut all = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.headers.clone());
        all.extend(self.rows.iter().cloned());
        io_utils::rows_to_csv_string(delimiter, &all)
    }
}

pub fn execute(args: &DedupeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, input_encoding)?;
    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        rows.push(io_utils::decode_record(&record, input_encoding)?);
    }
    if headers.is_empty() || rows.is_empty() {
        return Err(ReportError::EmptyInput)
            .with_context(|| format!("Removing duplicates from {:?}", args.input));
    }

    let outcome = dedupe_rows(headers, rows);
    let output = resolve_output(args);
    let text = outcome.to_csv_string(delimiter)?;
    io_utils::write_text(output.as_deref(), &text, output_encoding)?;
    info!(
        "Removed {} duplicate row(s); {} row(s) kept{}",
        outcome.removed,
        outcome.rows.len(),
        output
            .as_ref()
            .map(|p| format!(" in {p:?}"))
            .unwrap_or_default()
    );
    Ok(())
}

fn resolve_output(args: &DedupeArgs) -> Option<PathBuf> {
    match &args.output {
        Some(path) => Some(path.clone()),
        None if io_utils::is_dash(&args.input) => None,
        None => Some(io_utils::cleaned_output_path(&args.input)),
    }
}
