//! Parsed CSV input: an ordered header plus fixed-shape records.
//!
//! Every [`Record`] is validated once here, against the header, so downstream
//! stages index cells by column position without re-checking shapes. A row
//! shorter than the header leaves its trailing cells absent; a longer row is
//! truncated to the header width.

use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

use crate::{error::ReportError, io_utils};

/// One data row. Cells line up with [`Dataset::columns`]; `None` marks a
/// cell the source row did not supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    cells: Vec<Option<String>>,
}

impl Record {
    fn from_fields(mut fields: Vec<String>, width: usize) -> Self {
        fields.truncate(width);
        let mut cells: Vec<Option<String>> = fields.into_iter().map(Some).collect();
        cells.resize(width, None);
        Self { cells }
    }

    pub fn get(&self, column_index: usize) -> Option<&str> {
        self.cells.get(column_index).and_then(|cell| cell.as_deref())
    }

    /// Fields as they would be written back out; absent trailing cells are omitted.
    pub fn fields(&self) -> Vec<String> {
        let supplied = self
            .cells
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |idx| idx + 1);
        self.cells[..supplied]
            .iter()
            .map(|cell| cell.clone().unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from a header and raw rows.
    ///
    /// Fails with [`ReportError::EmptyInput`] when the header is missing or
    /// no rows follow it. Repeated header names are renamed with a numeric
    /// suffix (`a`, `a_1`, `a_2`, ...).
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ReportError> {
        if columns.is_empty() || (columns.len() == 1 && columns[0].trim().is_empty()) {
            return Err(ReportError::EmptyInput);
        }
        let columns = unique_column_names(columns);
        if rows.is_empty() {
            return Err(ReportError::EmptyInput);
        }
        let width = columns.len();
        let records = rows
            .into_iter()
            .map(|fields| Record::from_fields(fields, width))
            .collect();
        Ok(Self { columns, records })
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        let reader = io_utils::open_csv_reader(text.as_bytes(), io_utils::DEFAULT_CSV_DELIMITER);
        Self::from_reader(reader, UTF_8)
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        Self::from_reader(reader, encoding).with_context(|| format!("Reading dataset {path:?}"))
    }

    pub fn from_reader<R: Read>(
        mut reader: csv::Reader<R>,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let columns = io_utils::reader_headers(&mut reader, encoding)?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
            if record.len() > columns.len() {
                warn!(
                    "Row {} has {} field(s) but the header has {}; extra fields ignored",
                    row_idx + 2,
                    record.len(),
                    columns.len()
                );
            }
            rows.push(io_utils::decode_record(&record, encoding)?);
        }
        debug!(
            "Parsed {} row(s) across {} column(s)",
            rows.len(),
            columns.len()
        );
        Ok(Self::new(columns, rows)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column in record order, `None` where the row omitted it.
    pub fn column_values(&self, column_index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.records.iter().map(move |record| record.get(column_index))
    }

    /// Header followed by every record, ready to be written back as CSV.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.columns.clone())
            .chain(self.records.iter().map(Record::fields))
            .collect()
    }

    pub fn to_csv_string(&self) -> Result<String> {
        io_utils::rows_to_csv_string(io_utils::DEFAULT_CSV_DELIMITER, &self.to_rows())
    }
}

/// Renames repeated header names so every column name is distinct. A
/// generated name skips over names the header already uses.
fn unique_column_names(columns: Vec<String>) -> Vec<String> {
    let taken: HashSet<String> = columns.iter().cloned().collect();
    if taken.len() == columns.len() {
        return columns;
    }
    let mut assigned: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(columns.len());
    for name in columns {
        if assigned.insert(name.clone()) {
            unique.push(name);
            continue;
        }
        let counter = counters.entry(name.clone()).or_insert(0);
        let renamed = loop {
            *counter += 1;
            let candidate = format!("{name}_{counter}");
            if !taken.contains(&candidate) && !assigned.contains(&candidate) {
                break candidate;
            }
        };
        warn!("Header '{name}' appears more than once; renamed to '{renamed}'");
        assigned.insert(renamed.clone());
        unique.push(renamed);
    }
    unique
}
