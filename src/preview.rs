//! First-rows preview of an input file, rendered as a numbered table.

use std::io::Read;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::info;

use crate::{cli::PreviewArgs, io_utils, table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    /// Table cells with a leading 1-based row number column.
    pub fn numbered(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let headers = std::iter::once("#".to_string())
            .chain(self.headers.iter().cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                std::iter::once((idx + 1).to_string())
                    .chain(row.iter().cloned())
                    .collect()
            })
            .collect();
        (headers, rows)
    }
}

pub fn read_preview<R: Read>(
    reader: &mut csv::Reader<R>,
    limit: usize,
    encoding: &'static Encoding,
) -> Result<Preview> {
    let headers = io_utils::reader_headers(reader, encoding)?;
    let mut rows = Vec::with_capacity(limit.min(1024));
    for (idx, record) in reader.byte_records().take(limit).enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        rows.push(io_utils::decode_record(&record, encoding)?);
    }
    Ok(Preview { headers, rows })
}

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let preview = read_preview(&mut reader, args.rows, encoding)
        .with_context(|| format!("Previewing {:?}", args.input))?;

    let (headers, rows) = preview.numbered();
    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {:?}", preview.rows.len(), args.input);
    Ok(())
}
