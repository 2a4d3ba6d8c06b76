//! Domain errors raised by the report pipeline.
//!
//! Per-column conditions (unparseable cells, columns without numeric values)
//! are deliberately absent here: they degrade into report content instead of
//! failing the run. See [`crate::stats::NotComputable`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// No header, or a header with zero data rows beneath it.
    #[error("Input CSV data is missing, empty, or contains only a header row")]
    EmptyInput,
    #[error("Report service failed: {0}")]
    ExternalService(String),
}
