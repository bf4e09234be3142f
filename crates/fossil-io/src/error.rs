//! I/O error types for fossil-io.
//!
//! Messages are shown to end users, so they never include the file path.
//! The path is still carried in the variant for logging.

use std::path::PathBuf;

/// Errors from reading and validating a transaction table.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("transaction table could not be opened")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("malformed CSV record at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a required column is absent from the header.
    #[error("transaction table is missing required column \"{column}\"")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// Name of the missing column.
        column: &'static str,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("transaction table has no data rows")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cost cell cannot be parsed as a currency amount.
    #[error("row {row_index}: cannot parse {column} value \"{raw}\" as a currency amount")]
    InvalidCost {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Name of the cost column.
        column: &'static str,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when a categorical cell is empty.
    #[error("row {row_index}: {column} is empty")]
    EmptyCategory {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Name of the categorical column.
        column: &'static str,
    },
}
