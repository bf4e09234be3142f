//! CSV transaction table reader with full input validation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{
    ADJUSTED_COST_COLUMN, BODY_PART_COLUMN, FAMILY_COLUMN, ORIGINAL_COST_COLUMN,
    TransactionRecord, TransactionTable, parse_currency,
};

/// Reads historical fossil sales from a CSV file.
///
/// Expected CSV format:
/// - Header row required, containing at least `Fossil Family`, `Body part`,
///   `Original Cost` and `Adjusted Cost` (any order, extra columns ignored)
/// - Costs are currency strings such as `"$12,345.00"`
/// - Every row has the same number of columns as the header
///
/// No row is ever skipped: the first bad row fails the whole read.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | A required header is absent |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::InvalidCost`] | A cost cell is not a finite currency amount |
/// | [`IoError::EmptyCategory`] | A family or body part cell is blank |
pub struct TransactionReader {
    path: PathBuf,
}

/// Positions of the required columns within a row.
struct ColumnLayout {
    family: usize,
    body_part: usize,
    original_cost: usize,
    adjusted_cost: usize,
}

impl TransactionReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`TransactionTable`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TransactionTable, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so our own InconsistentRowLength check fires instead
        // of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        let layout = self.locate_columns(&header)?;
        debug!(expected_cols, "read CSV header");

        let mut records = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let cell = |idx: usize| record.get(idx).unwrap_or("");
            records.push(TransactionRecord {
                family: self.category(cell(layout.family), row_index, FAMILY_COLUMN)?,
                body_part: self.category(cell(layout.body_part), row_index, BODY_PART_COLUMN)?,
                original_cost: self.cost(cell(layout.original_cost), row_index, ORIGINAL_COST_COLUMN)?,
                adjusted_cost: self.cost(cell(layout.adjusted_cost), row_index, ADJUSTED_COST_COLUMN)?,
            });
        }

        if records.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let table = TransactionTable::from_records(records);
        info!(
            n_records = table.n_records(),
            n_families = table.vocabulary().families().len(),
            n_body_parts = table.vocabulary().body_parts().len(),
            "transaction table loaded"
        );
        Ok(table)
    }

    fn locate_columns(&self, header: &csv::StringRecord) -> Result<ColumnLayout, IoError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column,
                })
        };
        Ok(ColumnLayout {
            family: find(FAMILY_COLUMN)?,
            body_part: find(BODY_PART_COLUMN)?,
            original_cost: find(ORIGINAL_COST_COLUMN)?,
            adjusted_cost: find(ADJUSTED_COST_COLUMN)?,
        })
    }

    fn category(
        &self,
        raw: &str,
        row_index: usize,
        column: &'static str,
    ) -> Result<String, IoError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(IoError::EmptyCategory {
                path: self.path.clone(),
                row_index,
                column,
            });
        }
        Ok(value.to_string())
    }

    fn cost(&self, raw: &str, row_index: usize, column: &'static str) -> Result<f64, IoError> {
        parse_currency(raw).ok_or_else(|| IoError::InvalidCost {
            path: self.path.clone(),
            row_index,
            column,
            raw: raw.to_string(),
        })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
