//! Loading and validation of historical fossil transaction tables.

mod domain;
mod error;
mod reader;

pub use domain::{
    ADJUSTED_COST_COLUMN, BODY_PART_COLUMN, FAMILY_COLUMN, ORIGINAL_COST_COLUMN,
    TransactionRecord, TransactionTable, Vocabulary, parse_currency,
};
pub use error::IoError;
pub use reader::TransactionReader;
