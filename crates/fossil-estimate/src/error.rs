//! Error taxonomy for the estimation pipeline.
//!
//! Every message is safe to show to an end user: no variant renders a
//! filesystem path.

use std::fmt;

use fossil_io::IoError;
use fossil_rf::RfError;

/// Which query field failed vocabulary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    /// The taxonomic family.
    Family,
    /// The body part.
    BodyPart,
}

impl CategoryField {
    /// Machine-readable field name: `"family"` or `"body_part"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CategoryField::Family => "family",
            CategoryField::BodyPart => "body_part",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryField::Family => f.write_str("family"),
            CategoryField::BodyPart => f.write_str("body part"),
        }
    }
}

/// Errors from a single estimation request.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// Returned when the request itself is malformed (e.g. an empty family).
    #[error("{0}")]
    Argument(String),

    /// Returned when the transaction table cannot be read or cleaned.
    #[error(transparent)]
    DataFormat(#[from] IoError),

    /// Returned when a query category was never observed in the data.
    #[error("unknown {field} \"{value}\"; expected one of: {}", .available.join(", "))]
    UnknownCategory {
        /// Field that was rejected.
        field: CategoryField,
        /// The rejected value as given.
        value: String,
        /// Valid choices, sorted.
        available: Vec<String>,
    },

    /// Returned when the forest cannot be fit.
    #[error("model training failed: {0}")]
    Training(#[from] RfError),

    /// Returned when a price band cannot be computed.
    #[error("estimation failed: {reason}")]
    Estimation {
        /// Why the band could not be computed.
        reason: String,
    },
}
