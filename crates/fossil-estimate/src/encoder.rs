//! One-hot encoding of the two categorical columns.

use fossil_io::{TransactionRecord, Vocabulary};
use tracing::debug;

/// Maps `(family, body_part)` pairs to a dense 0/1 feature vector.
///
/// Columns are laid out as one block per sorted family followed by one block
/// per sorted body part, so the encoding of a pair depends only on the
/// vocabulary it was fitted on. A value outside the vocabulary encodes to an
/// all-zero block instead of failing; callers that need strictness validate
/// against the vocabulary first.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotEncoder {
    families: Vec<String>,
    body_parts: Vec<String>,
}

impl OneHotEncoder {
    /// Fit the encoder on a vocabulary.
    #[must_use]
    pub fn fit(vocabulary: &Vocabulary) -> Self {
        Self {
            families: vocabulary.families().to_vec(),
            body_parts: vocabulary.body_parts().to_vec(),
        }
    }

    /// Number of encoded columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.families.len() + self.body_parts.len()
    }

    /// Column names: `family=<value>` then `body_part=<value>`.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.families
            .iter()
            .map(|f| format!("family={f}"))
            .chain(self.body_parts.iter().map(|p| format!("body_part={p}")))
            .collect()
    }

    /// Encode a single query pair.
    #[must_use]
    pub fn encode(&self, family: &str, body_part: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.width()];
        match self.families.binary_search_by(|f| f.as_str().cmp(family)) {
            Ok(i) => row[i] = 1.0,
            Err(_) => debug!(family, "family not in encoder vocabulary; encoding as zeros"),
        }
        match self.body_parts.binary_search_by(|p| p.as_str().cmp(body_part)) {
            Ok(i) => row[self.families.len() + i] = 1.0,
            Err(_) => debug!(body_part, "body part not in encoder vocabulary; encoding as zeros"),
        }
        row
    }

    /// Encode every record, preserving order.
    #[must_use]
    pub fn transform(&self, records: &[TransactionRecord]) -> Vec<Vec<f64>> {
        records
            .iter()
            .map(|r| self.encode(&r.family, &r.body_part))
            .collect()
    }
}
