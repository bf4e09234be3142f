//! Domain types for fossil-io.

use std::collections::BTreeSet;

use serde::Serialize;

/// Header of the taxonomic family column.
pub const FAMILY_COLUMN: &str = "Fossil Family";
/// Header of the body part column.
pub const BODY_PART_COLUMN: &str = "Body part";
/// Header of the nominal sale price column.
pub const ORIGINAL_COST_COLUMN: &str = "Original Cost";
/// Header of the inflation-adjusted sale price column (the regression target).
pub const ADJUSTED_COST_COLUMN: &str = "Adjusted Cost";

/// Parse a currency-formatted amount such as `"$12,345.00"`.
///
/// Strips surrounding whitespace, every `$` and every `,`, then parses the
/// remainder as `f64`. Returns `None` for empty, unparseable, or non-finite
/// input (`"N/A"`, `"inf"`).
#[must_use]
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// One historical fossil sale with costs already parsed to numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Taxonomic family, e.g. `Theropoda`.
    pub family: String,
    /// Body part sold, e.g. `Skull`.
    pub body_part: String,
    /// Price at the time of sale.
    pub original_cost: f64,
    /// Inflation-adjusted price.
    pub adjusted_cost: f64,
}

impl TransactionRecord {
    /// Create a record from already-cleaned values.
    pub fn new(
        family: impl Into<String>,
        body_part: impl Into<String>,
        original_cost: f64,
        adjusted_cost: f64,
    ) -> Self {
        Self {
            family: family.into(),
            body_part: body_part.into(),
            original_cost,
            adjusted_cost,
        }
    }
}

/// Sorted distinct category values observed in a transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    families: Vec<String>,
    body_parts: Vec<String>,
}

impl Vocabulary {
    /// Collect the sorted distinct families and body parts of `records`.
    #[must_use]
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let families: BTreeSet<&str> = records.iter().map(|r| r.family.as_str()).collect();
        let body_parts: BTreeSet<&str> = records.iter().map(|r| r.body_part.as_str()).collect();
        Self {
            families: families.into_iter().map(String::from).collect(),
            body_parts: body_parts.into_iter().map(String::from).collect(),
        }
    }

    /// Return the sorted distinct families.
    #[must_use]
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Return the sorted distinct body parts.
    #[must_use]
    pub fn body_parts(&self) -> &[String] {
        &self.body_parts
    }

    /// Return `true` if `family` was observed.
    #[must_use]
    pub fn contains_family(&self, family: &str) -> bool {
        self.families
            .binary_search_by(|f| f.as_str().cmp(family))
            .is_ok()
    }

    /// Return `true` if `body_part` was observed.
    #[must_use]
    pub fn contains_body_part(&self, body_part: &str) -> bool {
        self.body_parts
            .binary_search_by(|p| p.as_str().cmp(body_part))
            .is_ok()
    }
}

/// A cleaned transaction table and its category vocabulary.
///
/// Produced by [`TransactionReader`](crate::TransactionReader). The
/// vocabulary is computed once at construction and never changes.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    records: Vec<TransactionRecord>,
    vocabulary: Vocabulary,
}

impl TransactionTable {
    /// Build a table from cleaned records, computing the vocabulary.
    #[must_use]
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        let vocabulary = Vocabulary::from_records(&records);
        Self {
            records,
            vocabulary,
        }
    }

    /// Return all records in file order.
    #[must_use]
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Return the category vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Return the adjusted costs in record order.
    #[must_use]
    pub fn adjusted_costs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.adjusted_cost).collect()
    }

    /// Return at most the first `limit` records.
    #[must_use]
    pub fn preview(&self, limit: usize) -> &[TransactionRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// Return the number of records.
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_currency_strips_symbol_and_separators() {
        assert_eq!(parse_currency("$1,234.50"), Some(1234.50));
        assert_eq!(parse_currency("$12,345.00"), Some(12345.0));
        assert_eq!(parse_currency(" 800 "), Some(800.0));
        assert_eq!(parse_currency("$ 1,000,000"), Some(1_000_000.0));
    }

    #[test]
    fn parse_currency_rejects_garbage() {
        assert_eq!(parse_currency("N/A"), None);
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("inf"), None);
        assert_eq!(parse_currency("NaN"), None);
    }

    fn sample_records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("Theropoda", "Tooth", 500.0, 650.0),
            TransactionRecord::new("Ceratopsidae", "Skull", 90_000.0, 120_000.0),
            TransactionRecord::new("Theropoda", "Skull", 1_000_000.0, 1_300_000.0),
        ]
    }

    #[test]
    fn vocabulary_is_sorted_and_distinct() {
        let vocab = Vocabulary::from_records(&sample_records());
        assert_eq!(vocab.families(), &["Ceratopsidae", "Theropoda"]);
        assert_eq!(vocab.body_parts(), &["Skull", "Tooth"]);
        assert!(vocab.contains_family("Theropoda"));
        assert!(!vocab.contains_family("Sauropoda"));
        assert!(vocab.contains_body_part("Tooth"));
        assert!(!vocab.contains_body_part("tooth"));
    }

    #[test]
    fn preview_is_bounded_by_table_size() {
        let table = TransactionTable::from_records(sample_records());
        assert_eq!(table.preview(2).len(), 2);
        assert_eq!(table.preview(30).len(), 3);
        assert_eq!(table.preview(0).len(), 0);
        assert_eq!(table.preview(1)[0].body_part, "Tooth");
    }

    #[test]
    fn adjusted_costs_follow_record_order() {
        let table = TransactionTable::from_records(sample_records());
        assert_eq!(table.adjusted_costs(), vec![650.0, 120_000.0, 1_300_000.0]);
        assert_eq!(table.n_records(), 3);
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(&sample_records()[0]).unwrap();
        assert_eq!(json["family"], "Theropoda");
        assert_eq!(json["bodyPart"], "Tooth");
        assert_eq!(json["adjustedCost"], 650.0);
    }
}
