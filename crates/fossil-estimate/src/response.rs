//! Serializable pipeline output.

use fossil_io::{TransactionRecord, Vocabulary};
use serde::Serialize;

use crate::band::PredictionBand;
use crate::error::EstimateError;

/// A successful answer: a price band plus the vocabularies the caller may
/// choose from.
///
/// Requests that do not estimate anything (options, preview, tolerated empty
/// input) carry a zeroed band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    /// Price band, flattened into `median`, `lowerBound` and `upperBound`.
    #[serde(flatten)]
    pub band: PredictionBand,
    /// Sorted distinct families in the table.
    pub available_families: Vec<String>,
    /// Sorted distinct body parts in the table.
    pub available_body_parts: Vec<String>,
    /// Cleaned records, present only for preview requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<TransactionRecord>>,
}

impl EstimateResponse {
    /// A response carrying `band` and the full vocabularies.
    #[must_use]
    pub fn new(band: PredictionBand, vocabulary: &Vocabulary) -> Self {
        Self {
            band,
            available_families: vocabulary.families().to_vec(),
            available_body_parts: vocabulary.body_parts().to_vec(),
            records: None,
        }
    }

    /// A zeroed response carrying only the vocabularies.
    #[must_use]
    pub fn options(vocabulary: &Vocabulary) -> Self {
        Self::new(PredictionBand::ZERO, vocabulary)
    }

    /// Attach preview records.
    #[must_use]
    pub fn with_records(mut self, records: Vec<TransactionRecord>) -> Self {
        self.records = Some(records);
        self
    }
}

/// Outcome of handling one request, rendered as a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Estimate, options or preview payload.
    Success(EstimateResponse),
    /// `{"error": message}`.
    Error {
        /// User-facing message, free of filesystem paths.
        error: String,
    },
}

impl Response {
    /// Return `true` for the error shape.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Render as compact JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which only occur for non-string map
    /// keys and therefore never for these shapes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Result<EstimateResponse, EstimateError>> for Response {
    fn from(result: Result<EstimateResponse, EstimateError>) -> Self {
        match result {
            Ok(success) => Response::Success(success),
            Err(e) => Response::Error {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_records(&[
            TransactionRecord::new("Theropoda", "Skull", 1.0, 2.0),
            TransactionRecord::new("Sauropoda", "Femur", 1.0, 2.0),
        ])
    }

    #[test]
    fn success_shape_is_flat_camel_case() {
        let band = PredictionBand {
            median: 2.0,
            lower_bound: 1.0,
            upper_bound: 3.0,
        };
        let response = Response::Success(EstimateResponse::new(band, &vocabulary()));
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["median"], 2.0);
        assert_eq!(json["lowerBound"], 1.0);
        assert_eq!(json["upperBound"], 3.0);
        assert_eq!(json["availableFamilies"], serde_json::json!(["Sauropoda", "Theropoda"]));
        assert_eq!(json["availableBodyParts"], serde_json::json!(["Femur", "Skull"]));
        assert!(json.get("records").is_none());
        assert!(!response.is_error());
    }

    #[test]
    fn options_are_zeroed() {
        let response = EstimateResponse::options(&vocabulary());
        assert_eq!(response.band, PredictionBand::ZERO);
        assert_eq!(response.available_families.len(), 2);
    }

    #[test]
    fn preview_includes_records() {
        let records = vec![TransactionRecord::new("Theropoda", "Skull", 1.0, 2.0)];
        let response = EstimateResponse::options(&vocabulary()).with_records(records);
        let json = serde_json::to_value(Response::Success(response)).unwrap();
        assert_eq!(json["records"][0]["bodyPart"], "Skull");
    }

    #[test]
    fn error_shape() {
        let response = Response::from(Err(EstimateError::Argument("family is empty".into())));
        assert!(response.is_error());
        assert_eq!(response.to_json().unwrap(), r#"{"error":"family is empty"}"#);
    }
}
