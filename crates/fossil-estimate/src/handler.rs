//! Request validation and orchestration.

use fossil_io::{TransactionReader, TransactionTable, Vocabulary};
use tracing::{info, instrument, warn};

use crate::band::estimate;
use crate::config::{EmptyInputMode, PipelineConfig};
use crate::error::{CategoryField, EstimateError};
use crate::response::{EstimateResponse, Response};
use crate::trainer::train;

/// One unit of work for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Estimate the price band of a `(family, body_part)` pair.
    Estimate {
        /// Taxonomic family.
        family: String,
        /// Body part.
        body_part: String,
    },
    /// Return the vocabularies only.
    Options,
    /// Return the first `limit` cleaned records and the vocabularies.
    Preview {
        /// Maximum number of records.
        limit: usize,
    },
}

impl Request {
    /// Build an estimate request.
    pub fn estimate(family: impl Into<String>, body_part: impl Into<String>) -> Self {
        Request::Estimate {
            family: family.into(),
            body_part: body_part.into(),
        }
    }

    /// Trim the query and resolve empty input according to `mode`.
    ///
    /// Needs no data, so it runs before the table is read.
    fn normalize(&self, mode: EmptyInputMode) -> Result<Request, EstimateError> {
        let Request::Estimate { family, body_part } = self else {
            return Ok(self.clone());
        };
        let (family, body_part) = (family.trim(), body_part.trim());
        let missing = match (family.is_empty(), body_part.is_empty()) {
            (false, false) => return Ok(Request::estimate(family, body_part)),
            (true, true) => "family and body part are",
            (true, false) => "family is",
            (false, true) => "body part is",
        };
        match mode {
            EmptyInputMode::OptionsOnly => Ok(Request::Options),
            EmptyInputMode::Reject => Err(EstimateError::Argument(format!("{missing} empty"))),
        }
    }
}

/// Everything one invocation needs: its configuration and the loaded table.
///
/// Built per invocation and dropped afterwards; nothing is cached between
/// runs.
#[derive(Debug)]
pub struct PipelineContext {
    config: PipelineConfig,
    table: TransactionTable,
}

impl PipelineContext {
    /// Read the transaction table named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::DataFormat`] when the table cannot be read.
    pub fn load(config: PipelineConfig) -> Result<Self, EstimateError> {
        let table = TransactionReader::new(config.data_path()).read()?;
        Ok(Self::from_table(config, table))
    }

    /// Wrap an already-loaded table.
    #[must_use]
    pub fn from_table(config: PipelineConfig, table: TransactionTable) -> Self {
        Self { config, table }
    }

    /// Return the loaded table.
    #[must_use]
    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    /// Run `request` against the loaded table.
    ///
    /// Estimates go through validation, training and estimation in that
    /// order and stop at the first failure. Options and preview requests
    /// never train.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EstimateError::Argument`] | Empty family or body part in reject mode |
    /// | [`EstimateError::UnknownCategory`] | Family or body part not in the table |
    /// | [`EstimateError::Training`] | Forest configuration invalid |
    /// | [`EstimateError::Estimation`] | No per-tree predictions |
    #[instrument(skip(self))]
    pub fn run(&self, request: &Request) -> Result<EstimateResponse, EstimateError> {
        let vocabulary = self.table.vocabulary();
        match request.normalize(self.config.empty_input())? {
            Request::Options => Ok(EstimateResponse::options(vocabulary)),
            Request::Preview { limit } => Ok(EstimateResponse::options(vocabulary)
                .with_records(self.table.preview(limit).to_vec())),
            Request::Estimate { family, body_part } => {
                validate(vocabulary, &family, &body_part)?;
                let ensemble = train(&self.table, self.config.forest())?;
                let band = estimate(&ensemble, &family, &body_part)?;
                info!(%family, %body_part, median = band.median, "estimate ready");
                Ok(EstimateResponse::new(band, vocabulary))
            }
        }
    }
}

fn validate(vocabulary: &Vocabulary, family: &str, body_part: &str) -> Result<(), EstimateError> {
    if !vocabulary.contains_family(family) {
        return Err(EstimateError::UnknownCategory {
            field: CategoryField::Family,
            value: family.to_string(),
            available: vocabulary.families().to_vec(),
        });
    }
    if !vocabulary.contains_body_part(body_part) {
        return Err(EstimateError::UnknownCategory {
            field: CategoryField::BodyPart,
            value: body_part.to_string(),
            available: vocabulary.body_parts().to_vec(),
        });
    }
    Ok(())
}

/// Handle one request end to end, always producing a [`Response`].
///
/// Empty input is checked before the table is read, so a rejected request
/// never touches the file.
#[instrument(skip(config), fields(data = %config.data_path().display()))]
pub fn handle(config: PipelineConfig, request: &Request) -> Response {
    let result = request
        .normalize(config.empty_input())
        .and_then(|request| PipelineContext::load(config)?.run(&request));
    if let Err(e) = &result {
        warn!(error = %e, "request failed");
    }
    Response::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fossil_io::TransactionRecord;
    use fossil_rf::RandomForestConfig;

    fn context(mode: EmptyInputMode) -> PipelineContext {
        let table = TransactionTable::from_records(vec![
            TransactionRecord::new("Theropoda", "Skull", 900.0, 1000.0),
            TransactionRecord::new("Theropoda", "Tooth", 90.0, 100.0),
            TransactionRecord::new("Sauropoda", "Femur", 4000.0, 5000.0),
        ]);
        let config = PipelineConfig::new("unused.csv")
            .with_forest(RandomForestConfig::new(20).unwrap())
            .with_empty_input(mode);
        PipelineContext::from_table(config, table)
    }

    #[test]
    fn normalize_trims_query() {
        let request = Request::estimate(" Theropoda ", "Skull\t");
        assert_eq!(
            request.normalize(EmptyInputMode::Reject).unwrap(),
            Request::estimate("Theropoda", "Skull")
        );
    }

    #[test]
    fn empty_input_rejected_by_default() {
        let err = context(EmptyInputMode::Reject)
            .run(&Request::estimate("", "Skull"))
            .unwrap_err();
        match err {
            EstimateError::Argument(msg) => assert_eq!(msg, "family is empty"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_answers_options_when_configured() {
        let response = context(EmptyInputMode::OptionsOnly)
            .run(&Request::estimate("Theropoda", "  "))
            .unwrap();
        assert_eq!(response.band.median, 0.0);
        assert_eq!(response.available_families, vec!["Sauropoda", "Theropoda"]);
    }

    #[test]
    fn unknown_body_part_is_reported_as_body_part() {
        let err = context(EmptyInputMode::Reject)
            .run(&Request::estimate("Theropoda", "Wing"))
            .unwrap_err();
        match err {
            EstimateError::UnknownCategory {
                field,
                value,
                available,
            } => {
                assert_eq!(field, CategoryField::BodyPart);
                assert_eq!(value, "Wing");
                assert_eq!(available, vec!["Femur", "Skull", "Tooth"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn family_checked_before_body_part() {
        let err = context(EmptyInputMode::Reject)
            .run(&Request::estimate("Raptor", "Wing"))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimateError::UnknownCategory {
                field: CategoryField::Family,
                ..
            }
        ));
    }

    #[test]
    fn preview_is_bounded() {
        let response = context(EmptyInputMode::Reject)
            .run(&Request::Preview { limit: 2 })
            .unwrap();
        let records = response.records.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].family, "Theropoda");
        assert_eq!(response.band, crate::PredictionBand::ZERO);
    }

    #[test]
    fn estimate_carries_vocabularies() {
        let response = context(EmptyInputMode::Reject)
            .run(&Request::estimate("Sauropoda", "Femur"))
            .unwrap();
        assert!(response.band.lower_bound <= response.band.median);
        assert!(response.band.median <= response.band.upper_bound);
        assert_eq!(response.available_body_parts, vec!["Femur", "Skull", "Tooth"]);
    }

    #[test]
    fn reject_skips_file_read() {
        let config = PipelineConfig::new("/nonexistent/fossils.csv");
        let response = handle(config, &Request::estimate("", ""));
        assert_eq!(
            response,
            Response::Error {
                error: "family and body part are empty".into()
            }
        );
    }
}
