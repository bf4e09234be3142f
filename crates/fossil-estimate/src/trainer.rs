//! Fitting the price forest on a transaction table.

use fossil_io::TransactionTable;
use fossil_rf::{RandomForest, RandomForestConfig};
use tracing::{debug, info, instrument};

use crate::encoder::OneHotEncoder;
use crate::error::EstimateError;

/// A fitted encoder and the forest trained on its output.
///
/// The two always travel together: the forest's feature columns are exactly
/// the encoder's columns.
#[derive(Debug, Clone)]
pub struct TrainedEnsemble {
    encoder: OneHotEncoder,
    forest: RandomForest,
}

impl TrainedEnsemble {
    /// Return the fitted encoder.
    #[must_use]
    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// Return the fitted forest.
    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// One raw adjusted-cost prediction per tree for the given pair.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Training`] if the encoded width does not
    /// match the forest, which only happens if the pair was mixed up with
    /// another ensemble's encoder.
    pub fn predict_per_tree(&self, family: &str, body_part: &str) -> Result<Vec<f64>, EstimateError> {
        let row = self.encoder.encode(family, body_part);
        Ok(self.forest.predict_per_tree(&row)?)
    }
}

/// Encode `table` and fit a forest on its adjusted costs.
///
/// # Errors
///
/// Returns [`EstimateError::Training`] when the table is empty or the
/// forest configuration is invalid for the encoded width.
#[instrument(skip_all, fields(n_records = table.n_records(), n_trees = config.n_trees()))]
pub fn train(
    table: &TransactionTable,
    config: &RandomForestConfig,
) -> Result<TrainedEnsemble, EstimateError> {
    let encoder = OneHotEncoder::fit(table.vocabulary());
    let features = encoder.transform(table.records());
    let targets = table.adjusted_costs();

    let result = config.fit(&features, &targets, &encoder.feature_names())?;

    let meta = result.metadata();
    info!(
        n_trees = meta.n_trees,
        n_features = meta.n_features,
        n_samples = meta.n_samples,
        "price forest trained"
    );
    for feat in result.importances() {
        debug!(rank = feat.rank, feature = %feat.name, importance = feat.importance, "feature importance");
    }

    Ok(TrainedEnsemble {
        encoder,
        forest: result.into_forest(),
    })
}
