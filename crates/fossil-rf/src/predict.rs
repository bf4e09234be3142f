//! Prediction methods for the Random Forest ensemble.

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::tree::DecisionTree;

impl RandomForest {
    /// Return one raw prediction per tree, in tree order.
    ///
    /// The spread of these values is what callers use as an uncertainty
    /// signal; no averaging is applied.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_per_tree(&self, sample: &[f64]) -> Result<Vec<f64>, RfError> {
        self.check_width(sample)?;
        self.trees.iter().map(|tree| tree.predict(sample)).collect()
    }

    /// Predict the target for a single sample as the mean of all trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, RfError> {
        let per_tree = self.predict_per_tree(sample)?;
        Ok(per_tree.iter().sum::<f64>() / per_tree.len() as f64)
    }

    /// Return the fitted trees in training order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn check_width(&self, sample: &[f64]) -> Result<(), RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RandomForestConfig;

    fn fit_small() -> crate::RandomForest {
        let features = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ];
        let targets = vec![100.0, 140.0, 800.0, 900.0];
        let names = vec!["a".to_string(), "b".to_string()];
        RandomForestConfig::new(8)
            .unwrap()
            .with_min_samples_split(2)
            .with_min_samples_leaf(1)
            .fit(&features, &targets, &names)
            .unwrap()
            .into_forest()
    }

    #[test]
    fn per_tree_has_one_value_per_tree() {
        let forest = fit_small();
        let per_tree = forest.predict_per_tree(&[1.0, 0.0]).unwrap();
        assert_eq!(per_tree.len(), forest.n_trees());
    }

    #[test]
    fn predict_is_mean_of_per_tree() {
        let forest = fit_small();
        let sample = [0.0, 1.0];
        let per_tree = forest.predict_per_tree(&sample).unwrap();
        let mean = per_tree.iter().sum::<f64>() / per_tree.len() as f64;
        assert!((forest.predict(&sample).unwrap() - mean).abs() < 1e-9);
    }

    #[test]
    fn wrong_width_rejected() {
        let forest = fit_small();
        assert!(matches!(
            forest.predict_per_tree(&[1.0]),
            Err(crate::RfError::PredictionFeatureMismatch { expected: 2, got: 1 })
        ));
    }
}
