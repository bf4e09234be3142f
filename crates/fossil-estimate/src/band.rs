//! Percentile price bands from per-tree predictions.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::EstimateError;
use crate::trainer::TrainedEnsemble;

/// Percentile reported as `lower_bound`.
pub const LOWER_PERCENTILE: f64 = 10.0;
/// Percentile reported as `median`.
pub const MEDIAN_PERCENTILE: f64 = 50.0;
/// Percentile reported as `upper_bound`.
pub const UPPER_PERCENTILE: f64 = 90.0;

/// Central estimate and 10th/90th percentile bounds of an adjusted price.
///
/// Always satisfies `lower_bound <= median <= upper_bound`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBand {
    /// 50th percentile of the per-tree predictions.
    pub median: f64,
    /// 10th percentile of the per-tree predictions.
    pub lower_bound: f64,
    /// 90th percentile of the per-tree predictions.
    pub upper_bound: f64,
}

impl PredictionBand {
    /// Zeroed band used by responses that carry no estimate.
    pub const ZERO: Self = Self {
        median: 0.0,
        lower_bound: 0.0,
        upper_bound: 0.0,
    };

    /// Summarize raw per-tree predictions, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Estimation`] when `predictions` is empty or
    /// holds a non-finite value.
    pub fn from_predictions(predictions: &[f64]) -> Result<Self, EstimateError> {
        if predictions.is_empty() {
            return Err(EstimateError::Estimation {
                reason: "ensemble produced no predictions".into(),
            });
        }
        if predictions.iter().any(|p| !p.is_finite()) {
            return Err(EstimateError::Estimation {
                reason: "ensemble produced a non-finite prediction".into(),
            });
        }

        let mut sorted = predictions.to_vec();
        sorted.sort_by(f64::total_cmp);

        let median = percentile(&sorted, MEDIAN_PERCENTILE);
        // Interpolation is monotone in p, clamp anyway so rounding can never
        // invert the band.
        let lower_bound = percentile(&sorted, LOWER_PERCENTILE).min(median);
        let upper_bound = percentile(&sorted, UPPER_PERCENTILE).max(median);

        Ok(Self {
            median,
            lower_bound,
            upper_bound,
        })
    }
}

/// The `p`-th percentile (0..=100) of ascending `sorted` values.
///
/// Linear interpolation between the two nearest order statistics:
/// `rank = p / 100 * (n - 1)`, result
/// `x[floor(rank)] + frac(rank) * (x[ceil(rank)] - x[floor(rank)])`.
/// Returns `NaN` for an empty slice.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Estimate the adjusted price band for one `(family, body_part)` pair.
///
/// Queries every tree individually; the band is the spread of those raw
/// predictions, not of the forest average.
///
/// # Errors
///
/// Returns [`EstimateError::Estimation`] when the ensemble yields no
/// predictions.
#[instrument(skip(ensemble))]
pub fn estimate(
    ensemble: &TrainedEnsemble,
    family: &str,
    body_part: &str,
) -> Result<PredictionBand, EstimateError> {
    let predictions = ensemble.predict_per_tree(family, body_part)?;
    let band = PredictionBand::from_predictions(&predictions)?;
    debug!(
        n_predictions = predictions.len(),
        median = band.median,
        lower_bound = band.lower_bound,
        upper_bound = band.upper_bound,
        "price band computed"
    );
    Ok(band)
}
