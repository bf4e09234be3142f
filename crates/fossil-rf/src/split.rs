use rand::Rng;

use crate::node::{FeatureIndex, Impurity};

/// Strategy for choosing split thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMethod {
    /// Scan every boundary between sorted distinct values.
    #[default]
    Exact,
    /// Draw one uniform random threshold per candidate feature (Extremely
    /// Randomized Trees).
    ExtraTrees,
}

/// Running sums over the targets of a set of samples.
///
/// Supports O(1) add/remove so the exact scan can move samples from the
/// right child to the left one incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TargetStats {
    pub(crate) count: usize,
    pub(crate) sum: f64,
    pub(crate) sum_sq: f64,
}

impl TargetStats {
    pub(crate) fn from_indices(targets: &[f64], sample_indices: &[usize]) -> Self {
        let mut stats = Self::default();
        for &si in sample_indices {
            stats.push(targets[si]);
        }
        stats
    }

    pub(crate) fn push(&mut self, y: f64) {
        self.count += 1;
        self.sum += y;
        self.sum_sq += y * y;
    }

    pub(crate) fn remove(&mut self, y: f64) {
        self.count -= 1;
        self.sum -= y;
        self.sum_sq -= y * y;
    }

    /// Mean target, or 0.0 for an empty set.
    pub(crate) fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Sum of squared deviations from the mean.
    ///
    /// Clamped at zero: cancellation in `sum_sq - sum²/n` can go slightly
    /// negative for near-constant targets.
    pub(crate) fn sse(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.count as f64).max(0.0)
    }

    /// Mean squared error around the mean.
    pub(crate) fn impurity(&self) -> Impurity {
        if self.count == 0 {
            return Impurity::new(0.0);
        }
        Impurity::new(self.sse() / self.count as f64)
    }
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Threshold value.
    pub(crate) threshold: f64,
    /// Reduction in summed squared error from this split.
    pub(crate) impurity_decrease: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Find the best split among a random subset of features.
///
/// For each of `max_features` randomly chosen features, proposes thresholds
/// according to `split_method` and keeps the one with the largest reduction
/// in summed squared error.
///
/// Returns `None` when no valid split exists (all values identical,
/// or every split would violate `min_samples_leaf`).
///
/// # Column-major layout
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
/// `sample_indices` are indices into these inner Vecs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    parent: &TargetStats,
    split_method: SplitMethod,
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_features = features.len();
    let n_samples = sample_indices.len();

    if n_samples < 2 || n_features == 0 {
        return None;
    }

    let parent_sse = parent.sse();

    // Partial Fisher-Yates: shuffle only the first `max_features` positions.
    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let take = max_features.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        feature_order.swap(i, j);
    }

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, f64)> = None;

    for &feat_idx in &feature_order[..take] {
        let feat_col = &features[feat_idx];
        let candidate = match split_method {
            SplitMethod::Exact => {
                exact_threshold(feat_col, targets, sample_indices, parent, min_samples_leaf)
            }
            SplitMethod::ExtraTrees => {
                random_threshold(feat_col, targets, sample_indices, min_samples_leaf, rng)
            }
        };
        let Some((threshold, children_sse)) = candidate else {
            continue;
        };
        let decrease = parent_sse - children_sse;
        if decrease > best_decrease {
            best_decrease = decrease;
            best = Some((FeatureIndex::new(feat_idx), threshold));
        }
    }

    let (best_feature, threshold) = best?;

    let feat_col = &features[best_feature.index()];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| feat_col[si] <= threshold);

    Some(SplitResult {
        feature: best_feature,
        threshold,
        impurity_decrease: best_decrease.max(0.0),
        left_indices,
        right_indices,
    })
}

/// Scan sorted values and return the threshold minimizing children SSE.
fn exact_threshold(
    feat_col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    parent: &TargetStats,
    min_samples_leaf: usize,
) -> Option<(f64, f64)> {
    let n_samples = sample_indices.len();
    let mut sorted: Vec<(f64, usize)> = sample_indices
        .iter()
        .map(|&si| (feat_col[si], si))
        .collect();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut left = TargetStats::default();
    let mut right = *parent;
    let mut best: Option<(f64, f64)> = None;

    for i in 0..(n_samples - 1) {
        let (val_i, si) = sorted[i];
        left.push(targets[si]);
        right.remove(targets[si]);

        let val_next = sorted[i + 1].0;
        if val_i == val_next {
            continue;
        }
        if left.count < min_samples_leaf || right.count < min_samples_leaf {
            continue;
        }

        let children_sse = left.sse() + right.sse();
        if best.is_none_or(|(_, b)| children_sse < b) {
            best = Some(((val_i + val_next) / 2.0, children_sse));
        }
    }
    best
}

/// Draw a threshold uniformly in `[min, max)` of the feature values.
fn random_threshold(
    feat_col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<(f64, f64)> {
    let (lo, hi) = sample_indices
        .iter()
        .map(|&si| feat_col[si])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo >= hi {
        return None;
    }
    let threshold = rng.gen_range(lo..hi);

    let mut left = TargetStats::default();
    let mut right = TargetStats::default();
    for &si in sample_indices {
        if feat_col[si] <= threshold {
            left.push(targets[si]);
        } else {
            right.push(targets[si]);
        }
    }
    if left.count < min_samples_leaf || right.count < min_samples_leaf {
        return None;
    }
    Some((threshold, left.sse() + right.sse()))
}
