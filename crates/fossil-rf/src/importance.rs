//! Feature importance aggregation across trees.

use crate::tree::DecisionTree;

/// A ranked feature with name, importance score, and rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Normalized importance score (sums to 1.0 across all features).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Average per-tree MDI importances and rank them.
///
/// Trees that never split contribute all zeros. Ties keep column order.
/// When no tree split at all, every feature gets importance 0.0.
pub(crate) fn aggregate_importances(
    trees: &[DecisionTree],
    names: &[String],
) -> Vec<RankedFeature> {
    if trees.is_empty() || names.is_empty() {
        return vec![];
    }

    let mut totals = vec![0.0f64; names.len()];
    for tree in trees {
        for (total, val) in totals.iter_mut().zip(tree.feature_importances()) {
            *total += val;
        }
    }

    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter_mut().for_each(|v| *v /= sum);
    }

    let mut features: Vec<RankedFeature> = names
        .iter()
        .zip(totals)
        .map(|(name, importance)| RankedFeature {
            name: name.clone(),
            importance,
            rank: 0,
        })
        .collect();

    // Stable sort so equal scores stay in column order.
    features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feat) in features.iter_mut().enumerate() {
        feat.rank = i + 1;
    }
    features
}

#[cfg(test)]
mod tests {
    use super::aggregate_importances;
    use crate::tree::DecisionTreeConfig;

    #[test]
    fn informative_column_ranks_first() {
        // Only column 1 carries signal.
        let features = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ];
        let targets = vec![10.0, 10.0, 500.0, 500.0];
        let tree = DecisionTreeConfig::new().fit(&features, &targets).unwrap();
        let names = vec!["noise".to_string(), "signal".to_string()];

        let ranked = aggregate_importances(&[tree], &names);
        assert_eq!(ranked[0].name, "signal");
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].importance - 1.0).abs() < 1e-10);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn single_leaf_trees_give_zero_importance() {
        let features = vec![vec![1.0], vec![2.0]];
        let tree = DecisionTreeConfig::new().fit(&features, &[5.0, 5.0]).unwrap();
        let ranked = aggregate_importances(&[tree], &["x".to_string()]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].importance, 0.0);
    }
}
