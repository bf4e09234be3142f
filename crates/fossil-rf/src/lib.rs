//! Random Forest regression: train, predict, inspect per-tree spread.
//!
//! Provides a hand-rolled Random Forest regressor with CART decision trees,
//! squared-error (variance reduction) splits, seeded bootstrap sampling,
//! parallel training via rayon, and mean-decrease-in-impurity feature
//! importances. Every tree can be queried individually so callers can use
//! the spread of per-tree predictions as an uncertainty signal.

mod config;
mod error;
mod forest;
mod importance;
mod node;
mod predict;
mod result;
mod split;
mod tree;

pub use config::{DEFAULT_N_TREES, MaxFeatures, RandomForestConfig};
pub use error::RfError;
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use result::{RandomForestResult, TrainingMetadata};
pub use split::SplitMethod;
pub use tree::{DecisionTree, DecisionTreeConfig};
