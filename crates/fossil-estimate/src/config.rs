//! Per-invocation pipeline configuration.

use std::path::{Path, PathBuf};

use fossil_rf::RandomForestConfig;

/// Transaction table read when no path is given, relative to the working
/// directory.
pub const DEFAULT_DATA_PATH: &str = "Dinosaur_Fossil_Transactions.csv";

/// Number of records returned by a preview request when none is given.
pub const DEFAULT_PREVIEW_LIMIT: usize = 30;

/// What to do with an estimate request whose family or body part is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputMode {
    /// Fail with an argument error.
    #[default]
    Reject,
    /// Answer with the vocabularies and zeroed numbers, without training.
    OptionsOnly,
}

/// Configuration for one run of the estimation pipeline.
///
/// # Defaults
///
/// | Parameter    | Default                                  |
/// |--------------|------------------------------------------|
/// | `forest`     | [`RandomForestConfig::default`]          |
/// | `empty_input`| [`EmptyInputMode::Reject`]               |
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    data_path: PathBuf,
    forest: RandomForestConfig,
    empty_input: EmptyInputMode,
}

impl PipelineConfig {
    /// Create a config reading the table at `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            forest: RandomForestConfig::default(),
            empty_input: EmptyInputMode::default(),
        }
    }

    /// Set the forest hyperparameters.
    #[must_use]
    pub fn with_forest(mut self, forest: RandomForestConfig) -> Self {
        self.forest = forest;
        self
    }

    /// Set the empty-input handling mode.
    #[must_use]
    pub fn with_empty_input(mut self, empty_input: EmptyInputMode) -> Self {
        self.empty_input = empty_input;
        self
    }

    /// Return the transaction table path.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Return the forest hyperparameters.
    #[must_use]
    pub fn forest(&self) -> &RandomForestConfig {
        &self.forest
    }

    /// Return the empty-input handling mode.
    #[must_use]
    pub fn empty_input(&self) -> EmptyInputMode {
        self.empty_input
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}
