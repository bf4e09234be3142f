//! Fossil price range estimation.
//!
//! Ties the transaction reader and the random forest together: categories
//! are one-hot encoded, a forest is fit on inflation-adjusted sale prices,
//! and the spread of per-tree predictions for a query becomes a
//! 10th/50th/90th percentile price band.
//!
//! The usual entry point is [`handle`], which runs one [`Request`] against a
//! [`PipelineConfig`] and always produces a serializable [`Response`].

mod band;
mod config;
mod encoder;
mod error;
mod handler;
mod response;
mod trainer;

pub use band::{
    LOWER_PERCENTILE, MEDIAN_PERCENTILE, PredictionBand, UPPER_PERCENTILE, estimate, percentile,
};
pub use config::{DEFAULT_DATA_PATH, DEFAULT_PREVIEW_LIMIT, EmptyInputMode, PipelineConfig};
pub use encoder::OneHotEncoder;
pub use error::{CategoryField, EstimateError};
pub use handler::{PipelineContext, Request, handle};
pub use response::{EstimateResponse, Response};
pub use trainer::{TrainedEnsemble, train};
