//! Domain-specific error types for nids-lab.
//!
//! Uses `thiserror` for ergonomic error definitions that integrate
//! with the broader `anyhow` error handling strategy.

use thiserror::Error;

/// Errors raised by a classifier while fitting or predicting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,

    #[error("Feature rows and labels differ in length ({samples} samples, {labels} labels)")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("Sample has {actual} features, model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Classifier has not been fitted")]
    NotFitted,
}

/// Errors surfaced by a classifier session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Predict was requested before any successful train.
    #[error("Model is not trained yet. Please train the model first.")]
    Untrained,

    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Split leaves an empty partition ({train} training / {test} evaluation records)")]
    EmptyPartition { train: usize, test: usize },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Errors for manually entered feature values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Unknown feature '{0}' (expected one of: packet_size, duration, src_bytes, dst_bytes, count)")]
    UnknownFeature(String),

    #[error("Invalid value for {feature}: '{raw}'")]
    InvalidNumber { feature: &'static str, raw: String },

    #[error("{feature} must be between {min} and {max} (got {value})")]
    OutOfRange {
        feature: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
