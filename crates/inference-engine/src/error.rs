//! Inference Error Types

use feature_engine::{FeatureError, FeatureSchema};
use std::path::PathBuf;
use thiserror::Error;

/// Errors while fitting or running the regression pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Feature row uses schema {actual}, model was trained on {expected}")]
    SchemaMismatch {
        expected: FeatureSchema,
        actual: FeatureSchema,
    },

    #[error("Invalid input shape: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("Normal equations are singular")]
    SingularSystem,

    #[error("Model produced a non-finite prediction")]
    NonFinitePrediction,

    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// Errors while loading or saving a model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Cannot access model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a trip duration model artifact")]
    BadMagic,

    #[error("Unsupported artifact format version {found}, expected {expected}")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("Artifact failed to decode: {0}")]
    Decode(#[source] postcard::Error),

    #[error("Artifact failed to encode: {0}")]
    Encode(#[source] postcard::Error),

    #[error("Artifact is missing its {0}")]
    Missing(&'static str),

    #[error("Artifact is inconsistent: {0}")]
    Corrupt(String),
}
