//! Trainer Error Types

use feature_engine::FeatureError;
use inference_engine::{ArtifactError, InferenceError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid trip on line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("No {stage} rows left after filtering")]
    EmptyDataset { stage: &'static str },

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
