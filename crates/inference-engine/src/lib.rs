//! Trip Duration Inference Engine
//!
//! Fits and serves the regression pipeline behind the trip duration model,
//! and persists it as a single artifact.

mod artifact;
mod engine;
mod error;
mod pipeline;
mod scoring;

#[cfg(test)]
mod fixtures;

pub use artifact::{ModelArtifact, TrainingMetadata, ARTIFACT_FORMAT_VERSION};
pub use engine::{duration_from_log, InferenceEngine, InferenceResult, Prediction};
pub use error::{ArtifactError, InferenceError};
pub use pipeline::{OneHotEncoder, RegressionPipeline, RidgeRegressor, StandardScaler, DEFAULT_ALPHA};
pub use scoring::{r2_score, rmse, RegressionScores};
