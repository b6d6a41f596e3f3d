//! Inference Engine Implementation

use crate::artifact::ModelArtifact;
use crate::{ArtifactError, InferenceError};
use feature_engine::{FeatureEngineer, FeatureRow, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use trip_types::TripRecord;

/// Convert a log1p-space model output into whole seconds.
///
/// Negative outputs clamp to zero. Outputs whose duration overflows `u64`
/// are rejected rather than saturated.
pub fn duration_from_log(log_duration: f64) -> Result<u64, InferenceError> {
    if !log_duration.is_finite() {
        return Err(InferenceError::NonFinitePrediction);
    }
    let seconds = log_duration.exp_m1().round();
    if !seconds.is_finite() || seconds >= u64::MAX as f64 {
        return Err(InferenceError::NonFinitePrediction);
    }
    Ok(seconds.max(0.0) as u64)
}

/// Prediction for one trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted trip duration in seconds
    pub trip_duration: u64,
    /// Raw model output, `log1p(seconds)`
    pub log_duration: f64,
}

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    pub predictions: Vec<Prediction>,
    /// Wall time spent engineering and predicting
    pub latency_ms: f64,
}

/// Shared read-only model plus the feature engineer it was trained with
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    artifact: Arc<ModelArtifact>,
    engineer: FeatureEngineer,
    model_path: Option<PathBuf>,
}

impl InferenceEngine {
    /// Create an engine around an already loaded artifact
    pub fn new(artifact: ModelArtifact, engineer: FeatureEngineer) -> Self {
        Self {
            artifact: Arc::new(artifact),
            engineer,
            model_path: None,
        }
    }

    /// Load the artifact from disk
    pub fn load(path: impl AsRef<Path>, engineer: FeatureEngineer) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        info!("Creating inference engine with model: {}", path.display());
        let artifact = ModelArtifact::load(path)?;
        Ok(Self {
            model_path: Some(path.to_path_buf()),
            ..Self::new(artifact, engineer)
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn engineer(&self) -> &FeatureEngineer {
        &self.engineer
    }

    pub fn schema(&self) -> FeatureSchema {
        self.artifact.schema()
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Feature row the model sees for a trip
    pub fn feature_row(&self, trip: &TripRecord) -> Result<FeatureRow, InferenceError> {
        Ok(self.engineer.feature_row(trip, self.schema())?)
    }

    /// Predict the duration of a single trip
    pub fn predict(&self, trip: &TripRecord) -> Result<Prediction, InferenceError> {
        let row = self.feature_row(trip)?;
        let log_duration = self.artifact.predict(&row)?;
        let trip_duration = duration_from_log(log_duration)?;
        debug!("Predicted {}s (log {:.4})", trip_duration, log_duration);
        Ok(Prediction {
            trip_duration,
            log_duration,
        })
    }

    /// Predict a batch, failing on the first bad trip
    pub fn predict_batch(&self, trips: &[TripRecord]) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();
        let predictions = trips
            .iter()
            .map(|trip| self.predict(trip))
            .collect::<Result<Vec<_>, _>>()?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("Batch of {} completed in {:.2}ms", predictions.len(), latency_ms);
        Ok(InferenceResult {
            predictions,
            latency_ms,
        })
    }
}
