//! Model Artifact Persistence
//!
//! A trained pipeline and the training-set IQR are stored together as one
//! postcard blob behind a short header:
//!
//! ```text
//! [magic: 4 bytes "TDMA"][format version: u16 LE][postcard payload]
//! ```
//!
//! Saves write a sibling temporary file and rename it into place.

use crate::pipeline::RegressionPipeline;
use crate::scoring::RegressionScores;
use crate::{ArtifactError, InferenceError};
use feature_engine::{FeatureRow, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const MAGIC: [u8; 4] = *b"TDMA";
const HEADER_LEN: usize = 6;

/// Current on-disk format version
pub const ARTIFACT_FORMAT_VERSION: u16 = 1;

/// How the bundled model was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub alpha: f64,
    pub iqr_multiplier: f64,
    pub train_rows: u64,
    pub validation_rows: u64,
    pub train_scores: RegressionScores,
    pub validation_scores: Option<RegressionScores>,
    /// RFC 3339 timestamp of the training run
    pub trained_at: String,
}

#[derive(Serialize)]
struct StoredArtifactRef<'a> {
    pipeline: Option<&'a RegressionPipeline>,
    train_iqr: Option<f64>,
    metadata: &'a TrainingMetadata,
}

#[derive(Deserialize)]
struct StoredArtifact {
    pipeline: Option<RegressionPipeline>,
    train_iqr: Option<f64>,
    metadata: TrainingMetadata,
}

/// Immutable trained model bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    pipeline: RegressionPipeline,
    train_iqr: f64,
    metadata: TrainingMetadata,
}

impl ModelArtifact {
    pub fn new(
        pipeline: RegressionPipeline,
        train_iqr: f64,
        metadata: TrainingMetadata,
    ) -> Result<Self, ArtifactError> {
        if !train_iqr.is_finite() || train_iqr < 0.0 {
            return Err(ArtifactError::Missing("training IQR"));
        }
        pipeline.check_consistency().map_err(ArtifactError::Corrupt)?;
        Ok(Self {
            pipeline,
            train_iqr,
            metadata,
        })
    }

    pub fn schema(&self) -> FeatureSchema {
        self.pipeline.schema()
    }

    pub fn pipeline(&self) -> &RegressionPipeline {
        &self.pipeline
    }

    /// IQR of the log target on the training set
    pub fn train_iqr(&self) -> f64 {
        self.train_iqr
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }

    /// Raw model output in log-space
    pub fn predict(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        self.pipeline.predict(row)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let stored = StoredArtifactRef {
            pipeline: Some(&self.pipeline),
            train_iqr: Some(self.train_iqr),
            metadata: &self.metadata,
        };
        let mut bytes = Vec::with_capacity(4096);
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&ARTIFACT_FORMAT_VERSION.to_le_bytes());
        let payload = postcard::to_allocvec(&stored).map_err(ArtifactError::Encode)?;
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        if bytes.len() < HEADER_LEN || bytes[..4] != MAGIC {
            return Err(ArtifactError::BadMagic);
        }
        let found = u16::from_le_bytes([bytes[4], bytes[5]]);
        if found != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let stored: StoredArtifact =
            postcard::from_bytes(&bytes[HEADER_LEN..]).map_err(ArtifactError::Decode)?;
        let pipeline = stored.pipeline.ok_or(ArtifactError::Missing("pipeline"))?;
        let train_iqr = stored
            .train_iqr
            .ok_or(ArtifactError::Missing("training IQR"))?;
        Self::new(pipeline, train_iqr, stored.metadata)
    }

    /// Load an artifact written by [`ModelArtifact::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_bytes(&bytes)?;
        info!(
            "Loaded model artifact {} (schema {}, {} bytes)",
            path.display(),
            artifact.schema(),
            bytes.len()
        );
        Ok(artifact)
    }

    /// Write atomically: temporary sibling file, then rename
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let bytes = self.to_bytes()?;
        let tmp = temporary_path(path);
        fs::write(&tmp, &bytes).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        info!("Saved model artifact to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
