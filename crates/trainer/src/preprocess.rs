//! Training Preprocessing Pipeline
//!
//! sanity clean -> log target -> IQR filter -> engineer -> project

use crate::dataset::LabeledTrip;
use crate::TrainerError;
use feature_engine::{
    filter_by_iqr, FeatureEngineer, FeatureRow, FeatureSchema, IqrBounds, IqrSource,
    OutlierConfig, SanityBounds,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Knobs of the preprocessing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub sanity: SanityBounds,
    pub outlier: OutlierConfig,
    pub schema: FeatureSchema,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            sanity: SanityBounds::default(),
            outlier: OutlierConfig::default(),
            schema: FeatureSchema::Inference,
        }
    }
}

/// Model-ready rows with their log-duration targets
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
    pub iqr: IqrBounds,
    pub dropped_by_sanity: usize,
    pub dropped_by_iqr: usize,
}

impl PreparedData {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run the full preprocessing pipeline on one dataset.
///
/// `stage` only labels log lines and errors ("train", "validation", ...).
pub fn prepare(
    trips: Vec<LabeledTrip>,
    source: IqrSource,
    config: &PreprocessConfig,
    engineer: &FeatureEngineer,
    stage: &'static str,
) -> Result<PreparedData, TrainerError> {
    let total = trips.len();
    let clean: Vec<LabeledTrip> = trips
        .into_iter()
        .filter(|trip| config.sanity.accepts(&trip.record))
        .collect();
    let dropped_by_sanity = total - clean.len();

    let after_sanity = clean.len();
    let (kept, iqr) = filter_by_iqr(clean, LabeledTrip::log_duration, source, &config.outlier);
    let iqr = iqr.ok_or(TrainerError::EmptyDataset { stage })?;
    if kept.is_empty() {
        return Err(TrainerError::EmptyDataset { stage });
    }
    let dropped_by_iqr = after_sanity - kept.len();

    let mut rows = Vec::with_capacity(kept.len());
    let mut targets = Vec::with_capacity(kept.len());
    for trip in &kept {
        rows.push(engineer.feature_row(&trip.record, config.schema)?);
        targets.push(trip.log_duration());
    }

    info!(
        "Prepared {} {} rows ({} dropped by sanity bounds, {} by IQR, iqr={:.4})",
        rows.len(),
        stage,
        dropped_by_sanity,
        dropped_by_iqr,
        iqr.iqr
    );

    Ok(PreparedData {
        rows,
        targets,
        iqr,
        dropped_by_sanity,
        dropped_by_iqr,
    })
}
