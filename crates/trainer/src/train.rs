//! Model Fitting and Evaluation

use crate::dataset::LabeledTrip;
use crate::preprocess::{prepare, PreprocessConfig};
use crate::TrainerError;
use feature_engine::{FeatureEngineer, IqrSource, OutlierConfig};
use inference_engine::{
    ModelArtifact, RegressionPipeline, RegressionScores, TrainingMetadata, DEFAULT_ALPHA,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Ridge regularisation strength
    pub alpha: f64,
    pub preprocess: PreprocessConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// Scores and sizes of one training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train: RegressionScores,
    pub validation: Option<RegressionScores>,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub train_iqr: f64,
}

/// Scores of a saved model on held-out data
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub scores: RegressionScores,
    pub rows: usize,
}

fn log_scores(name: &str, scores: &RegressionScores) {
    info!("{} RMSE = {:.4} - R2 = {:.4}", name, scores.rmse, scores.r2);
}

/// Fit a pipeline on `train_trips` and score it.
///
/// The validation set is filtered with the training IQR span.
pub fn train(
    train_trips: Vec<LabeledTrip>,
    validation_trips: Option<Vec<LabeledTrip>>,
    config: &TrainConfig,
    engineer: &FeatureEngineer,
) -> Result<(ModelArtifact, TrainingReport), TrainerError> {
    let train_data = prepare(
        train_trips,
        IqrSource::Compute,
        &config.preprocess,
        engineer,
        "train",
    )?;
    let train_iqr = train_data.iqr.iqr;

    info!(
        "Fitting ridge (alpha={}) on {} rows, schema {}",
        config.alpha,
        train_data.len(),
        config.preprocess.schema
    );
    let pipeline = RegressionPipeline::fit(&train_data.rows, &train_data.targets, config.alpha)?;

    let train_predictions = pipeline.predict_batch(&train_data.rows)?;
    let train_scores = RegressionScores::compute(&train_data.targets, &train_predictions);
    log_scores("train", &train_scores);

    let (validation_scores, validation_rows) = match validation_trips {
        Some(trips) => {
            let data = prepare(
                trips,
                IqrSource::Pinned(train_iqr),
                &config.preprocess,
                engineer,
                "validation",
            )?;
            let predictions = pipeline.predict_batch(&data.rows)?;
            let scores = RegressionScores::compute(&data.targets, &predictions);
            log_scores("validation", &scores);
            (Some(scores), data.len())
        }
        None => (None, 0),
    };

    let metadata = TrainingMetadata {
        alpha: config.alpha,
        iqr_multiplier: config.preprocess.outlier.multiplier,
        train_rows: train_data.len() as u64,
        validation_rows: validation_rows as u64,
        train_scores,
        validation_scores,
        trained_at: chrono::Utc::now().to_rfc3339(),
    };
    let artifact = ModelArtifact::new(pipeline, train_iqr, metadata)?;

    let report = TrainingReport {
        train: train_scores,
        validation: validation_scores,
        train_rows: train_data.len(),
        validation_rows,
        train_iqr,
    };
    Ok((artifact, report))
}

/// Score a saved artifact with its own schema, IQR span and multiplier
pub fn evaluate(
    artifact: &ModelArtifact,
    trips: Vec<LabeledTrip>,
    engineer: &FeatureEngineer,
) -> Result<Evaluation, TrainerError> {
    let config = PreprocessConfig {
        schema: artifact.schema(),
        outlier: OutlierConfig {
            multiplier: artifact.metadata().iqr_multiplier,
        },
        ..PreprocessConfig::default()
    };
    let data = prepare(
        trips,
        IqrSource::Pinned(artifact.train_iqr()),
        &config,
        engineer,
        "test",
    )?;

    let predictions = artifact.pipeline().predict_batch(&data.rows)?;
    let scores = RegressionScores::compute(&data.targets, &predictions);
    log_scores("TestSet", &scores);

    Ok(Evaluation {
        scores,
        rows: data.len(),
    })
}
