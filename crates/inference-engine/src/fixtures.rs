//! Shared test fixtures: synthetic trips and a model fitted on them

use crate::artifact::{ModelArtifact, TrainingMetadata};
use crate::pipeline::{RegressionPipeline, DEFAULT_ALPHA};
use crate::scoring::RegressionScores;
use chrono::{Duration, NaiveDate};
use feature_engine::{FeatureEngineer, FeatureRow, FeatureSchema};
use trip_types::{StoreAndFwdFlag, TripRecord, VendorId};

pub fn synthetic_trips(n: usize) -> Vec<TripRecord> {
    let start = NaiveDate::from_ymd_opt(2016, 1, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let spread = (i % 37) as f64 / 37.0;
            TripRecord {
                vendor_id: if i % 3 == 0 { VendorId::One } else { VendorId::Two },
                passenger_count: (i % 6) as u8 + 1,
                pickup_longitude: -74.01 + 0.05 * spread,
                pickup_latitude: 40.70 + 0.08 * spread,
                dropoff_longitude: -73.96 - 0.04 * ((i % 11) as f64 / 11.0),
                dropoff_latitude: 40.76 + 0.03 * ((i % 7) as f64 / 7.0),
                pickup_datetime: start + Duration::minutes(i as i64 * 97),
                store_and_fwd_flag: if i % 40 == 0 { StoreAndFwdFlag::Yes } else { StoreAndFwdFlag::No },
            }
        })
        .collect()
}

/// Log-duration that grows with distance and slows in rush hour
pub fn log_target(engineer: &FeatureEngineer, trip: &TripRecord) -> f64 {
    let features = engineer.engineer(trip);
    let seconds = 120.0 + 180.0 * features.distance.distance
        + if features.flags.is_rush_hour { 240.0 } else { 0.0 };
    f64::ln_1p(seconds)
}

pub fn feature_rows(n: usize) -> Vec<FeatureRow> {
    let engineer = FeatureEngineer::default();
    engineer
        .feature_rows(&synthetic_trips(n), FeatureSchema::Inference)
        .unwrap()
}

pub fn fitted_artifact() -> ModelArtifact {
    let engineer = FeatureEngineer::default();
    let trips = synthetic_trips(400);
    let rows = engineer
        .feature_rows(&trips, FeatureSchema::Inference)
        .unwrap();
    let targets: Vec<f64> = trips.iter().map(|t| log_target(&engineer, t)).collect();

    let pipeline = RegressionPipeline::fit(&rows, &targets, DEFAULT_ALPHA).unwrap();
    let predicted = pipeline.predict_batch(&rows).unwrap();
    let metadata = TrainingMetadata {
        alpha: DEFAULT_ALPHA,
        iqr_multiplier: 1.5,
        train_rows: rows.len() as u64,
        validation_rows: 0,
        train_scores: RegressionScores::compute(&targets, &predicted),
        validation_scores: None,
        trained_at: "2016-07-01T00:00:00Z".to_string(),
    };
    ModelArtifact::new(pipeline, 0.6, metadata).unwrap()
}
