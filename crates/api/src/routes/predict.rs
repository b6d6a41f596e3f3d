//! Prediction and Validation Routes

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use trip_types::TripInput;

use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Estimated trip duration in seconds
    pub trip_duration: u64,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub predictions: Vec<u64>,
    pub count: usize,
}

fn record_outcome(start: Instant, trips: usize, ok: bool) {
    if ok {
        metrics::counter!("trip_predictions_total").increment(trips as u64);
        metrics::histogram!("trip_prediction_latency_seconds").record(start.elapsed().as_secs_f64());
    } else {
        metrics::counter!("trip_prediction_errors_total").increment(1);
    }
}

/// Predict the duration of a single trip
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TripInput>,
) -> Result<Json<PredictResponse>> {
    let start = Instant::now();
    let result = state
        .validator
        .validate(&input)
        .map_err(ApiError::from)
        .and_then(|trip| state.engine.predict(&trip).map_err(ApiError::from));
    record_outcome(start, 1, result.is_ok());

    let prediction = result?;
    debug!("Predicted trip duration {}s", prediction.trip_duration);
    Ok(Json(PredictResponse {
        trip_duration: prediction.trip_duration,
    }))
}

/// Predict many trips; any invalid trip rejects the whole batch
pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<TripInput>>,
) -> Result<Json<BatchPredictResponse>> {
    let start = Instant::now();
    if inputs.is_empty() {
        record_outcome(start, 0, false);
        return Err(ApiError::BadRequest(
            "Batch must contain at least one trip".to_string(),
        ));
    }

    let mut trips = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match state.validator.validate(input) {
            Ok(trip) => trips.push(trip),
            Err(report) => {
                record_outcome(start, 0, false);
                return Err(ApiError::BatchValidation { index, report });
            }
        }
    }

    let result = state.engine.predict_batch(&trips);
    record_outcome(start, trips.len(), result.is_ok());
    let result = result?;

    info!(
        "Predicted batch of {} trips in {:.2}ms",
        result.predictions.len(),
        result.latency_ms
    );
    let predictions: Vec<u64> = result.predictions.iter().map(|p| p.trip_duration).collect();
    Ok(Json(BatchPredictResponse {
        count: predictions.len(),
        predictions,
    }))
}

/// Check a trip without predicting; always 200
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TripInput>,
) -> Json<Value> {
    match state.validator.validate(&input) {
        Ok(_) => Json(json!({ "success": "Input is valid and ready for prediction." })),
        Err(report) => Json(json!({ "errors": report.field_messages() })),
    }
}
