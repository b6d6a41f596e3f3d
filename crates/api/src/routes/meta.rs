//! Descriptive Routes
//!
//! Input field catalogue, sample request, model schema, version and help.

use axum::{extract::State, Json};
use feature_engine::ColumnRole;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use trip_types::TripInput;

use crate::AppState;

const FEATURE_DESCRIPTIONS: [(&str, &str); 9] = [
    ("store_and_fwd_flag", "Whether the trip record was stored and forwarded ('Y' or 'N')"),
    ("vendor_id", "ID of the vendor (1 or 2)"),
    ("passenger_count", "Number of passengers (1 to 6)"),
    ("pickup_longitude", "Longitude where the trip started (-75 to -73)"),
    ("pickup_latitude", "Latitude where the trip started (40 to 43)"),
    ("dropoff_longitude", "Longitude where the trip ended (-75 to -73)"),
    ("dropoff_latitude", "Latitude where the trip ended (40 to 43)"),
    ("pickup_date", "Date of the pickup in 'YYYY-MM-DD' format"),
    ("pickup_time", "Time of the pickup in 'HH:MM' 24-hour format"),
];

const ABOUT: &str = "\
This API predicts the duration (in seconds) of NYC taxi trips using a Ridge Regression model.
It focuses on feature engineering to improve prediction quality.
The model predicts log-transformed trip duration (`log_trip_duration`),
which is later exponentiated to return the actual trip time in seconds.
Predictions are based on trip metadata such as:
- Vendor ID
- Pickup/Dropoff coordinates
- Passenger count
- Pickup date and time

The features used can be viewed at the `/features` endpoint,
and a valid sample input is available at `/features/sample`.
The output is a single integer representing the estimated trip duration in seconds.";

/// (method, path, description)
pub const ENDPOINTS: [(&str, &str, &str); 11] = [
    ("POST", "/predict", "Predicts trip duration based on user-provided trip features."),
    ("POST", "/predict/batch", "Predicts trip durations for a JSON array of trips."),
    ("POST", "/validate", "Validates a user input JSON against the expected input schema."),
    ("GET", "/features", "Returns a dictionary of required input features for prediction."),
    ("GET", "/features/sample", "Returns a sample input dictionary for guidance."),
    ("GET", "/features/schema", "Returns the engineered model columns and how each is encoded."),
    ("GET", "/about", "Provides general information about the model and its purpose."),
    ("GET", "/version", "Returns version details of the model, API, and performance metrics."),
    ("GET", "/help", "Returns a list of all available API endpoints with descriptions."),
    ("GET", "/health", "Returns service status and uptime."),
    ("GET", "/metrics", "Prometheus metrics in text exposition format."),
];

pub async fn features() -> Json<Value> {
    let features: BTreeMap<&str, &str> = FEATURE_DESCRIPTIONS.into_iter().collect();
    Json(json!({ "features": features }))
}

pub async fn sample() -> Json<Value> {
    Json(json!({ "sample": TripInput::sample() }))
}

pub async fn about() -> Json<Value> {
    Json(json!({ "about": ABOUT }))
}

#[derive(Debug, Serialize)]
pub struct SchemaColumn {
    pub name: &'static str,
    pub role: ColumnRole,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub schema: &'static str,
    pub version: u32,
    pub columns: Vec<SchemaColumn>,
    /// Model inputs after one-hot expansion
    pub model_inputs: usize,
}

/// Columns of the loaded model's feature schema
pub async fn schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let artifact = state.engine.artifact();
    let schema = artifact.schema();
    Json(SchemaResponse {
        schema: schema.name(),
        version: schema.version(),
        columns: schema
            .columns()
            .iter()
            .map(|c| SchemaColumn {
                name: c.name(),
                role: schema.role(*c),
            })
            .collect(),
        model_inputs: artifact.pipeline().output_width(),
    })
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub model_type: &'static str,
    pub alpha: f64,
    pub feature_schema: &'static str,
    pub schema_version: u32,
    pub model_path: Option<String>,
    pub train_rmse: f64,
    pub train_r2: f64,
    pub val_rmse: Option<f64>,
    pub val_r2: Option<f64>,
    pub trained_at: String,
    pub target_variable: &'static str,
    pub api_version: String,
}

/// Model and training details read from the loaded artifact
pub async fn version(State(state): State<Arc<AppState>>) -> Json<VersionResponse> {
    let artifact = state.engine.artifact();
    let metadata = artifact.metadata();
    let schema = artifact.schema();
    Json(VersionResponse {
        model_type: "Ridge Regression",
        alpha: metadata.alpha,
        feature_schema: schema.name(),
        schema_version: schema.version(),
        model_path: state
            .engine
            .model_path()
            .map(|p| p.display().to_string()),
        train_rmse: metadata.train_scores.rmse,
        train_r2: metadata.train_scores.r2,
        val_rmse: metadata.validation_scores.map(|s| s.rmse),
        val_r2: metadata.validation_scores.map(|s| s.r2),
        trained_at: metadata.trained_at.clone(),
        target_variable: "log_trip_duration (converted back to seconds)",
        api_version: state.version.clone(),
    })
}

pub async fn help() -> Json<Value> {
    let endpoints: Vec<Value> = ENDPOINTS
        .iter()
        .map(|(method, endpoint, description)| {
            json!({ "method": method, "endpoint": endpoint, "description": description })
        })
        .collect();
    Json(json!({ "endpoints": endpoints }))
}
