//! Router integration tests driven through `tower::ServiceExt::oneshot`

use api::{create_router, AppState, ENDPOINTS};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use feature_engine::{FeatureEngineer, FeatureSchema};
use inference_engine::{
    InferenceEngine, ModelArtifact, RegressionPipeline, RegressionScores, TrainingMetadata,
    DEFAULT_ALPHA,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use trip_types::{StoreAndFwdFlag, TripInput, TripRecord, VendorId};

fn synthetic_trips(n: usize) -> Vec<TripRecord> {
    let start = NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let a = (i % 29) as f64 / 29.0;
            let b = (i % 11) as f64 / 11.0;
            TripRecord {
                vendor_id: if i % 2 == 0 { VendorId::One } else { VendorId::Two },
                passenger_count: (i % 6) as u8 + 1,
                pickup_longitude: -74.00 + 0.05 * a,
                pickup_latitude: 40.72 + 0.05 * b,
                dropoff_longitude: -73.98 + 0.04 * b,
                dropoff_latitude: 40.75 + 0.03 * a,
                pickup_datetime: start + Duration::minutes(i as i64 * 431),
                store_and_fwd_flag: StoreAndFwdFlag::No,
            }
        })
        .collect()
}

fn test_state() -> AppState {
    let engineer = FeatureEngineer::default();
    let trips = synthetic_trips(300);
    let rows = engineer
        .feature_rows(&trips, FeatureSchema::Inference)
        .unwrap();
    let targets: Vec<f64> = trips
        .iter()
        .map(|t| (150.0 + 160.0 * engineer.engineer(t).distance.distance).ln_1p())
        .collect();

    let pipeline = RegressionPipeline::fit(&rows, &targets, DEFAULT_ALPHA).unwrap();
    let predicted = pipeline.predict_batch(&rows).unwrap();
    let metadata = TrainingMetadata {
        alpha: DEFAULT_ALPHA,
        iqr_multiplier: 1.5,
        train_rows: rows.len() as u64,
        validation_rows: 0,
        train_scores: RegressionScores::compute(&targets, &predicted),
        validation_scores: None,
        trained_at: "2016-07-01T00:00:00+00:00".to_string(),
    };
    let artifact = ModelArtifact::new(pipeline, 0.5, metadata).unwrap();
    AppState::new(InferenceEngine::new(artifact, engineer))
}

fn app() -> Router {
    create_router(Arc::new(test_state()))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn sample_json() -> Value {
    serde_json::to_value(TripInput::sample()).unwrap()
}

#[tokio::test]
async fn test_predict_sample() {
    let (status, body) = send(app(), Method::POST, "/predict", Some(sample_json())).await;
    assert_eq!(status, StatusCode::OK);
    let duration = body["trip_duration"].as_u64().expect("integer duration");
    assert!(duration > 0);
}

#[tokio::test]
async fn test_predict_is_repeatable() {
    let app = app();
    let (_, first) = send(app.clone(), Method::POST, "/predict", Some(sample_json())).await;
    for _ in 0..3 {
        let (_, again) = send(app.clone(), Method::POST, "/predict", Some(sample_json())).await;
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn test_predict_rejects_invalid_trip() {
    let mut input = sample_json();
    input["vendor_id"] = json!(3);
    input["pickup_latitude"] = json!(40.0);

    let (status, body) = send(app(), Method::POST, "/predict", Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));
    assert_eq!(body["errors"]["vendor_id"], json!("Vendor ID must be either 1 or 2."));
    assert!(body["errors"]["pickup_latitude"].is_string());
    assert!(body["errors"].get("dropoff_latitude").is_none());
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"vendor_id\": 1,"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());

    let (status, _) = send(app(), Method::POST, "/predict", Some(json!({ "vendor_id": "one" }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_validate_reports_every_field() {
    let (status, body) = send(app(), Method::POST, "/validate", Some(sample_json())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": "Input is valid and ready for prediction." }));

    let input = json!({
        "vendor_id": 0,
        "passenger_count": 9,
        "pickup_longitude": -80.0,
        "pickup_latitude": 40.7,
        "dropoff_longitude": -73.9,
        "dropoff_latitude": 44.0,
        "pickup_date": "23-03-2016",
        "pickup_time": "25:00",
        "store_and_fwd_flag": "x"
    });
    let (status, body) = send(app(), Method::POST, "/validate", Some(input)).await;
    assert_eq!(status, StatusCode::OK);
    let errors = body["errors"].as_object().expect("error map");
    let mut fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec![
            "dropoff_latitude",
            "passenger_count",
            "pickup_date",
            "pickup_longitude",
            "pickup_time",
            "store_and_fwd_flag",
            "vendor_id",
        ]
    );
    assert_eq!(
        errors["pickup_longitude"],
        json!("Pickup longitude must be within the expected range for NYC: between -75 and -73.")
    );
    assert_eq!(
        errors["pickup_time"],
        json!("Pickup time must follow the format HH:MM (24-hour clock).")
    );
}

#[tokio::test]
async fn test_validate_normalises_flag() {
    let mut input = sample_json();
    input["store_and_fwd_flag"] = json!(" y ");
    let (_, body) = send(app(), Method::POST, "/validate", Some(input)).await;
    assert!(body.get("success").is_some());
}

#[tokio::test]
async fn test_batch_predictions() {
    let app = app();
    let mut second = sample_json();
    second["passenger_count"] = json!(4);
    second["pickup_time"] = json!("17:45");

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/predict/batch",
        Some(json!([sample_json(), second])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);

    let (_, single) = send(app, Method::POST, "/predict", Some(sample_json())).await;
    assert_eq!(predictions[0], single["trip_duration"]);
}

#[tokio::test]
async fn test_batch_rejects_empty_and_invalid() {
    let (status, body) = send(app(), Method::POST, "/predict/batch", Some(json!([]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!(true));

    let mut bad = sample_json();
    bad["pickup_date"] = json!("2016-02-30");
    let (status, body) = send(
        app(),
        Method::POST,
        "/predict/batch",
        Some(json!([sample_json(), bad])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["index"], json!(1));
    assert!(body["errors"]["pickup_date"].is_string());
}

#[tokio::test]
async fn test_features_and_sample() {
    let (status, body) = send(app(), Method::GET, "/features", None).await;
    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_object().unwrap();
    assert_eq!(features.len(), 9);
    assert!(features.contains_key("pickup_time"));

    let (_, body) = send(app(), Method::GET, "/features/sample", None).await;
    assert_eq!(body["sample"], sample_json());
    assert_eq!(body["sample"]["pickup_date"], json!("2016-03-23"));
}

#[tokio::test]
async fn test_schema_endpoint() {
    let (status, body) = send(app(), Method::GET, "/features/schema", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schema"], json!("inference"));
    assert_eq!(body["version"], json!(2));
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), FeatureSchema::Inference.width());
    assert!(columns
        .iter()
        .any(|c| c["name"] == json!("hour") && c["role"] == json!("categorical")));
}

#[tokio::test]
async fn test_version_about_help() {
    let (_, body) = send(app(), Method::GET, "/version", None).await;
    assert_eq!(body["model_type"], json!("Ridge Regression"));
    assert_eq!(body["alpha"], json!(1.0));
    assert_eq!(body["schema_version"], json!(2));
    assert!(body["model_path"].is_null());
    assert!(body["val_rmse"].is_null());
    assert!(body["train_rmse"].as_f64().unwrap() >= 0.0);

    let (_, body) = send(app(), Method::GET, "/about", None).await;
    assert!(body["about"].as_str().unwrap().contains("Ridge Regression"));

    let (_, body) = send(app(), Method::GET, "/help", None).await;
    let endpoints = body["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), ENDPOINTS.len());
    assert!(endpoints
        .iter()
        .any(|e| e["endpoint"] == json!("/predict") && e["method"] == json!("POST")));
}

#[tokio::test]
async fn test_health_and_metrics_without_recorder() {
    let (status, body) = send(app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["feature_schema"], json!("inference"));

    let (status, _) = send(app(), Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
