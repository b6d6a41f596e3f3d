//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationReport;
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid trip: {0}")]
    Validation(#[from] ValidationReport),

    #[error("Invalid trip at index {index}: {report}")]
    BatchValidation {
        index: usize,
        report: ValidationReport,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(report) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": true,
                    "message": self.to_string(),
                    "errors": report.field_messages(),
                }),
            ),
            ApiError::BatchValidation { index, report } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": true,
                    "message": self.to_string(),
                    "index": index,
                    "errors": report.field_messages(),
                }),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": true, "message": msg }),
            ),
            ApiError::Inference(e) => {
                tracing::error!(detail = %e, "Prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": true,
                        "message": "Prediction failed. Check server logs for details.",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
