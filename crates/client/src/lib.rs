//! Trip Duration Client
//!
//! Thin async wrapper over the service's HTTP endpoints.

pub mod batch;
pub mod error;

pub use batch::{load_batch, parse_batch};
pub use error::{ClientError, Result};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use trip_types::TripInput;

/// Used when neither an explicit URL nor `API_URL` is given
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the service URL
pub const API_URL_ENV: &str = "API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub trip_duration: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub predictions: Vec<u64>,
    pub count: usize,
}

/// Pick the base URL: explicit argument, then environment, then default.
/// Trailing slashes are dropped.
pub fn resolve_base_url(explicit: Option<&str>, env: Option<&str>) -> String {
    let url = [explicit, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|u| !u.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    url.trim_end_matches('/').to_string()
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Base URL from the argument or `API_URL`
    pub fn from_env(explicit: Option<&str>) -> Self {
        let env = std::env::var(API_URL_ENV).ok();
        Self {
            base_url: resolve_base_url(explicit, env.as_deref()),
            ..Self::default()
        }
    }
}

pub struct TripClient {
    client: reqwest::Client,
    base_url: String,
}

impl TripClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: resolve_base_url(Some(&config.base_url), None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn predict(&self, trip: &TripInput) -> Result<PredictResponse> {
        self.post("/predict", trip).await
    }

    pub async fn predict_batch(&self, trips: &[TripInput]) -> Result<BatchPredictResponse> {
        self.post("/predict/batch", &trips).await
    }

    /// Either `{"success": ...}` or `{"errors": {...}}`
    pub async fn validate(&self, trip: &TripInput) -> Result<Value> {
        self.post("/validate", trip).await
    }

    pub async fn features(&self) -> Result<Value> {
        self.get("/features").await
    }

    pub async fn sample_features(&self) -> Result<TripInput> {
        #[derive(Deserialize)]
        struct Sample {
            sample: TripInput,
        }
        let body: Sample = self.get("/features/sample").await?;
        Ok(body.sample)
    }

    /// Plain-text project description
    pub async fn about(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct About {
            about: String,
        }
        let body: About = self.get("/about").await?;
        Ok(body.about)
    }

    pub async fn version(&self) -> Result<Value> {
        self.get("/version").await
    }

    pub async fn help(&self) -> Result<Value> {
        self.get("/help").await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get("/health").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
