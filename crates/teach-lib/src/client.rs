//! HTTP client for the classification service

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::ServiceError;
use crate::models::{
    BoxInfo, Example, Model, ModelList, ModelStats, PredictRequest, PredictResponse,
};

const MODELS_PATH: &str = "classificationbox";

/// Configuration for the service client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Every response body is wrapped in `{"success": .., "error": ..}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: T,
}

fn default_success() -> bool {
    true
}

/// Body of calls that only acknowledge
#[derive(Debug, Deserialize)]
struct Ack {}

/// Client for the classification service API
pub struct ClassificationClient {
    client: Client,
    base_url: Url,
}

impl ClassificationClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Create a client with the default timeout
    pub fn with_base_url(base_url: &str) -> Result<Self, ServiceError> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Service name, version and status
    pub async fn info(&self) -> Result<BoxInfo, ServiceError> {
        let url = self.endpoint(&["info"])?;
        self.get(url).await
    }

    pub async fn list_models(&self) -> Result<Vec<Model>, ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models"])?;
        let list: ModelList = self.get(url).await?;
        Ok(list.models)
    }

    /// Create a model; the returned model carries the id the service settled on
    pub async fn create_model(&self, model: &Model) -> Result<Model, ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models"])?;
        self.post(url, model).await
    }

    pub async fn get_model(&self, model_id: &str) -> Result<Model, ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models", model_id])?;
        self.get(url).await
    }

    pub async fn delete_model(&self, model_id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models", model_id])?;
        debug!(url = %url, "DELETE");
        let response = self.client.delete(url).send().await?;
        let _: Ack = Self::decode(response).await?;
        Ok(())
    }

    /// Submit one labeled example; exactly one request, no retry
    pub async fn teach(&self, model_id: &str, example: &Example) -> Result<(), ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models", model_id, "teach"])?;
        let _: Ack = self.post(url, example).await?;
        Ok(())
    }

    pub async fn predict(
        &self,
        model_id: &str,
        request: &PredictRequest,
    ) -> Result<PredictResponse, ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models", model_id, "predict"])?;
        self.post(url, request).await
    }

    pub async fn model_stats(&self, model_id: &str) -> Result<ModelStats, ServiceError> {
        let url = self.endpoint(&[MODELS_PATH, "models", model_id, "stats"])?;
        self.get(url).await
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(url = %url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<Ack>>(&raw)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(raw);
            let message = if message.trim().is_empty() {
                status.canonical_reason().unwrap_or("no details").to_string()
            } else {
                message
            };
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
        let envelope: Envelope<T> = serde_json::from_str(body)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        Ok(envelope.body)
    }
}
