//! REST client for the EachLabs prediction API.
//!
//! Wraps the two endpoints the platform uses (create prediction and fetch
//! prediction) behind [`EachLabsClient`], with a bounded request timeout
//! and a three-way error taxonomy the orchestrator maps onto record
//! failures.

use std::time::Duration;

use serde_json::{json, Value};

use crate::inputs::build_input;
use crate::normalize::{normalize_status, normalize_submission, ProviderStatusResult, ProviderSubmission};

/// Default bound on any provider call.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default prediction API base URL.
pub const DEFAULT_API_URL: &str = "https://api.eachlabs.ai/v1/prediction";

/// Connection settings for the prediction API.
#[derive(Debug, Clone)]
pub struct EachLabsConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl EachLabsConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Errors from the provider gateway.
///
/// All three collapse to a failed generation record (plus a refund when a
/// debit already happened) on the creation path.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network failure or timeout before a response arrived.
    #[error("Failed to reach provider: {0}")]
    Unreachable(String),

    /// The response body was not parsable JSON.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider answered with a non-2xx status.
    #[error("Provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// HTTP client for the EachLabs prediction API.
pub struct EachLabsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EachLabsClient {
    /// Create a client with the configured timeout baked into every
    /// request. Panics only on reqwest builder failure, which is a startup
    /// misconfiguration.
    pub fn new(config: EachLabsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build provider HTTP client");
        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    /// Submit a prediction request.
    ///
    /// `provider_model_id` must already be the provider's identifier (the
    /// catalog mapping happens in core). Returns the normalized submission
    /// on any 2xx response.
    pub async fn submit(
        &self,
        provider_model_id: &str,
        prompt: &str,
        output_count: i32,
    ) -> Result<ProviderSubmission, ProviderError> {
        let body = json!({
            "model": provider_model_id,
            "version": "0.0.1",
            "input": build_input(provider_model_id, prompt, output_count),
        });

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .header("X-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        let raw = Self::parse_body(response).await?;
        let submission = normalize_submission(raw);
        tracing::debug!(
            model = provider_model_id,
            prediction_id = submission.prediction_id.as_deref().unwrap_or("<none>"),
            status = %submission.status,
            "Submitted prediction",
        );
        Ok(submission)
    }

    /// Poll the current status of a prediction.
    pub async fn fetch_status(
        &self,
        prediction_id: &str,
    ) -> Result<ProviderStatusResult, ProviderError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, prediction_id))
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        let raw = Self::parse_body(response).await?;
        Ok(normalize_status(raw))
    }

    // ---- private helpers ----

    /// Read and parse a response body.
    ///
    /// The body is parsed before the status check so a non-2xx response can
    /// surface the provider's own `message` field; an unparsable body is an
    /// [`ProviderError::InvalidResponse`] regardless of status.
    async fn parse_body(response: reqwest::Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        let raw: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = raw
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Failed to create prediction")
                .to_string();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(raw)
    }
}
