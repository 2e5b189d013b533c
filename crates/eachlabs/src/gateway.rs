//! The provider seam the orchestrator depends on.
//!
//! A trait rather than the concrete client so orchestrator tests can run
//! against a scripted provider without network access.

use async_trait::async_trait;

use crate::client::{EachLabsClient, ProviderError};
use crate::normalize::{ProviderStatusResult, ProviderSubmission};

/// Submit-and-poll interface over the image generation provider.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Submit a prediction for `provider_model_id` with the given prompt.
    async fn submit(
        &self,
        provider_model_id: &str,
        prompt: &str,
        output_count: i32,
    ) -> Result<ProviderSubmission, ProviderError>;

    /// Fetch the current status of a previously submitted prediction.
    async fn fetch_status(
        &self,
        prediction_id: &str,
    ) -> Result<ProviderStatusResult, ProviderError>;
}

#[async_trait]
impl ImageProvider for EachLabsClient {
    async fn submit(
        &self,
        provider_model_id: &str,
        prompt: &str,
        output_count: i32,
    ) -> Result<ProviderSubmission, ProviderError> {
        EachLabsClient::submit(self, provider_model_id, prompt, output_count).await
    }

    async fn fetch_status(
        &self,
        prediction_id: &str,
    ) -> Result<ProviderStatusResult, ProviderError> {
        EachLabsClient::fetch_status(self, prediction_id).await
    }
}
