pub mod prompts;
#[cfg(test)]
pub(crate) mod testing;
pub mod tryon_client;

use crate::{
    config::GeminiConfig,
    error::{Result, TryOnError},
    models::{GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use tryon_client::{extract_image, BodyAdjustment, ImageInput, TryOnClient};

/// One request/response round trip against an image model.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

#[async_trait]
impl<T: ContentGenerator + ?Sized> ContentGenerator for Arc<T> {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        (**self).generate_content(request).await
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Builds the HTTP client. A missing API key does not fail here; each
    /// call reports it instead.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TryOnError::ConfigError(e.to_string()))?;

        if !config.has_credentials() {
            log::warn!("⚠️  No API key configured, every generation call will fail");
        }

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TryOnError::InitializationError(
                "API_KEY environment variable is not set; the image service is unavailable"
                    .into(),
            )
        })?;

        let model = if request.model.is_empty() {
            self.config.model.as_str()
        } else {
            request.model.as_str()
        };
        let url = self.endpoint(model);

        log::info!("Invoking model: {}", model);
        log::debug!(
            "Request carries {} part(s)",
            request.parts().count()
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Generation request failed: {}", e);
                TryOnError::RequestError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("Model returned HTTP {}", status);
            return Err(TryOnError::ApiError { status, body });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TryOnError::ResponseError(e.to_string()))
    }
}
