//! Gemini provider

use super::config::GeminiConfig;
use super::failure;
use super::wire::{self, GenerateRequest, GenerateResponse};
use crate::chat::{ChatRequest, ChatResponse};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Provider for `config`; fails on an empty key
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::NotConfigured("Gemini API key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn generate(&self, model: &str, body: &GenerateRequest) -> Result<GenerateResponse> {
        debug!(model, "Calling Gemini generateContent");
        let transport = |e| failure::from_transport(e, self.config.timeout);

        let response = self
            .client
            .post(self.config.endpoint(model))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let error = failure::from_status(status.as_u16(), &text);
            warn!(status = status.as_u16(), error = %error, "Gemini request failed");
            return Err(error);
        }
        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model, tools = request.tools.len()))]
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = if request.model.is_empty() {
            self.config.default_model.as_str()
        } else {
            request.model.as_str()
        };
        let body = wire::encode(&request, self.config.default_max_tokens);
        let response = self.generate(model, &body).await?;
        wire::decode(response, model)
    }
}
