use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::document::TranslationRequest;
use crate::errors::ProviderError;

use super::{Translator, build_http_client};

/// Instruction wrapped around the source text
const PROMPT_TEMPLATE: &str = "شما یک مترجم حرفه‌ای هستید. متن زیر را به فارسی روان ترجمه کنید:\n{text}";

/// Hugging Face Inference client for hosted text-generation models
pub struct HuggingFace {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the inference API
    endpoint: String,
    /// Hosted model identifier
    model: String,
    /// Optional access token
    api_key: String,
    /// Cap on generated tokens
    max_new_tokens: u32,
    /// Fixed pause after every call
    post_call_delay: Duration,
}

impl std::fmt::Debug for HuggingFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFace")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("post_call_delay", &self.post_call_delay)
            .finish_non_exhaustive()
    }
}

/// Text-generation request
#[derive(Debug, Serialize)]
pub struct TextGenerationRequest {
    /// Full prompt
    pub inputs: String,
    /// Generation parameters
    pub parameters: GenerationParameters,
}

/// Generation parameters for the inference API
#[derive(Debug, Serialize)]
pub struct GenerationParameters {
    /// Maximum number of tokens to generate
    pub max_new_tokens: u32,
    /// Whether the prompt is echoed back before the generated text
    pub return_full_text: bool,
}

/// Single generation result
#[derive(Debug, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// Generation response; the API returns either a list or a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl TextGenerationResponse {
    /// Text of the first generation
    pub fn first_text(self) -> Option<String> {
        match self {
            Self::Batch(items) => items.into_iter().next().map(|g| g.generated_text),
            Self::Single(item) => Some(item.generated_text),
        }
    }
}

/// Error body returned by the inference API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl TextGenerationRequest {
    /// Create a request that wraps `text` in the translation instruction
    pub fn translation(text: &str, max_new_tokens: u32) -> Self {
        Self {
            inputs: build_prompt(text),
            parameters: GenerationParameters {
                max_new_tokens,
                return_full_text: false,
            },
        }
    }
}

/// Wrap source text in the fixed translation instruction
pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text)
}

impl HuggingFace {
    /// Create a new client for `model` hosted under `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(None),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            max_new_tokens: 3000,
            post_call_delay: Duration::from_secs(2),
        }
    }

    /// Set the generated-token cap
    pub fn max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Set the pause applied after every call
    pub fn post_call_delay(mut self, delay: Duration) -> Self {
        self.post_call_delay = delay;
        self
    }

    /// Set a client-side timeout
    pub fn timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.client = build_http_client(timeout_secs);
        self
    }

    pub fn post_call_delay_duration(&self) -> Duration {
        self.post_call_delay
    }

    pub fn max_new_tokens_limit(&self) -> u32 {
        self.max_new_tokens
    }

    fn model_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model)
    }

    /// Send a text-generation request
    pub async fn generate(&self, request: &TextGenerationRequest) -> Result<TextGenerationResponse, ProviderError> {
        let mut builder = self.client.post(self.model_url()).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error)
                .unwrap_or(error_text);
            error!("Hugging Face API error ({}): {}", status, message);
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        response.json::<TextGenerationResponse>().await
            .map_err(|e| ProviderError::Unrecognized(format!("Failed to parse Hugging Face response: {}", e)))
    }
}

#[async_trait]
impl Translator for HuggingFace {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let body = TextGenerationRequest::translation(&request.text, self.max_new_tokens);
        debug!("Sending {} chars to {}", request.text.chars().count(), self.model);

        let result = self.generate(&body).await.and_then(|response| {
            response.first_text()
                .ok_or_else(|| ProviderError::Unrecognized("Empty generation list".to_string()))
        });

        // Unconditional pause, success or failure
        tokio::time::sleep(self.post_call_delay).await;

        result
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
