use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::document::TranslationRequest;
use crate::errors::ProviderError;

use super::{Translator, build_http_client};

/// System instruction sent ahead of the source text
pub const SYSTEM_PROMPT: &str = "متن را به فارسی روان و دقیق ترجمه کن.";

/// OpenAI client for the chat completions API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Model name
    model: String,
    /// API key for authentication
    api_key: String,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    pub model: String,
    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ChatCompletionRequest {
    /// Create a new request for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Build the translation request: fixed system instruction, then the source text
    pub fn translation(model: impl Into<String>, text: &str) -> Self {
        Self::new(model)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", text)
    }
}

impl ChatCompletionResponse {
    /// Text of the first completion
    pub fn first_text(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(None),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Set a client-side timeout
    pub fn timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.client = build_http_client(timeout_secs);
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Complete a chat request
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::MissingCredential("OpenAI API key is not set".to_string()));
        }

        let response = self.client.post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            error!("OpenAI API error ({}): {}", status, message);
            return Err(ProviderError::from_status(status.as_u16(), message));
        }

        response.json::<ChatCompletionResponse>().await
            .map_err(|e| ProviderError::Unrecognized(format!("Failed to parse OpenAI response: {}", e)))
    }
}

#[async_trait]
impl Translator for OpenAI {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest::translation(&self.model, &request.text);
        debug!("Sending {} chars to {}", request.text.chars().count(), self.model);

        let response = self.complete(&body).await?;
        response.first_text()
            .ok_or_else(|| ProviderError::Unrecognized("Response contained no choices".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
