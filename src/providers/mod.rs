/*!
 * Provider implementations for the translation backends.
 *
 * This module contains client implementations for:
 * - Hugging Face Inference: free-tier hosted text generation
 * - OpenAI: paid chat completions
 * - Mock: scripted behaviour for tests
 *
 * The backend is picked from configuration before the pipeline is built
 * (`TranslationProviderImpl::from_config`) and called through `Translator`.
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;
use std::time::Duration;

use reqwest::Client;

use crate::app_config::{Config, ProviderKind};
use crate::document::TranslationRequest;
use crate::errors::ProviderError;

pub mod huggingface;
pub mod mock;
pub mod openai;

use huggingface::HuggingFace;
use openai::OpenAI;

/// Common capability of all translation backends
///
/// Implementations turn source text into Persian text. They never retry;
/// the caller decides what to do with a failure.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate the request text
    ///
    /// # Arguments
    /// * `request` - Source text and target language
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or the classified failure
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Translation backend variants
#[derive(Debug)]
pub enum TranslationProviderImpl {
    /// Hugging Face hosted text generation
    Free(HuggingFace),

    /// OpenAI chat completions
    Paid(OpenAI),
}

impl TranslationProviderImpl {
    /// Build the backend selected in the configuration
    pub fn from_config(config: &Config) -> Self {
        match config.provider {
            ProviderKind::Free => {
                let free = &config.free_tier;
                Self::Free(
                    HuggingFace::new(&free.endpoint, &free.model, &free.api_key)
                        .max_new_tokens(free.max_new_tokens)
                        .post_call_delay(Duration::from_millis(free.post_call_delay_ms))
                        .timeout(free.timeout_secs),
                )
            }
            ProviderKind::Paid => {
                let paid = &config.paid;
                Self::Paid(OpenAI::new(&paid.endpoint, &paid.model, &paid.api_key).timeout(paid.timeout_secs))
            }
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Free(_) => ProviderKind::Free,
            Self::Paid(_) => ProviderKind::Paid,
        }
    }
}

#[async_trait]
impl Translator for TranslationProviderImpl {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        match self {
            Self::Free(client) => client.translate(request).await,
            Self::Paid(client) => client.translate(request).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Free(client) => client.name(),
            Self::Paid(client) => client.name(),
        }
    }
}

/// HTTP client with an optional overall timeout
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> Client {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build HTTP client with timeout {:?}: {}; requests will not time out", timeout_secs, e);
            Client::new()
        }
    }
}
