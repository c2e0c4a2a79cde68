/*!
 * Provider API integration tests.
 *
 * Most tests talk to a one-shot local HTTP server. Tests against the live
 * services are ignored by default and skip themselves when the credential
 * is not in the environment.
 */

use std::time::{Duration, Instant};
use tarjome::app_config::{Config, ProviderKind};
use tarjome::document::TranslationRequest;
use tarjome::errors::ProviderErrorKind;
use tarjome::errors::ProviderError;
use tarjome::providers::huggingface::HuggingFace;
use tarjome::providers::openai::OpenAI;
use tarjome::providers::{TranslationProviderImpl, Translator};
use crate::common;

const FREE_TIER_DELAY: Duration = Duration::from_millis(150);

fn free_tier_client(base_url: &str) -> HuggingFace {
    HuggingFace::new(base_url, "org/model", "hf_test")
        .post_call_delay(FREE_TIER_DELAY)
        .timeout(Some(5))
}

fn paid_client(base_url: &str) -> OpenAI {
    OpenAI::new(base_url, "gpt-3.5-turbo", "sk-test").timeout(Some(5))
}

/// Send one request to a stub answering `status` with `body`
async fn free_tier_call(status: u16, body: &str) -> (Result<String, ProviderError>, Duration, String) {
    let (base_url, server) = common::serve_once(status, body).await.unwrap();
    let client = free_tier_client(&base_url);

    let started = Instant::now();
    let result = client.translate(&TranslationRequest::new("Hello")).await;
    let elapsed = started.elapsed();

    (result, elapsed, server.await.unwrap())
}

async fn paid_call(status: u16, body: &str) -> (Result<String, ProviderError>, String) {
    let (base_url, server) = common::serve_once(status, body).await.unwrap();
    let result = paid_client(&base_url).translate(&TranslationRequest::new("Hello")).await;
    (result, server.await.unwrap())
}

#[tokio::test]
async fn test_freeTier_withUnauthorized_shouldRejectAuthenticationAfterDelay() {
    let (result, elapsed, request) = free_tier_call(401, r#"{"error": "bad token"}"#).await;

    assert_eq!(result.unwrap_err(), ProviderError::AuthenticationRejected("HTTP 401: bad token".into()));
    assert!(elapsed >= FREE_TIER_DELAY);
    assert!(request.starts_with("POST /org/model HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer hf_test"));
}

#[tokio::test]
async fn test_freeTier_withTooManyRequests_shouldBeRateLimitedAfterDelay() {
    let (result, elapsed, _) = free_tier_call(429, r#"{"error": "Rate limit reached"}"#).await;

    assert_eq!(result.unwrap_err().kind(), ProviderErrorKind::RateLimited);
    assert!(elapsed >= FREE_TIER_DELAY);
}

#[tokio::test]
async fn test_freeTier_withModelLoading_shouldBeUnrecognizedAfterDelay() {
    let (result, elapsed, _) =
        free_tier_call(503, r#"{"error": "Model is loading", "estimated_time": 20.0}"#).await;

    assert_eq!(result.unwrap_err(), ProviderError::Unrecognized("HTTP 503: Model is loading".into()));
    assert!(elapsed >= FREE_TIER_DELAY);
}

#[tokio::test]
async fn test_freeTier_withGeneratedText_shouldReturnItAfterDelay() {
    let (result, elapsed, request) = free_tier_call(200, r#"[{"generated_text": "سلام"}]"#).await;

    assert_eq!(result.unwrap(), "سلام");
    assert!(elapsed >= FREE_TIER_DELAY);

    let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert!(json["inputs"].as_str().unwrap().ends_with("Hello"));
    assert_eq!(json["parameters"]["return_full_text"], false);
}

#[tokio::test]
async fn test_paid_withUnauthorized_shouldRejectAuthentication() {
    let (result, request) = paid_call(
        401,
        r#"{"error": {"message": "Incorrect API key", "type": "invalid_request_error"}}"#,
    )
    .await;

    assert_eq!(result.unwrap_err(), ProviderError::AuthenticationRejected("HTTP 401: Incorrect API key".into()));
    assert!(request.starts_with("POST /chat/completions HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
}

#[tokio::test]
async fn test_paid_withTooManyRequests_shouldBeRateLimited() {
    let (result, _) = paid_call(429, r#"{"error": {"message": "Rate limit reached"}}"#).await;

    assert_eq!(result.unwrap_err().kind(), ProviderErrorKind::RateLimited);
}

#[tokio::test]
async fn test_paid_withServiceUnavailable_shouldBeUnrecognized() {
    let (result, _) = paid_call(503, r#"{"error": {"message": "The server is overloaded"}}"#).await;

    assert_eq!(result.unwrap_err(), ProviderError::Unrecognized("HTTP 503: The server is overloaded".into()));
}

#[tokio::test]
async fn test_paid_withCompletion_shouldReturnFirstChoice() {
    let (result, _) = paid_call(
        200,
        r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "درود"}}]}"#,
    )
    .await;

    assert_eq!(result.unwrap(), "درود");
}

/// A body that is not JSON keeps the raw text
#[tokio::test]
async fn test_paid_withPlainTextError_shouldKeepBody() {
    let (result, _) = paid_call(500, "upstream exploded").await;

    assert_eq!(result.unwrap_err(), ProviderError::Unrecognized("HTTP 500: upstream exploded".into()));
}

/// Transport failures are unrecognized and still wait out the delay
#[tokio::test]
async fn test_freeTier_withUnreachableEndpoint_shouldFailAfterDelay() {
    let client = HuggingFace::new("http://127.0.0.1:9", "some/model", "")
        .post_call_delay(Duration::from_millis(200))
        .timeout(Some(5));

    let started = Instant::now();
    let error = client.translate(&TranslationRequest::new("Hello")).await.unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(matches!(error.kind(), ProviderErrorKind::Unrecognized | ProviderErrorKind::Timeout));
}

/// Configuration picks the backend variant
#[test]
fn test_fromConfig_shouldBuildSelectedBackend() {
    let mut config = Config::default();
    assert_eq!(TranslationProviderImpl::from_config(&config).name(), "huggingface");

    config.provider = ProviderKind::Paid;
    assert_eq!(TranslationProviderImpl::from_config(&config).name(), "openai");
}

#[tokio::test]
#[ignore]
async fn test_freeTier_live_shouldReturnText() {
    let token = std::env::var("HUGGINGFACE_TOKEN").unwrap_or_default();
    if token.is_empty() {
        return;
    }

    let config = Config::default();
    let client = HuggingFace::new(&config.free_tier.endpoint, &config.free_tier.model, token);
    let translated = client.translate(&TranslationRequest::new("Good morning")).await.unwrap();
    assert!(!translated.is_empty());
    println!("Hugging Face translation: {}", translated);
}
