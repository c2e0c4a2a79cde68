/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use tarjome::app_config::{Config, LogLevel, ProviderKind};
use tarjome::errors::ProviderErrorKind;
use crate::common;

/// A missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.provider, ProviderKind::Free);
    assert_eq!(config.free_tier.model, "arvan/DeepSeek-VL-7B-v1.5-fa");
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

/// Values in an existing file win over defaults
#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"provider": "paid", "paid": {"model": "gpt-4o-mini", "api_key": "sk-test"}, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.provider, ProviderKind::Paid);
    assert_eq!(config.paid.model, "gpt-4o-mini");
    assert_eq!(config.paid.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// A broken file is reported, not replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");
    Ok(())
}

/// The paid backend cannot run without a key
#[test]
fn test_validate_withPaidProviderAndNoKey_shouldReportMissingCredential() {
    let mut config = common::test_config();
    config.provider = ProviderKind::Paid;

    let error = config.validate().unwrap_err();

    assert_eq!(error.kind(), ProviderErrorKind::MissingCredential);
    assert!(error.to_string().contains("OPENAI_API_KEY"));
}

/// Defaults match the hosted services
#[test]
fn test_defaults_shouldMatchHostedServices() {
    let config = Config::default();
    assert_eq!(config.free_tier.max_new_tokens, 3000);
    assert_eq!(config.free_tier.post_call_delay_ms, 2000);
    assert_eq!(config.free_tier.timeout_secs, None);
    assert_eq!(config.paid.model, "gpt-3.5-turbo");
    assert_eq!(config.render.font_size, 12.0);
    assert_eq!(config.render.margin_mm, 10.0);
}
