use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::ProviderError;

/// Application configuration module
/// This module handles loading, validating and saving the configuration
/// handed to the translation pipeline.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Which translation backend to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Free-tier text-generation backend
    #[serde(default)]
    pub free_tier: FreeTierConfig,

    /// Paid chat-completion backend
    #[serde(default)]
    pub paid: PaidConfig,

    /// PDF output settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend selector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Hosted text-generation inference, no key required
    #[default]
    Free,
    // @provider: Chat-completion API, key required
    Paid,
}

impl ProviderKind {
    // @returns: Human readable backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Free => "Hugging Face Inference (free)",
            Self::Paid => "OpenAI (paid)",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Free => "free".to_string(),
            Self::Paid => "paid".to_string(),
        }
    }

    // @returns: Environment variable holding this backend's secret
    pub fn credential_env_var(&self) -> &'static str {
        match self {
            Self::Free => HUGGINGFACE_TOKEN_ENV,
            Self::Paid => OPENAI_API_KEY_ENV,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "free" | "huggingface" => Ok(Self::Free),
            "paid" | "openai" => Ok(Self::Paid),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

pub const HUGGINGFACE_TOKEN_ENV: &str = "HUGGINGFACE_TOKEN";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Free-tier inference service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FreeTierConfig {
    /// Hosted model identifier
    #[serde(default = "default_free_tier_model")]
    pub model: String,

    /// Base URL; the model identifier is appended
    #[serde(default = "default_free_tier_endpoint")]
    pub endpoint: String,

    /// Optional access token, sent as a bearer token when present
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Cap on generated tokens
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Fixed pause after every call, in milliseconds
    #[serde(default = "default_post_call_delay_ms")]
    pub post_call_delay_ms: u64,

    /// Client-side request timeout; none leaves it to the backend
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FreeTierConfig {
    fn default() -> Self {
        Self {
            model: default_free_tier_model(),
            endpoint: default_free_tier_endpoint(),
            api_key: String::new(),
            max_new_tokens: default_max_new_tokens(),
            post_call_delay_ms: default_post_call_delay_ms(),
            timeout_secs: None,
        }
    }
}

/// Paid chat-completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaidConfig {
    /// Model name (e.g., "gpt-3.5-turbo", "gpt-4o-mini")
    #[serde(default = "default_paid_model")]
    pub model: String,

    /// Service endpoint URL (for Azure OpenAI or compatible servers)
    #[serde(default = "default_paid_endpoint")]
    pub endpoint: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Client-side request timeout; none leaves it to the backend
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PaidConfig {
    fn default() -> Self {
        Self {
            model: default_paid_model(),
            endpoint: default_paid_endpoint(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

/// PDF rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// TrueType font with Persian glyphs.
    ///
    /// The whole font program is embedded in every output PDF (no subsetting),
    /// so output size grows with the font file, roughly 750 KB for the bundled one.
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Distance between baselines in millimetres
    #[serde(default = "default_line_height_mm")]
    pub line_height_mm: f32,

    /// Page margin on every side in millimetres
    #[serde(default = "default_margin_mm")]
    pub margin_mm: f32,

    /// Whether the built-in font may stand in for a missing font file
    #[serde(default = "default_true")]
    pub allow_fallback: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
            font_size: default_font_size(),
            line_height_mm: default_line_height_mm(),
            margin_mm: default_margin_mm(),
            allow_fallback: true,
        }
    }
}

impl RenderConfig {
    /// Path the renderer opens for `font_path`.
    ///
    /// A relative path that does not exist from the working directory is
    /// looked up in the crate directory, where the bundled font lives.
    pub fn resolved_font_path(&self) -> PathBuf {
        if self.font_path.is_relative() && !self.font_path.exists() {
            let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join(&self.font_path);
            if bundled.exists() {
                return bundled;
            }
        }
        self.font_path.clone()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_free_tier_model() -> String {
    "arvan/DeepSeek-VL-7B-v1.5-fa".to_string()
}

fn default_free_tier_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_max_new_tokens() -> u32 {
    3000
}

fn default_post_call_delay_ms() -> u64 {
    2000 // blind rate-limit mitigation, applied after every call
}

fn default_paid_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_paid_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_font_path() -> PathBuf {
    PathBuf::from("fonts/DejaVuSans.ttf")
}

fn default_font_size() -> f32 {
    12.0
}

fn default_line_height_mm() -> f32 {
    10.0
}

fn default_margin_mm() -> f32 {
    10.0
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file, writing defaults if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Check that the selected backend can be called at all.
    ///
    /// Runs once per pipeline run, before any extraction work.
    pub fn validate(&self) -> Result<(), ProviderError> {
        match self.provider {
            ProviderKind::Free => {
                validate_endpoint(&self.free_tier.endpoint)?;
            }
            ProviderKind::Paid => {
                if self.paid.api_key.trim().is_empty() {
                    return Err(ProviderError::MissingCredential(format!(
                        "{} is required for the {} provider",
                        self.provider.credential_env_var(),
                        self.provider.display_name()
                    )));
                }
                validate_endpoint(&self.paid.endpoint)?;
            }
        }
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ProviderError> {
    Url::parse(endpoint)
        .map(|_| ())
        .map_err(|e| ProviderError::Unrecognized(format!("Invalid endpoint {:?}: {}", endpoint, e)))
}
