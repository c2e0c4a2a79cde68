/*!
 * Error types for the tarjome pipeline.
 *
 * Each pipeline stage has its own error enum, built with the thiserror crate.
 * `PipelineError` wraps them at the orchestrator boundary, where they are
 * logged in full and collapsed into a `UserFacingError` for display.
 */

use thiserror::Error;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Translation,
    Rendering,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extraction => write!(f, "extraction"),
            Self::Translation => write!(f, "translation"),
            Self::Rendering => write!(f, "rendering"),
        }
    }
}

/// Errors that can occur while turning document bytes into text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The bytes are not a valid document of the declared kind
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The bytes could not be decoded as UTF-8 text
    #[error("Failed to decode text: {0}")]
    Decoding(String),
}

/// Fieldless discriminant of `ExtractionError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    Malformed,
    Decoding,
}

impl ExtractionError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            Self::Malformed(_) => ExtractionErrorKind::Malformed,
            Self::Decoding(_) => ExtractionErrorKind::Decoding,
        }
    }
}

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The backend's secret is absent or empty
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The backend refused the supplied credential
    #[error("Authentication rejected: {0}")]
    AuthenticationRejected(String),

    /// The backend reported too many requests
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other backend-reported or transport failure
    #[error("Provider failure: {0}")]
    Unrecognized(String),
}

/// Fieldless discriminant of `ProviderError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    MissingCredential,
    AuthenticationRejected,
    RateLimited,
    Timeout,
    Unrecognized,
}

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::MissingCredential(_) => ProviderErrorKind::MissingCredential,
            Self::AuthenticationRejected(_) => ProviderErrorKind::AuthenticationRejected,
            Self::RateLimited(_) => ProviderErrorKind::RateLimited,
            Self::Timeout(_) => ProviderErrorKind::Timeout,
            Self::Unrecognized(_) => ProviderErrorKind::Unrecognized,
        }
    }

    /// Classify a non-success HTTP status returned by a backend
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = format!("HTTP {}: {}", status, message.into());
        match status {
            401 | 403 => Self::AuthenticationRejected(message),
            429 => Self::RateLimited(message),
            408 | 504 => Self::Timeout(message),
            _ => Self::Unrecognized(message),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout(error.to_string());
        }
        match error.status() {
            Some(status) => Self::from_status(status.as_u16(), error.to_string()),
            None => Self::Unrecognized(error.to_string()),
        }
    }
}

/// Errors that can occur while producing the output PDF
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Neither the primary font nor a fallback could be initialized
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// The PDF could not be assembled or written
    #[error("Failed to write PDF: {0}")]
    Serialization(String),
}

/// Fieldless discriminant of `RenderError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    FontLoad,
    Serialization,
}

impl RenderError {
    pub fn kind(&self) -> RenderErrorKind {
        match self {
            Self::FontLoad(_) => RenderErrorKind::FontLoad,
            Self::Serialization(_) => RenderErrorKind::Serialization,
        }
    }
}

/// Error surfaced by the pipeline orchestrator, tagged with its stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Error from text extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the translation backend
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from PDF rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// The stage this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            Self::Extraction(_) => Stage::Extraction,
            Self::Provider(_) => Stage::Translation,
            Self::Render(_) => Stage::Rendering,
        }
    }

    /// Collapse into the generic message shown to users
    pub fn to_user_facing(&self) -> UserFacingError {
        UserFacingError::generic()
    }
}

/// Message shown to the user when a pipeline run fails.
///
/// The text is the same whatever stage failed; the detailed error is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFacingError {
    /// Primary message
    pub message: String,
    /// Secondary hint line
    pub hint: String,
}

pub const GENERIC_FAILURE_MESSAGE: &str = "خطا در پردازش فایل.";
pub const GENERIC_FAILURE_HINT: &str = "ممکن است فایل بسیار بزرگ باشد یا کلید API نامعتبر باشد.";

impl UserFacingError {
    pub fn generic() -> Self {
        Self {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            hint: GENERIC_FAILURE_HINT.to_string(),
        }
    }
}

impl std::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.message, self.hint)
    }
}
