use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::errors::ExtractionError;

// @module: Values carried through one pipeline run

/// Declared type of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Subtitle,
    PlainText,
}

impl DocumentKind {
    /// Map a file extension (without the dot) to a document kind
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "srt" => Some(Self::Subtitle),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Subtitle => "Subtitle (SRT)",
            Self::PlainText => "Plain text",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Raw uploaded bytes plus their declared kind
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes,
        }
    }

    /// Original filename, used to derive the output filename
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Ordered lines of text pulled out of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of extraction: always a defined text, plus the error if one occurred.
///
/// On failure `text` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: ExtractedText,
    pub error: Option<ExtractionError>,
}

impl Extraction {
    pub fn succeeded(text: ExtractedText) -> Self {
        Self { text, error: None }
    }

    pub fn failed(error: ExtractionError) -> Self {
        Self {
            text: ExtractedText::empty(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, dropping the (empty) text on failure
    pub fn into_result(self) -> Result<ExtractedText, ExtractionError> {
        match self.error {
            None => Ok(self.text),
            Some(error) => Err(error),
        }
    }
}

/// Language every translation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLanguage {
    #[default]
    Persian,
}

impl TargetLanguage {
    /// ISO 639-1 code
    pub fn code(&self) -> &str {
        match self {
            Self::Persian => "fa",
        }
    }
}

/// Text handed to a translation backend
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub target: TargetLanguage,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: TargetLanguage::Persian,
        }
    }
}

/// Non-fatal conditions reported by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// The Persian-capable font could not be loaded; the built-in font was used
    FontFallback { requested: PathBuf },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontFallback { requested } => write!(
                f,
                "Persian font not found at {:?}; using the default font, non-Latin text may not display correctly",
                requested
            ),
        }
    }
}

/// Serialized PDF ready for download
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
    pub warnings: Vec<RenderWarning>,
}

impl RenderedDocument {
    pub fn used_fallback_font(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, RenderWarning::FontFallback { .. }))
    }

    /// Write the PDF into a fresh temporary directory.
    ///
    /// The directory is removed when the returned guard is dropped.
    pub fn stage(&self) -> Result<StagedFile> {
        let dir = TempDir::new().context("Failed to create staging directory")?;
        let path = dir.path().join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to stage rendered PDF: {:?}", path))?;
        Ok(StagedFile { _dir: dir, path })
    }
}

/// A rendered PDF written to a temporary location
#[derive(Debug)]
pub struct StagedFile {
    _dir: TempDir,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
