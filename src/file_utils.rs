use anyhow::{Context, Result, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{Document, DocumentKind, RenderedDocument};

// @module: File and directory utilities

/// Marker prefixed to every output filename ("translation")
pub const TRANSLATED_FILENAME_MARKER: &str = "ترجمه";

const PDF_MAGIC: &[u8] = b"%PDF-";

// Sequence number followed by a time range
static SRT_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Name offered for the translated PDF.
    ///
    /// Everything from the first `.` of the source name is dropped, so
    /// `movie.en.srt` becomes `ترجمه_movie.pdf`.
    pub fn translated_filename(source_name: &str) -> String {
        let stem = source_name.split('.').next().unwrap_or_default();
        format!("{}_{}.pdf", TRANSLATED_FILENAME_MARKER, stem)
    }

    // @generates: Output path for the translated PDF
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_file: P1, output_dir: P2) -> PathBuf {
        let name = input_file
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        output_dir.as_ref().join(Self::translated_filename(&name))
    }

    /// Detect the document kind of a file.
    ///
    /// The extension decides when it is known; otherwise the content is
    /// sniffed for a PDF header or an SRT cue, and anything else is plain text.
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<DocumentKind> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        if let Some(kind) = path
            .extension()
            .and_then(|ext| DocumentKind::from_extension(&ext.to_string_lossy()))
        {
            return Ok(kind);
        }

        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(Self::sniff_kind(&bytes))
    }

    /// Guess the kind from file content alone
    pub fn sniff_kind(bytes: &[u8]) -> DocumentKind {
        if bytes.starts_with(PDF_MAGIC) {
            return DocumentKind::Pdf;
        }
        let text = String::from_utf8_lossy(bytes);
        if text.contains("-->") && SRT_CUE.is_match(&text) {
            return DocumentKind::Subtitle;
        }
        DocumentKind::PlainText
    }

    /// Read a file into a `Document`, detecting its kind unless one is given
    pub fn read_document<P: AsRef<Path>>(path: P, kind: Option<DocumentKind>) -> Result<Document> {
        let path = path.as_ref();
        let kind = match kind {
            Some(kind) => kind,
            None => Self::detect_file_type(path)?,
        };

        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Path has no file name: {:?}", path))?;

        debug!("Read {} ({}, {} bytes)", name, kind, bytes.len());
        Ok(Document::new(name, kind, bytes))
    }

    /// Write a rendered PDF into `output_dir` under its own filename
    pub fn write_rendered<P: AsRef<Path>>(rendered: &RenderedDocument, output_dir: P) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        Self::ensure_dir(output_dir)?;

        let path = output_dir.join(&rendered.filename);
        fs::write(&path, &rendered.bytes)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        Ok(path)
    }
}
