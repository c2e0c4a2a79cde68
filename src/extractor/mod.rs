/*!
 * Text extraction for the supported document kinds.
 *
 * Each kind has an extractor implementing `TextExtractor`:
 * - `pdf`: page-ordered text from a PDF document
 * - `subtitle`: dialogue lines from an SRT file
 * - `plain_text`: UTF-8 text returned as is
 *
 * `extract` is the entry point used by the pipeline. It never fails: an
 * extraction error is reported alongside an empty text.
 */

use log::{debug, warn};

use crate::document::{Document, DocumentKind, ExtractedText, Extraction};
use crate::errors::ExtractionError;

pub mod pdf;
pub mod plain_text;
pub mod subtitle;

pub use pdf::PdfExtractor;
pub use plain_text::PlainTextExtractor;
pub use subtitle::SubtitleExtractor;

/// Capability shared by all extractors
pub trait TextExtractor: Send + Sync {
    /// Convert raw bytes into text
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// Select the extractor for a document kind
pub fn extractor_for(kind: DocumentKind) -> &'static dyn TextExtractor {
    match kind {
        DocumentKind::Pdf => &PdfExtractor,
        DocumentKind::Subtitle => &SubtitleExtractor,
        DocumentKind::PlainText => &PlainTextExtractor,
    }
}

/// Extract the text of a document, reporting rather than propagating failure
pub fn extract(document: &Document) -> Extraction {
    debug!("Extracting {} document {:?} ({} bytes)", document.kind(), document.name(), document.bytes().len());

    match extractor_for(document.kind()).extract(document.bytes()) {
        Ok(text) => Extraction::succeeded(text),
        Err(e) => {
            warn!("Extraction of {:?} failed: {}", document.name(), e);
            Extraction::failed(e)
        }
    }
}

const UTF8_BOM: &str = "\u{feff}";

/// Decode bytes as UTF-8, dropping a leading byte order mark
pub(crate) fn decode_utf8(bytes: &[u8]) -> Result<&str, ExtractionError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::Decoding(e.to_string()))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}
