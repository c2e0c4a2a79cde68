//! PDF text extraction using lopdf.

use log::{debug, warn};
use lopdf::Document;

use crate::document::ExtractedText;
use crate::errors::ExtractionError;

use super::TextExtractor;

/// Concatenates the text of every page, in page order, one page per line group
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    fn load(bytes: &[u8]) -> Result<Document, ExtractionError> {
        let mut doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            doc.decrypt("")
                .map_err(|e| ExtractionError::Malformed(format!("Encrypted PDF: {}", e)))?;
            debug!("Decrypted PDF with empty password");
        }

        Ok(doc)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let doc = Self::load(bytes)?;
        let pages = doc.get_pages();
        debug!("Loaded PDF with {} pages", pages.len());

        let mut page_texts = Vec::with_capacity(pages.len());
        for &number in pages.keys() {
            match doc.extract_text(&[number]) {
                Ok(text) => page_texts.push(text.trim_end_matches('\n').to_string()),
                Err(e) => {
                    warn!("No text extracted from page {}: {}", number, e);
                    page_texts.push(String::new());
                }
            }
        }

        Ok(ExtractedText::new(page_texts.join("\n")))
    }
}
