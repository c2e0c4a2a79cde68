use crate::document::ExtractedText;
use crate::errors::ExtractionError;

use super::{TextExtractor, decode_utf8};

/// Returns decoded UTF-8 input unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        decode_utf8(bytes).map(ExtractedText::new)
    }
}
