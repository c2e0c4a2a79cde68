use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::ExtractedText;
use crate::errors::ExtractionError;

use super::{TextExtractor, decode_utf8};

// @module: SRT dialogue extraction

// @const: One or more blank lines separating subtitle blocks
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+").unwrap()
});

// Position of the dialogue line inside a block: sequence number, timing, dialogue
const DIALOGUE_LINE_INDEX: usize = 2;

/// Pulls the dialogue line out of every SRT block.
///
/// Only the third line of a block is kept, so continuation lines of
/// multi-line dialogue are dropped. Blocks with fewer than three lines
/// contribute nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubtitleExtractor;

impl SubtitleExtractor {
    /// Split SRT content into blocks and keep each block's dialogue line
    pub fn dialogue_lines(content: &str) -> Vec<&str> {
        let content = content.trim_start_matches('\n');
        let mut lines = Vec::new();

        for (index, block) in BLOCK_SEPARATOR.split(content).enumerate() {
            match block.split('\n').nth(DIALOGUE_LINE_INDEX) {
                Some(line) => lines.push(line),
                None => debug!("Skipping subtitle block {} with fewer than 3 lines", index + 1),
            }
        }

        lines
    }
}

impl TextExtractor for SubtitleExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let content = decode_utf8(bytes)?.replace("\r\n", "\n");
        Ok(ExtractedText::new(Self::dialogue_lines(&content).join("\n")))
    }
}
