/*!
 * Tests for text extraction
 */

use tarjome::document::{Document, DocumentKind};
use tarjome::errors::ExtractionErrorKind;
use tarjome::extractor::{self, PdfExtractor, TextExtractor};
use tarjome::rendering::PdfRenderer;
use crate::common;

/// Each block contributes its third line, in order
#[test]
fn test_extract_withSubtitle_shouldKeepDialogueLines() {
    let document = Document::new("movie.srt", DocumentKind::Subtitle, common::SAMPLE_SUBTITLE.as_bytes().to_vec());

    let extraction = extractor::extract(&document);

    assert!(extraction.is_ok());
    assert_eq!(extraction.text.as_str(), "Hello world\nGoodbye");
}

/// Short blocks are skipped without failing the document
#[test]
fn test_extract_withShortBlocks_shouldSkipThem() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nStill here\n\njunk\n";
    let document = Document::new("broken.srt", DocumentKind::Subtitle, content.as_bytes().to_vec());

    let extraction = extractor::extract(&document);

    assert!(extraction.is_ok());
    assert_eq!(extraction.text.as_str(), "Still here");
}

/// Only the first dialogue line of a multi-line cue is kept
#[test]
fn test_extract_withMultiLineCue_shouldKeepThirdLineOnly() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n";
    let document = Document::new("cue.srt", DocumentKind::Subtitle, content.as_bytes().to_vec());

    assert_eq!(extractor::extract(&document).text.as_str(), "First line");
}

/// Windows line endings do not hide block boundaries
#[test]
fn test_extract_withCrlfSubtitle_shouldSplitBlocks() {
    let content = common::SAMPLE_SUBTITLE.replace('\n', "\r\n");
    let document = Document::new("movie.srt", DocumentKind::Subtitle, content.into_bytes());

    assert_eq!(extractor::extract(&document).text.as_str(), "Hello world\nGoodbye");
}

/// Plain text comes back unchanged
#[test]
fn test_extract_withPlainText_shouldBeByteForByte() {
    let content = "  Line one\n\nسلام دنیا\ttabbed  \n";
    let document = Document::new("notes.txt", DocumentKind::PlainText, content.as_bytes().to_vec());

    assert_eq!(extractor::extract(&document).text.as_str(), content);
}

/// Invalid UTF-8 yields empty text plus a decoding error
#[test]
fn test_extract_withInvalidUtf8Subtitle_shouldReportDecoding() {
    let document = Document::new("movie.srt", DocumentKind::Subtitle, vec![b'1', b'\n', 0xC3, 0x28]);

    let extraction = extractor::extract(&document);

    assert!(extraction.text.is_empty());
    assert_eq!(extraction.error.map(|e| e.kind()), Some(ExtractionErrorKind::Decoding));
}

/// Extraction has no hidden state between calls
#[test]
fn test_extract_repeated_shouldYieldSameText() {
    let document = Document::new("movie.srt", DocumentKind::Subtitle, common::SAMPLE_SUBTITLE.as_bytes().to_vec());
    assert_eq!(extractor::extract(&document), extractor::extract(&document));
}

/// Garbage bytes declared as PDF are malformed
#[test]
fn test_extract_withGarbagePdf_shouldBeMalformed() {
    let document = Document::new("scan.pdf", DocumentKind::Pdf, b"definitely not a pdf".to_vec());

    let extraction = extractor::extract(&document);

    assert!(extraction.text.is_empty());
    assert_eq!(extraction.error.map(|e| e.kind()), Some(ExtractionErrorKind::Malformed));
}

/// Text written by the renderer can be read back
#[test]
fn test_extract_withRenderedPdf_shouldReturnPageText() {
    let config = common::test_config();
    let rendered = PdfRenderer::new(config.render).render("Hello world", "out.pdf").unwrap();

    let text = PdfExtractor.extract(&rendered.bytes).unwrap();

    assert!(text.as_str().contains("Hello world"), "extracted: {:?}", text.as_str());
}
