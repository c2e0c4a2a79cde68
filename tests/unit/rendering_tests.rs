/*!
 * Tests for PDF rendering
 */

use anyhow::Result;
use tarjome::document::RenderWarning;
use tarjome::errors::RenderErrorKind;
use tarjome::extractor::TextExtractor;
use tarjome::extractor::pdf::PdfExtractor;
use tarjome::rendering::PdfRenderer;
use tarjome::rendering::layout::visual_order;
use crate::common;

/// Empty text still makes a valid one-page document
#[test]
fn test_render_withEmptyText_shouldProduceSinglePage() -> Result<()> {
    let renderer = PdfRenderer::new(common::test_config().render);

    let rendered = renderer.render("", "ترجمه_empty.pdf")?;
    let reloaded = lopdf::Document::load_mem(&rendered.bytes)?;

    assert_eq!(rendered.page_count, 1);
    assert_eq!(reloaded.get_pages().len(), 1);
    assert!(rendered.bytes.starts_with(b"%PDF-"));
    Ok(())
}

/// A missing font falls back with a warning instead of failing
#[test]
fn test_render_withMissingFont_shouldWarnAndSucceed() -> Result<()> {
    let config = common::test_config();
    let requested = config.render.font_path.clone();
    let renderer = PdfRenderer::new(config.render);

    let rendered = renderer.render("سلام دنیا", "ترجمه_hello.pdf")?;

    assert!(rendered.used_fallback_font());
    assert_eq!(rendered.warnings, vec![RenderWarning::FontFallback { requested }]);
    assert_eq!(rendered.filename, "ترجمه_hello.pdf");
    Ok(())
}

/// With fallback disabled a missing font is fatal
#[test]
fn test_render_withMissingFontAndNoFallback_shouldFailFontLoad() {
    let mut config = common::test_config();
    config.render.allow_fallback = false;

    let error = PdfRenderer::new(config.render).render("text", "out.pdf").unwrap_err();

    assert_eq!(error.kind(), RenderErrorKind::FontLoad);
}

/// A file that is not a font counts as missing
#[test]
fn test_render_withCorruptFontFile_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let font_path = common::create_test_file(temp_dir.path(), "broken.ttf", "not a font")?;
    let mut config = common::test_config();
    config.render.font_path = font_path;

    let rendered = PdfRenderer::new(config.render).render("Hello", "out.pdf")?;

    assert!(rendered.used_fallback_font());
    Ok(())
}

/// Long text flows onto further pages
#[test]
fn test_render_withManyParagraphs_shouldPaginate() -> Result<()> {
    let text = (1..=100).map(|i| format!("Paragraph {}", i)).collect::<Vec<_>>().join("\n");

    let rendered = PdfRenderer::new(common::test_config().render).render(&text, "long.pdf")?;
    let reloaded = lopdf::Document::load_mem(&rendered.bytes)?;

    assert!(rendered.page_count >= 4);
    assert_eq!(reloaded.get_pages().len(), rendered.page_count);
    Ok(())
}

/// Staged files disappear with their guard
#[test]
fn test_stage_shouldRemoveFileOnDrop() -> Result<()> {
    let rendered = PdfRenderer::new(common::test_config().render).render("Hello", "ترجمه_hello.pdf")?;

    let staged = rendered.stage()?;
    let path = staged.path().to_path_buf();
    assert_eq!(std::fs::read(&path)?, rendered.bytes);

    drop(staged);
    assert!(!path.exists());
    Ok(())
}

fn type0_font(doc: &lopdf::Document) -> Option<&lopdf::Dictionary> {
    doc.objects.values().filter_map(|object| object.as_dict().ok()).find(|dict| {
        dict.get(b"Subtype")
            .and_then(|subtype| subtype.as_name())
            .map(|name| name == b"Type0")
            .unwrap_or(false)
    })
}

/// The bundled font is embedded and its text extracts again
#[test]
fn test_render_withBundledFont_shouldEmbedFontAndExtractPersian() -> Result<()> {
    let config = tarjome::app_config::Config::default();
    let renderer = PdfRenderer::new(config.render);

    let rendered = renderer.render("سلام دنیا\nHello world", "ترجمه_hello.pdf")?;

    assert!(!rendered.used_fallback_font());
    assert!(rendered.warnings.is_empty());

    let reloaded = lopdf::Document::load_mem(&rendered.bytes)?;
    let font = type0_font(&reloaded).expect("Type0 font in output");
    assert_eq!(font.get(b"Encoding")?.as_name()?, b"Identity-H");
    assert!(font.has(b"ToUnicode"));

    let descendant_id = font.get(b"DescendantFonts")?.as_array()?[0].as_reference()?;
    let descendant = reloaded.get_dictionary(descendant_id)?;
    assert_eq!(descendant.get(b"Subtype")?.as_name()?, b"CIDFontType2");
    assert!(!descendant.get(b"W")?.as_array()?.is_empty());

    // Extraction follows the drawn glyphs, which are in visual order
    let extracted = PdfExtractor.extract(&rendered.bytes)?;
    assert!(extracted.as_str().contains(&*visual_order("سلام دنیا")));
    assert!(extracted.as_str().contains("Hello world"));
    Ok(())
}

/// The font program goes into the file whole
#[test]
fn test_render_withBundledFont_shouldEmbedEntireFontProgram() -> Result<()> {
    let config = tarjome::app_config::Config::default();
    let font_size = std::fs::metadata(config.render.resolved_font_path())?.len();

    let rendered = PdfRenderer::new(config.render).render("سلام", "out.pdf")?;
    let reloaded = lopdf::Document::load_mem(&rendered.bytes)?;

    let font_file = reloaded
        .objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .find(|stream| stream.dict.has(b"Length1"))
        .expect("embedded font stream");
    assert_eq!(font_file.dict.get(b"Length1")?.as_i64()?, font_size as i64);
    Ok(())
}
