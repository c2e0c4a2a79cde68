/*!
 * PDF rendering of translated text.
 *
 * Text is wrapped to the page width, reordered for display with the Unicode
 * bidi algorithm and placed right-aligned, one line per text object. The
 * Persian-capable TrueType font from the configuration is embedded when it
 * can be loaded; otherwise the standard Helvetica font is used and a
 * `RenderWarning::FontFallback` is attached to the result.
 *
 * Glyphs are drawn in visual order, so every reordered line is wrapped in a
 * marked-content span whose `/ActualText` carries the logical string for
 * copy and search.
 */

use log::{debug, info, warn};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use crate::app_config::RenderConfig;
use crate::document::{RenderWarning, RenderedDocument};
use crate::errors::RenderError;

pub mod font;
pub mod layout;

use font::{ActiveFont, EmbeddedFont, EmbeddedMetrics};

// A4 in points
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FONT_RESOURCE: &str = "F1";
const EMBEDDED_FONT_NAME: &str = "TarjomePersian";

/// Font picked for a render
#[derive(Debug, Clone)]
pub enum FontChoice {
    Embedded(EmbeddedFont),
    Builtin,
}

/// Renders text into a right-aligned PDF
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    config: RenderConfig,
}

impl PdfRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Pick the configured font, or the built-in one if it cannot be loaded
    pub fn select_font(&self) -> Result<(FontChoice, Vec<RenderWarning>), RenderError> {
        let font_path = self.config.resolved_font_path();
        if let Some(font) = EmbeddedFont::try_load(&font_path) {
            debug!("Using font {:?}", font_path);
            return Ok((FontChoice::Embedded(font), Vec::new()));
        }

        if !self.config.allow_fallback {
            return Err(RenderError::FontLoad(format!(
                "{:?} could not be loaded and no fallback font is allowed",
                self.config.font_path
            )));
        }

        let warning = RenderWarning::FontFallback {
            requested: self.config.font_path.clone(),
        };
        warn!("{}", warning);
        Ok((FontChoice::Builtin, vec![warning]))
    }

    /// Render `text` into a PDF offered under `filename`
    pub fn render(&self, text: &str, filename: impl Into<String>) -> Result<RenderedDocument, RenderError> {
        let (choice, warnings) = self.select_font()?;
        let mut font = match &choice {
            FontChoice::Embedded(embedded) => ActiveFont::embedded(embedded)?,
            FontChoice::Builtin => ActiveFont::Builtin,
        };

        let font_size = self.config.font_size;
        let margin = self.config.margin_mm * POINTS_PER_MM;
        let line_height = self.config.line_height_mm * POINTS_PER_MM;
        let text_width = PAGE_WIDTH - 2.0 * margin;
        let lines_per_page = (((PAGE_HEIGHT - 2.0 * margin) / line_height).floor() as usize).max(1);

        let lines = layout::wrap_text(text, text_width, |s| font.text_width(s, font_size));
        let mut pages: Vec<&[String]> = lines.chunks(lines_per_page).collect();
        if pages.is_empty() {
            pages.push(&[] as &[String]);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.new_object_id();

        let mut kids = Vec::with_capacity(pages.len());
        for page_lines in &pages {
            let mut operations = Vec::new();
            for (index, line) in page_lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let visual = layout::visual_order(line);
                let width = font.text_width(&visual, font_size);
                let x = PAGE_WIDTH - margin - width;
                // Baseline sits in the middle of its line cell
                let y = PAGE_HEIGHT - margin - index as f32 * line_height - line_height / 2.0 - 0.3 * font_size;
                let is_embedded = matches!(font, ActiveFont::Embedded(_));
                let encoded = font.encode(&visual);
                let operand = if is_embedded {
                    Object::String(encoded, StringFormat::Hexadecimal)
                } else {
                    Object::string_literal(encoded)
                };

                let reordered = &*visual != line.as_str();
                if reordered {
                    operations.push(Operation::new("BDC", vec!["Span".into(), actual_text(line).into()]));
                }
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![FONT_RESOURCE.into(), font_size.into()]));
                operations.push(Operation::new("Td", vec![x.into(), y.into()]));
                operations.push(Operation::new("Tj", vec![operand]));
                operations.push(Operation::new("ET", vec![]));
                if reordered {
                    operations.push(Operation::new("EMC", vec![]));
                }
            }

            let content = Content { operations }
                .encode()
                .map_err(|e| RenderError::Serialization(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let font_dict = match (&choice, &font) {
            (FontChoice::Embedded(embedded), ActiveFont::Embedded(metrics)) => {
                embedded_font_dictionary(&mut doc, embedded, metrics)
            }
            _ => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            },
        };
        doc.objects.insert(font_id, Object::Dictionary(font_dict));

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_RESOURCE => font_id,
            },
        });

        let page_count = kids.len();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Serialization(e.to_string()))?;

        info!("Rendered {} lines onto {} page(s), {} bytes", lines.len(), page_count, bytes.len());

        Ok(RenderedDocument {
            bytes,
            filename: filename.into(),
            page_count,
            warnings,
        })
    }
}

/// Marked-content properties giving the logical text of a line
fn actual_text(line: &str) -> Dictionary {
    // Text string in UTF-16BE with byte order mark
    let mut bytes = vec![0xFE, 0xFF];
    for unit in line.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    dictionary! {
        "ActualText" => Object::String(bytes, StringFormat::Hexadecimal),
    }
}

/// Type0 font dictionary with the TrueType program, widths and ToUnicode map
fn embedded_font_dictionary(doc: &mut Document, font: &EmbeddedFont, metrics: &EmbeddedMetrics<'_>) -> Dictionary {
    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data().len() as i64 },
        font.data().to_vec(),
    ));

    let bbox = metrics.bbox();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => EMBEDDED_FONT_NAME,
        "Flags" => 32_i64,
        "FontBBox" => bbox.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
        "ItalicAngle" => 0_i64,
        "Ascent" => metrics.ascent(),
        "Descent" => metrics.descent(),
        "CapHeight" => metrics.ascent(),
        "StemV" => 80_i64,
        "FontFile2" => font_file_id,
    });

    let mut widths = Vec::with_capacity(metrics.used.len() * 2);
    for (glyph, (_, width)) in &metrics.used {
        widths.push(Object::Integer(i64::from(*glyph)));
        widths.push(Object::Array(vec![Object::Integer(*width)]));
    }

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => EMBEDDED_FONT_NAME,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0_i64,
        },
        "FontDescriptor" => descriptor_id,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(metrics).into_bytes()));

    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => EMBEDDED_FONT_NAME,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::from(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    }
}

// bfchar sections may hold at most 100 entries
const BFCHAR_CHUNK: usize = 100;

/// CMap mapping each used glyph id back to its character
fn to_unicode_cmap(metrics: &EmbeddedMetrics<'_>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(u16, char)> = metrics.used.iter().map(|(glyph, (ch, _))| (*glyph, *ch)).collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, ch) in chunk {
            let mut units = [0u16; 2];
            let unicode: String = ch.encode_utf16(&mut units).iter().map(|u| format!("{:04X}", u)).collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, unicode));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
