//! Font loading and glyph metrics for the PDF renderer.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use ttf_parser::{Face, GlyphId};

use crate::errors::RenderError;

// @const: Arabic letter alef, used to check Persian coverage
const PERSIAN_COVERAGE_CHAR: char = '\u{0627}';

/// A TrueType font loaded from disk
#[derive(Clone)]
pub struct EmbeddedFont {
    data: Vec<u8>,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont").field("bytes", &self.data.len()).finish()
    }
}

impl EmbeddedFont {
    /// Try to load a TrueType font; `None` when the file is missing or unparsable
    pub fn try_load(path: &Path) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                debug!("Font {:?} not readable: {}", path, e);
                return None;
            }
        };

        let face = match Face::parse(&data, 0) {
            Ok(face) => face,
            Err(e) => {
                debug!("Font {:?} is not a usable TrueType font: {}", path, e);
                return None;
            }
        };

        if face.glyph_index(PERSIAN_COVERAGE_CHAR).is_none() {
            warn!("Font {:?} has no Persian glyphs", path);
        }

        Some(Self { data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn face(&self) -> Result<Face<'_>, RenderError> {
        Face::parse(&self.data, 0).map_err(|e| RenderError::FontLoad(e.to_string()))
    }
}

/// Font chosen for one render, with metrics ready for layout
pub enum ActiveFont<'a> {
    /// Embedded TrueType font addressed by glyph id
    Embedded(EmbeddedMetrics<'a>),
    /// Standard Helvetica with WinAnsi encoding
    Builtin,
}

/// Parsed face plus the glyphs used so far
pub struct EmbeddedMetrics<'a> {
    face: Face<'a>,
    pub(crate) used: BTreeMap<u16, (char, i64)>,
}

impl<'a> EmbeddedMetrics<'a> {
    pub fn units_per_em(&self) -> f32 {
        f32::from(self.face.units_per_em())
    }

    /// Scale font units to the 1000-unit PDF glyph space
    pub fn to_pdf_units(&self, value: i16) -> i64 {
        (f32::from(value) * 1000.0 / self.units_per_em()).round() as i64
    }

    pub fn ascent(&self) -> i64 {
        self.to_pdf_units(self.face.ascender())
    }

    pub fn descent(&self) -> i64 {
        self.to_pdf_units(self.face.descender())
    }

    pub fn bbox(&self) -> [i64; 4] {
        let rect = self.face.global_bounding_box();
        [
            self.to_pdf_units(rect.x_min),
            self.to_pdf_units(rect.y_min),
            self.to_pdf_units(rect.x_max),
            self.to_pdf_units(rect.y_max),
        ]
    }

    fn glyph(&self, ch: char) -> GlyphId {
        self.face.glyph_index(ch).unwrap_or(GlyphId(0))
    }

    fn glyph_width(&self, glyph: GlyphId) -> i64 {
        let advance = self.face.glyph_hor_advance(glyph).unwrap_or(0);
        (f32::from(advance) * 1000.0 / self.units_per_em()).round() as i64
    }
}

impl<'a> ActiveFont<'a> {
    /// Prepare an embedded font for layout
    pub fn embedded(font: &'a EmbeddedFont) -> Result<Self, RenderError> {
        Ok(Self::Embedded(EmbeddedMetrics {
            face: font.face()?,
            used: BTreeMap::new(),
        }))
    }

    /// Advance width of `text` in points
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: i64 = match self {
            Self::Embedded(metrics) => text.chars().map(|ch| metrics.glyph_width(metrics.glyph(ch))).sum(),
            Self::Builtin => text.chars().map(|ch| i64::from(helvetica_width(winansi_byte(ch)))).sum(),
        };
        units as f32 * font_size / 1000.0
    }

    /// Encode text for a `Tj` operand, recording embedded glyphs as used
    pub fn encode(&mut self, text: &str) -> Vec<u8> {
        match self {
            Self::Embedded(metrics) => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let glyph = metrics.glyph(ch);
                    let width = metrics.glyph_width(glyph);
                    metrics.used.entry(glyph.0).or_insert((ch, width));
                    bytes.extend_from_slice(&glyph.0.to_be_bytes());
                }
                bytes
            }
            Self::Builtin => text.chars().map(winansi_byte).collect(),
        }
    }
}

/// Byte for `ch` in the built-in font; anything outside printable ASCII becomes `?`
pub fn winansi_byte(ch: char) -> u8 {
    if (' '..='~').contains(&ch) { ch as u8 } else { b'?' }
}

// Helvetica advance widths for bytes 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' to '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' to 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' to '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' to 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' to '~'
];

fn helvetica_width(byte: u8) -> u16 {
    match byte {
        32..=126 => HELVETICA_WIDTHS[usize::from(byte - 32)],
        _ => 556,
    }
}
