use std::borrow::Cow;

use unicode_bidi::BidiInfo;

// @module: Line wrapping and visual ordering

/// Wrap text into lines no wider than `max_width`.
///
/// Source line breaks are kept, blank source lines stay blank, and words wider
/// than a whole line are broken between characters.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for source_line in text.split('\n') {
        let source_line = source_line.strip_suffix('\r').unwrap_or(source_line);
        let mut current = String::new();

        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, max_width, &measure);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

fn break_word(word: &str, max_width: f32, measure: &impl Fn(&str) -> f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for ch in word.chars() {
        piece.push(ch);
        // A single character always fits, even if wider than the line
        if measure(&piece) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }

    pieces.push(piece);
    pieces
}

/// Reorder one logical line into left-to-right display order
pub fn visual_order(line: &str) -> Cow<'_, str> {
    let bidi = BidiInfo::new(line, None);
    match bidi.paragraphs.first() {
        Some(paragraph) => Cow::Owned(bidi.reorder_line(paragraph, paragraph.range.clone()).into_owned()),
        None => Cow::Borrowed(line),
    }
}
