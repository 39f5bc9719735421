//! Text interpolation.
//!
//! `Hi {{ user.name }}, {{ count }} new` becomes the single expression
//! `"Hi "+user.name+", "+count+" new"`.

use std::ops::Range;

/// Opening interpolation delimiter.
pub const OPEN: &str = "{{";
/// Closing interpolation delimiter.
pub const CLOSE: &str = "}}";

/// One `{{ ... }}` span found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation<'a> {
    /// Byte range of the whole span, delimiters included.
    pub range: Range<usize>,
    /// The text between the delimiters, untrimmed.
    pub content: &'a str,
}

/// A piece of interpolated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, reproduced as-is.
    Literal(&'a str),
    /// Trimmed expression source.
    Expression(&'a str),
}

/// Find interpolation spans, left to right.
///
/// A span needs at least one character between the delimiters and ends at
/// the first closing delimiter after that; contents may cross lines. An
/// opening delimiter with no closing one after it is plain text.
pub fn find_interpolations(text: &str) -> Vec<Interpolation<'_>> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(OPEN) {
        let start = cursor + offset;
        let content_start = start + OPEN.len();
        let Some(first) = text[content_start..].chars().next() else {
            break;
        };
        let search_from = content_start + first.len_utf8();
        let Some(close) = text[search_from..].find(CLOSE) else {
            // No later opener can close either.
            break;
        };
        let content_end = search_from + close;
        let end = content_end + CLOSE.len();
        spans.push(Interpolation {
            range: start..end,
            content: &text[content_start..content_end],
        });
        cursor = end;
    }

    spans
}

/// Check whether a text contains at least one interpolation span.
pub fn has_interpolation(text: &str) -> bool {
    !find_interpolations(text).is_empty()
}

/// Split a text into literal runs and trimmed expressions. Empty literal runs
/// are omitted.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    for span in find_interpolations(text) {
        if span.range.start > last {
            out.push(Segment::Literal(&text[last..span.range.start]));
        }
        out.push(Segment::Expression(span.content.trim()));
        last = span.range.end;
    }

    if last < text.len() {
        out.push(Segment::Literal(&text[last..]));
    }

    out
}

/// Compile interpolated text into one expression string.
///
/// Text without interpolation becomes a single quoted literal, so evaluating
/// the result always reproduces the literal parts exactly.
pub fn parse_text(text: &str) -> String {
    if !has_interpolation(text) {
        return quote_literal(text);
    }

    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(literal) => quote_literal(literal),
            Segment::Expression(expr) => expr.to_string(),
        })
        .collect::<Vec<_>>()
        .join("+")
}

/// Encode a string as a double-quoted string literal.
pub fn quote_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
