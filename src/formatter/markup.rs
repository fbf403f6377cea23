//! Markup spans for rendered sections.
//!
//! The tokenizer scans plain section text and tags the parts a presentation
//! layer styles or turns into links. It knows nothing about fonts or colors.

use std::ops::Range;

/// Literal section headers, matched case-insensitively.
pub const SECTION_HEADERS: [&str; 2] = ["-- Body --", "-- Headers --"];

/// What a span marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanTag {
    /// `-- Body --` or `-- Headers --`
    SectionHeader,
    /// A bracketed key such as `[URL]`
    BracketedKey,
}

/// A tagged byte range of a rendered section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    /// Byte range into the section text.
    pub range: Range<usize>,

    pub tag: SpanTag,

    /// Link target. For bracketed keys this is the token text itself,
    /// brackets included.
    pub payload: Option<String>,
}

impl MarkupSpan {
    /// The spanned slice of `text`.
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.range.clone()]
    }
}

/// Produces all spans of `text`, ordered by start offset.
///
/// # Examples
///
/// ```
/// use netfox::formatter::markup::{tokenize, SpanTag};
///
/// let spans = tokenize("-- Headers --\n\n[Accept] \n*/*\n");
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].tag, SpanTag::SectionHeader);
/// assert_eq!(spans[1].payload.as_deref(), Some("[Accept]"));
/// ```
pub fn tokenize(text: &str) -> Vec<MarkupSpan> {
    let mut spans = section_header_spans(text);
    spans.extend(bracketed_key_spans(text));
    spans.sort_by_key(|span| (span.range.start, span.range.end));
    spans
}

fn section_header_spans(text: &str) -> Vec<MarkupSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();

    for header in SECTION_HEADERS {
        let needle = header.as_bytes();
        let mut start = 0;
        while start + needle.len() <= bytes.len() {
            if bytes[start..start + needle.len()].eq_ignore_ascii_case(needle) {
                spans.push(MarkupSpan {
                    range: start..start + needle.len(),
                    tag: SpanTag::SectionHeader,
                    payload: None,
                });
                start += needle.len();
            } else {
                start += 1;
            }
        }
    }

    spans
}

/// `[`, one or more characters other than brackets or newlines, `]`.
fn bracketed_key_spans(text: &str) -> Vec<MarkupSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }

        let close = bytes[i + 1..]
            .iter()
            .position(|b| matches!(b, b'[' | b']' | b'\n'))
            .map(|offset| i + 1 + offset);

        match close {
            Some(end) if bytes[end] == b']' && end > i + 1 => {
                // Brackets are ASCII, so both ends sit on char boundaries
                spans.push(MarkupSpan {
                    range: i..end + 1,
                    tag: SpanTag::BracketedKey,
                    payload: Some(text[i..=end].to_string()),
                });
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    spans
}
