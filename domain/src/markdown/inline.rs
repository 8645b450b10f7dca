//! Inline span parsing.
//!
//! Five non-nesting patterns are matched independently over the whole line.
//! All matches are collected, stable-sorted by start offset, and a match is
//! kept only if it starts at or after the end of the previously kept match.
//! The lower start offset always wins; at equal offsets the pattern order
//! below decides.

use super::block::InlineSpan;
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Math,
    Bold,
    Italic,
    Code,
    Link,
}

static PATTERNS: LazyLock<Vec<(SpanKind, Regex)>> = LazyLock::new(|| {
    [
        (SpanKind::Math, r"\$([^$]+)\$"),
        (SpanKind::Bold, r"\*\*([^*]+)\*\*"),
        (SpanKind::Italic, r"\*([^*]+)\*"),
        (SpanKind::Code, r"`([^`]+)`"),
        (SpanKind::Link, r"\[([^\]]+)\]\(([^)]+)\)"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("inline pattern is valid")))
    .collect()
});

#[derive(Debug)]
struct SpanMatch {
    start: usize,
    end: usize,
    span: InlineSpan,
}

impl SpanMatch {
    fn from_captures(kind: SpanKind, caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let content = caps.get(1)?.as_str().to_string();
        let span = match kind {
            SpanKind::Math => InlineSpan::InlineMath(content),
            SpanKind::Bold => InlineSpan::Bold(content),
            SpanKind::Italic => InlineSpan::Italic(content),
            SpanKind::Code => InlineSpan::InlineCode(content),
            SpanKind::Link => InlineSpan::Link {
                text: content,
                url: caps.get(2)?.as_str().to_string(),
            },
        };
        Some(Self {
            start: whole.start(),
            end: whole.end(),
            span,
        })
    }
}

/// Split a single line of text into inline spans.
///
/// Text outside recognized markup is emitted verbatim as
/// [`InlineSpan::PlainText`]; an empty input yields no spans.
pub fn render_inline(text: &str) -> Vec<InlineSpan> {
    let mut matches: Vec<SpanMatch> = PATTERNS
        .iter()
        .flat_map(|(kind, regex)| {
            regex
                .captures_iter(text)
                .filter_map(move |caps| SpanMatch::from_captures(*kind, &caps))
        })
        .collect();

    // Stable: equal offsets keep pattern registration order.
    matches.sort_by_key(|m| m.start);

    let mut spans = Vec::new();
    let mut cursor = 0;

    for m in matches {
        if m.start < cursor {
            continue;
        }
        if m.start > cursor {
            spans.push(InlineSpan::PlainText(text[cursor..m.start].to_string()));
        }
        spans.push(m.span);
        cursor = m.end;
    }

    if cursor < text.len() {
        spans.push(InlineSpan::PlainText(text[cursor..].to_string()));
    }

    spans
}
