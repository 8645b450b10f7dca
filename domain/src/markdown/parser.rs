//! Line-oriented block parser.
//!
//! A single forward pass over the input lines. Each line is classified by
//! prefix; multi-line constructs (code fences, block math, list and quote
//! runs) greedily consume the lines that belong to them. Parsing never fails:
//! unterminated fences and math blocks extend to the end of the input.

use super::block::{DisplayBlock, InlineSpan};
use super::inline::render_inline;
use regex::Regex;
use std::sync::LazyLock;

const FENCE: &str = "```";
const MATH_DELIMITER: &str = "$$";

static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\. ").expect("ordered marker pattern is valid"));

/// Classification of a single line, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Heading(u8),
    Fence,
    BlockMath,
    UnorderedItem,
    OrderedItem,
    Quote,
    Text,
}

fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if line.starts_with("### ") {
        LineKind::Heading(3)
    } else if line.starts_with("## ") {
        LineKind::Heading(2)
    } else if line.starts_with("# ") {
        LineKind::Heading(1)
    } else if line.starts_with(FENCE) {
        LineKind::Fence
    } else if line.starts_with(MATH_DELIMITER) {
        LineKind::BlockMath
    } else if line.starts_with("- ") || line.starts_with("* ") {
        LineKind::UnorderedItem
    } else if ORDERED_MARKER.is_match(line) {
        LineKind::OrderedItem
    } else if line.starts_with("> ") {
        LineKind::Quote
    } else {
        LineKind::Text
    }
}

/// Render markdown-with-math into display blocks.
pub fn render(content: &str) -> Vec<DisplayBlock> {
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        match classify(line) {
            LineKind::Blank => i += 1,
            LineKind::Heading(level) => {
                let text = &line[level as usize + 1..];
                blocks.push(DisplayBlock::Heading {
                    level,
                    spans: render_inline(text),
                });
                i += 1;
            }
            LineKind::Fence => i = parse_fence(&lines, i, &mut blocks),
            LineKind::BlockMath => i = parse_block_math(&lines, i, &mut blocks),
            LineKind::UnorderedItem => {
                let (items, next) = collect_run(&lines, i, LineKind::UnorderedItem, |l| &l[2..]);
                blocks.push(DisplayBlock::UnorderedList { items });
                i = next;
            }
            LineKind::OrderedItem => {
                let (items, next) = collect_run(&lines, i, LineKind::OrderedItem, |l| {
                    ORDERED_MARKER
                        .find(l)
                        .map_or(l, |marker| &l[marker.end()..])
                });
                blocks.push(DisplayBlock::OrderedList { items });
                i = next;
            }
            LineKind::Quote => {
                let mut quoted = Vec::new();
                while i < lines.len() && classify(lines[i]) == LineKind::Quote {
                    quoted.push(&lines[i][2..]);
                    i += 1;
                }
                blocks.push(DisplayBlock::Blockquote {
                    spans: render_inline(&quoted.join(" ")),
                });
            }
            LineKind::Text => {
                blocks.push(DisplayBlock::Paragraph {
                    spans: render_inline(line),
                });
                i += 1;
            }
        }
    }

    blocks
}

/// Consume a fenced code block starting at `start`. Returns the next cursor.
fn parse_fence(lines: &[&str], start: usize, blocks: &mut Vec<DisplayBlock>) -> usize {
    let language = lines[start][FENCE.len()..].trim().to_string();
    let mut code_lines = Vec::new();
    let mut i = start + 1;

    while i < lines.len() && !lines[i].starts_with(FENCE) {
        code_lines.push(lines[i]);
        i += 1;
    }

    blocks.push(DisplayBlock::CodeBlock {
        language,
        code: code_lines.join("\n"),
    });

    // Skip the closing fence when present.
    (i + 1).min(lines.len())
}

/// Consume a `$$` math block starting at `start`. Returns the next cursor.
///
/// The expression runs from the opening delimiter to the next `$$`, which may
/// sit on the same line. Text trailing the closing delimiter becomes a
/// paragraph of its own.
fn parse_block_math(lines: &[&str], start: usize, blocks: &mut Vec<DisplayBlock>) -> usize {
    let opening_rest = &lines[start][MATH_DELIMITER.len()..];

    if let Some(pos) = opening_rest.find(MATH_DELIMITER) {
        push_math(blocks, &opening_rest[..pos]);
        push_trailing(blocks, &opening_rest[pos + MATH_DELIMITER.len()..]);
        return start + 1;
    }

    let mut parts = vec![opening_rest];
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];
        if let Some(pos) = line.find(MATH_DELIMITER) {
            parts.push(&line[..pos]);
            push_math(blocks, &parts.join("\n"));
            push_trailing(blocks, &line[pos + MATH_DELIMITER.len()..]);
            return i + 1;
        }
        parts.push(line);
        i += 1;
    }

    // Unterminated: the rest of the input is the expression.
    push_math(blocks, &parts.join("\n"));
    lines.len()
}

fn push_math(blocks: &mut Vec<DisplayBlock>, raw: &str) {
    blocks.push(DisplayBlock::BlockMath {
        expression: raw.trim().to_string(),
    });
}

fn push_trailing(blocks: &mut Vec<DisplayBlock>, rest: &str) {
    if !rest.trim().is_empty() {
        blocks.push(DisplayBlock::Paragraph {
            spans: render_inline(rest),
        });
    }
}

/// Collect consecutive list lines of `kind`, stripping each marker.
fn collect_run<'a>(
    lines: &[&'a str],
    start: usize,
    kind: LineKind,
    strip: impl Fn(&'a str) -> &'a str,
) -> (Vec<Vec<InlineSpan>>, usize) {
    let mut items = Vec::new();
    let mut i = start;

    while i < lines.len() && classify(lines[i]) == kind {
        items.push(render_inline(strip(lines[i])));
        i += 1;
    }

    (items, i)
}
