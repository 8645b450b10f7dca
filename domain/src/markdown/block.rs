//! Display blocks and inline spans produced by the renderer.
//!
//! These types are renderer-agnostic: the terminal formatter, the JSON API
//! and tests all consume the same tree.

use serde::{Deserialize, Serialize};

/// One styled run of text within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText(String),
    Bold(String),
    Italic(String),
    InlineCode(String),
    InlineMath(String),
    Link { text: String, url: String },
}

impl InlineSpan {
    /// The text a reader sees for this span, without markup delimiters.
    pub fn surface_text(&self) -> &str {
        match self {
            InlineSpan::PlainText(text)
            | InlineSpan::Bold(text)
            | InlineSpan::Italic(text)
            | InlineSpan::InlineCode(text)
            | InlineSpan::InlineMath(text) => text,
            InlineSpan::Link { text, .. } => text,
        }
    }

    /// Serialize the span back into the inline markup grammar.
    pub fn to_markdown(&self) -> String {
        match self {
            InlineSpan::PlainText(text) => text.clone(),
            InlineSpan::Bold(text) => format!("**{}**", text),
            InlineSpan::Italic(text) => format!("*{}*", text),
            InlineSpan::InlineCode(text) => format!("`{}`", text),
            InlineSpan::InlineMath(expr) => format!("${}$", expr),
            InlineSpan::Link { text, url } => format!("[{}]({})", text, url),
        }
    }
}

/// One structural unit of rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayBlock {
    Heading { level: u8, spans: Vec<InlineSpan> },
    Paragraph { spans: Vec<InlineSpan> },
    CodeBlock { language: String, code: String },
    BlockMath { expression: String },
    UnorderedList { items: Vec<Vec<InlineSpan>> },
    OrderedList { items: Vec<Vec<InlineSpan>> },
    Blockquote { spans: Vec<InlineSpan> },
}

impl DisplayBlock {
    /// Short kind name, used by formatters and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DisplayBlock::Heading { .. } => "heading",
            DisplayBlock::Paragraph { .. } => "paragraph",
            DisplayBlock::CodeBlock { .. } => "code_block",
            DisplayBlock::BlockMath { .. } => "block_math",
            DisplayBlock::UnorderedList { .. } => "unordered_list",
            DisplayBlock::OrderedList { .. } => "ordered_list",
            DisplayBlock::Blockquote { .. } => "blockquote",
        }
    }

    /// Visible text of the block. List items are separated by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            DisplayBlock::Heading { spans, .. }
            | DisplayBlock::Paragraph { spans }
            | DisplayBlock::Blockquote { spans } => spans_text(spans),
            DisplayBlock::CodeBlock { code, .. } => code.clone(),
            DisplayBlock::BlockMath { expression } => expression.clone(),
            DisplayBlock::UnorderedList { items } | DisplayBlock::OrderedList { items } => items
                .iter()
                .map(|item| spans_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Serialize the block back into the markdown subset it was parsed from.
    pub fn to_markdown(&self) -> String {
        match self {
            DisplayBlock::Heading { level, spans } => {
                format!("{} {}", "#".repeat(*level as usize), spans_markdown(spans))
            }
            DisplayBlock::Paragraph { spans } => spans_markdown(spans),
            DisplayBlock::CodeBlock { language, code } => {
                if code.is_empty() {
                    format!("```{}\n```", language)
                } else {
                    format!("```{}\n{}\n```", language, code)
                }
            }
            DisplayBlock::BlockMath { expression } => {
                if expression.contains('\n') {
                    format!("$$\n{}\n$$", expression)
                } else {
                    format!("$${}$$", expression)
                }
            }
            DisplayBlock::UnorderedList { items } => items
                .iter()
                .map(|item| format!("- {}", spans_markdown(item)))
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::OrderedList { items } => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, spans_markdown(item)))
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::Blockquote { spans } => format!("> {}", spans_markdown(spans)),
        }
    }
}

/// Concatenated surface text of a span sequence.
pub fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::surface_text).collect()
}

fn spans_markdown(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::to_markdown).collect()
}

/// Visible text of a whole document, one block per line group.
pub fn plain_text(blocks: &[DisplayBlock]) -> String {
    blocks
        .iter()
        .map(DisplayBlock::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Serialize a document back into markdown, blocks separated by a blank line.
pub fn to_markdown(blocks: &[DisplayBlock]) -> String {
    blocks
        .iter()
        .map(DisplayBlock::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_text_strips_markup() {
        let spans = vec![
            InlineSpan::PlainText("F = ".to_string()),
            InlineSpan::InlineMath("ma".to_string()),
            InlineSpan::PlainText(" is ".to_string()),
            InlineSpan::Bold("Newton's second law".to_string()),
            InlineSpan::Link {
                text: "docs".to_string(),
                url: "https://example.org".to_string(),
            },
        ];
        assert_eq!(spans_text(&spans), "F = ma is Newton's second lawdocs");
    }

    #[test]
    fn test_block_to_markdown() {
        let heading = DisplayBlock::Heading {
            level: 2,
            spans: vec![InlineSpan::PlainText("Waves".to_string())],
        };
        assert_eq!(heading.to_markdown(), "## Waves");

        let list = DisplayBlock::OrderedList {
            items: vec![
                vec![InlineSpan::PlainText("one".to_string())],
                vec![InlineSpan::Italic("two".to_string())],
            ],
        };
        assert_eq!(list.to_markdown(), "1. one\n2. *two*");

        let math = DisplayBlock::BlockMath {
            expression: "a\n= b".to_string(),
        };
        assert_eq!(math.to_markdown(), "$$\na\n= b\n$$");
    }

    #[test]
    fn test_serde_shape() {
        let block = DisplayBlock::Paragraph {
            spans: vec![InlineSpan::InlineMath("E=mc^2".to_string())],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["spans"][0]["type"], "inline_math");
        assert_eq!(json["spans"][0]["value"], "E=mc^2");
    }
}
