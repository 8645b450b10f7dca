//! Terminal renderer for display blocks
//!
//! Draws the block tree produced by [`octophyx_domain::render`] with ANSI
//! styling. Math is typeset to Unicode; an expression the typesetter rejects
//! is shown raw in red code style so the rest of the document still renders.

use colored::Colorize;
use octophyx_domain::{DisplayBlock, InlineSpan, typeset};
use tracing::debug;

const RULE_WIDTH: usize = 40;

/// Renders markdown display blocks for the terminal
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Parse and render a markdown document
    pub fn render_markdown(content: &str) -> String {
        Self::render(&octophyx_domain::render(content))
    }

    /// Render blocks, separated by blank lines
    pub fn render(blocks: &[DisplayBlock]) -> String {
        blocks
            .iter()
            .map(Self::render_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_block(block: &DisplayBlock) -> String {
        match block {
            DisplayBlock::Heading { level, spans } => {
                let text = Self::plain_spans(spans);
                match level {
                    1 => format!(
                        "{}\n{}",
                        text.cyan().bold().underline(),
                        "=".repeat(text.chars().count().max(3)).cyan()
                    ),
                    2 => format!("{}", text.cyan().bold()),
                    _ => format!("{}", text.bold()),
                }
            }
            DisplayBlock::Paragraph { spans } => Self::render_spans(spans),
            DisplayBlock::CodeBlock { language, code } => Self::render_code(language, code),
            DisplayBlock::BlockMath { expression } => match typeset(expression) {
                Ok(text) => Self::indent(&text, "    ")
                    .lines()
                    .map(|line| line.magenta().bold().to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
                Err(e) => {
                    debug!(error = %e, "Showing block math unformatted");
                    Self::indent(expression, "    ")
                        .lines()
                        .map(|line| line.red().to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            },
            DisplayBlock::UnorderedList { items } => items
                .iter()
                .map(|item| format!("  {} {}", "•".cyan(), Self::render_spans(item)))
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::OrderedList { items } => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    format!(
                        "  {} {}",
                        format!("{}.", i + 1).cyan(),
                        Self::render_spans(item)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::Blockquote { spans } => {
                format!("  {} {}", "│".dimmed(), Self::render_spans(spans).italic())
            }
        }
    }

    fn render_spans(spans: &[InlineSpan]) -> String {
        spans.iter().map(Self::render_span).collect()
    }

    fn render_span(span: &InlineSpan) -> String {
        match span {
            InlineSpan::PlainText(text) => text.clone(),
            InlineSpan::Bold(text) => text.bold().to_string(),
            InlineSpan::Italic(text) => text.italic().to_string(),
            InlineSpan::InlineCode(text) => text.yellow().to_string(),
            InlineSpan::InlineMath(expression) => match typeset(expression) {
                Ok(text) => text.magenta().to_string(),
                Err(e) => {
                    debug!(error = %e, "Showing inline math unformatted");
                    format!("${}$", expression).red().to_string()
                }
            },
            InlineSpan::Link { text, url } => {
                format!("{} {}", text.blue().underline(), format!("<{}>", url).dimmed())
            }
        }
    }

    /// Headings are drawn in one style, so inline markup is flattened.
    fn plain_spans(spans: &[InlineSpan]) -> String {
        spans
            .iter()
            .map(|span| match span {
                InlineSpan::InlineMath(expression) => {
                    typeset(expression).unwrap_or_else(|_| format!("${}$", expression))
                }
                other => other.surface_text().to_string(),
            })
            .collect()
    }

    fn render_code(language: &str, code: &str) -> String {
        let label = if language.is_empty() {
            "─".repeat(RULE_WIDTH)
        } else {
            format!(
                "─ {} {}",
                language,
                "─".repeat(RULE_WIDTH.saturating_sub(language.chars().count() + 3))
            )
        };

        let mut output = format!("{}", format!("┌{}", label).dimmed());
        for line in code.lines() {
            output.push_str(&format!("\n{} {}", "│".dimmed(), line.yellow()));
        }
        output.push_str(&format!("\n{}", format!("└{}", "─".repeat(RULE_WIDTH)).dimmed()));
        output
    }

    fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
