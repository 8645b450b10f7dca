//! Markdown-with-math rendering.
//!
//! - [`parser::render`] — split a document into [`DisplayBlock`]s
//! - [`inline::render_inline`] — split a line into [`InlineSpan`]s
//! - [`math::typeset`] — LaTeX subset to Unicode, with [`MalformedMathExpression`] on failure
//!
//! The grammar is deliberately small: ATX headings up to level 3, fenced code,
//! `$$` block math, `$` inline math, bold, italic, code spans, links, lists
//! and blockquotes.

pub mod block;
pub mod inline;
pub mod math;
pub mod parser;

pub use block::{DisplayBlock, InlineSpan, plain_text, spans_text, to_markdown};
pub use inline::render_inline;
pub use math::{MalformedMathExpression, typeset};
pub use parser::render;
