//! # mdblocks Core
//!
//! A small, deterministic parser for the markdown-like syntax used in CMS
//! rich-text fields, producing a flat block tree of styled spans.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdblocks_core::{parse, to_html, Block};
//!
//! let input = "# Hello World\n\nThis is a **paragraph**.";
//! let blocks = parse(input);
//!
//! assert_eq!(blocks.len(), 2);
//! assert!(to_html(&blocks).contains("<strong>paragraph</strong>"));
//! ```
//!
//! ## Diagnostics
//!
//! Parsing never fails; unrecognized markup becomes plain text. Diagnostics
//! point at the spots where that probably was not what the author meant:
//!
//! ```rust
//! use mdblocks_core::Parser;
//!
//! let result = Parser::new().parse_with_diagnostics("```rust\nfn main() {}");
//!
//! // The code block is still produced, the open fence is reported
//! assert_eq!(result.blocks.len(), 1);
//! assert_eq!(result.diagnostics.len(), 1);
//! ```
//!
//! ## Syntax
//!
//! - Blocks: `#`-headings (1-6), `1.` / `-` `*` `+` lists, `>` quotes,
//!   fenced code, `---` rules, paragraphs
//! - Inline: `***bold italic***`, `**bold**`, `*italic*` / `_italic_`,
//!   `__underline__`, `~~strike~~`, `` `code` ``

pub mod ast;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod span;

pub use ast::{Block, BlockKind, CodeBlock, Heading, List, ListItem, Paragraph, Quote};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics};
pub use inline::tokenize_inline;
pub use parser::{parse, ParseResult, Parser};
pub use render::{to_html, to_html_with, to_plain_text, BlockAttrs, HtmlOptions, Renderer};
pub use span::{Flag, Span, Style};
