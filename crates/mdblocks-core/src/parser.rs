//! Single-pass block parser.
//!
//! Lines are classified one at a time against a fixed priority list while a
//! small set of "open" container slots (paragraph, list, quote, code block)
//! accumulate content. Blank lines and block-type changes flush the open
//! containers; an open code block suppresses all other classification until
//! its closing fence. Unterminated constructs are flushed at end of input.

use std::borrow::Cow;
use std::sync::OnceLock;

use log::{debug, trace};
use regex::Regex;

use crate::ast::{
    Block, CodeBlock, Heading, List, ListItem, Paragraph, Quote, DEFAULT_CODE_LANGUAGE,
};
use crate::error::{Diagnostic, Diagnostics};
use crate::inline::{stray_delimiter, tokenize_inline};
use crate::lexer::{Line, Lexer};
use crate::span::Span;

/// Result of parsing with diagnostics.
#[derive(Debug)]
pub struct ParseResult<'a> {
    /// The block tree, identical to what [`parse`] returns.
    pub blocks: Vec<Block<'a>>,
    /// Authoring problems found along the way.
    pub diagnostics: Diagnostics,
}

impl<'a> ParseResult<'a> {
    /// Check if parsing found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse content into blocks.
///
/// Total and deterministic: every string produces a block list.
///
/// ```rust
/// use mdblocks_core::{parse, Block};
///
/// let blocks = parse("# Title\n\nSome **bold** text.");
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(blocks[0], Block::Heading(_)));
/// ```
pub fn parse(input: &str) -> Vec<Block<'_>> {
    Parser::new().parse(input)
}

/// Block parser.
///
/// Stateless between calls: each parse works on fresh state, so one parser
/// can be shared across documents and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    #[inline]
    pub fn new() -> Self {
        Parser
    }

    /// Parse the input into blocks.
    pub fn parse<'a>(&self, input: &'a str) -> Vec<Block<'a>> {
        self.parse_internal(input, false).blocks
    }

    /// Parse and also collect diagnostics. The blocks are identical to
    /// [`Parser::parse`].
    pub fn parse_with_diagnostics<'a>(&self, input: &'a str) -> ParseResult<'a> {
        self.parse_internal(input, true)
    }

    fn parse_internal<'a>(&self, input: &'a str, diagnostics: bool) -> ParseResult<'a> {
        let mut state = BlockState::new(diagnostics);

        for line in Lexer::new(input) {
            state.feed(line);
        }

        state.finish()
    }
}

fn quote_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(>+) ?(.*)$").expect("invalid quote regex"))
}

fn heading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6}) (.*)$").expect("invalid heading regex"))
}

fn deep_heading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{7,}) ").expect("invalid heading regex"))
}

fn ordered_item_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\. (.*)$").expect("invalid ordered item regex"))
}

fn unordered_item_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+] ").expect("invalid unordered item regex"))
}

fn rule_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:- *){3,}|(?:\* *){3,}|(?:_ *){3,})$").expect("invalid rule regex")
    })
}

/// Code block being captured.
struct OpenCode<'a> {
    language: &'a str,
    content: String,
    /// Line of the opening fence.
    line: usize,
}

/// Parser working state: the output plus one slot per open container.
struct BlockState<'a> {
    blocks: Vec<Block<'a>>,
    paragraph: Option<Vec<Span<'a>>>,
    list: Option<List<'a>>,
    quote: Option<Quote<'a>>,
    code: Option<OpenCode<'a>>,
    diagnostics: Option<Diagnostics>,
}

impl<'a> BlockState<'a> {
    fn new(diagnostics: bool) -> Self {
        Self {
            blocks: Vec::with_capacity(16),
            paragraph: None,
            list: None,
            quote: None,
            code: None,
            diagnostics: diagnostics.then(Diagnostics::new),
        }
    }

    fn feed(&mut self, line: Line<'a>) {
        let trimmed = line.trimmed();

        // Blank line
        if trimmed.is_empty() {
            match self.code.as_mut() {
                Some(code) => code.content.push('\n'),
                None => self.close_all(),
            }
            return;
        }

        // Code fence
        if let Some(info) = trimmed.strip_prefix("```") {
            if self.code.is_some() {
                self.close_code();
            } else {
                self.close_all();
                let language = match info.trim() {
                    "" => DEFAULT_CODE_LANGUAGE,
                    lang => lang,
                };
                debug!("line {}: opening code block ({})", line.number, language);
                self.code = Some(OpenCode {
                    language,
                    content: String::new(),
                    line: line.number,
                });
            }
            return;
        }

        // Code content
        if let Some(code) = self.code.as_mut() {
            code.content.push_str(line.text);
            code.content.push('\n');
            return;
        }

        // Quote
        if let Some(caps) = quote_pattern().captures(line.text) {
            let level = caps.get(1).map_or(0, |m| m.len());
            let rest = caps.get(2).map_or("", |m| m.as_str());
            trace!("line {}: quote level {}", line.number, level);

            if self.quote.as_ref().map(|q| q.level) != Some(level) {
                self.close_all();
                debug!("line {}: opening quote (level {})", line.number, level);
                self.quote = Some(Quote {
                    level,
                    blocks: Vec::new(),
                });
            }

            let spans = self.tokenize(rest, line.number);
            if !spans.is_empty() {
                if let Some(quote) = self.quote.as_mut() {
                    quote.blocks.push(Block::Paragraph(Paragraph { spans }));
                }
            }
            return;
        }

        if self.quote.is_some() {
            self.close_quote();
        }

        // Heading
        if let Some(caps) = heading_pattern().captures(trimmed) {
            self.close_all();
            let level = caps.get(1).map_or(1, |m| m.len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str().trim());
            trace!("line {}: heading level {}", line.number, level);
            let spans = self.tokenize(text, line.number);
            self.blocks.push(Block::Heading(Heading { level, spans }));
            return;
        }

        // Ordered list item
        if let Some(caps) = ordered_item_pattern().captures(trimmed) {
            let explicit_number = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            let text = caps.get(2).map_or("", |m| m.as_str().trim());
            self.push_item(true, explicit_number, text, line.number);
            return;
        }

        // Unordered list item
        if unordered_item_pattern().is_match(trimmed) {
            self.push_item(false, None, trimmed[2..].trim(), line.number);
            return;
        }

        // Horizontal rule
        if rule_pattern().is_match(trimmed) {
            trace!("line {}: horizontal rule", line.number);
            self.close_all();
            self.blocks.push(Block::HorizontalRule);
            return;
        }

        // Plain text
        if self.diagnostics.is_some() {
            if let Some(caps) = deep_heading_pattern().captures(trimmed) {
                let hashes = caps.get(1).map_or(0, |m| m.len());
                self.report(Diagnostic::heading_too_deep(hashes, line.number));
            }
        }
        self.close_list();
        let spans = self.tokenize(trimmed, line.number);
        match self.paragraph.as_mut() {
            Some(paragraph) => {
                paragraph.push(Span::line_break());
                paragraph.extend(spans);
            }
            None => self.paragraph = Some(spans),
        }
    }

    fn push_item(&mut self, ordered: bool, explicit_number: Option<u64>, text: &'a str, line: usize) {
        if self.list.as_ref().map(|l| l.ordered) != Some(ordered) {
            self.close_all();
            debug!("line {}: opening list (ordered: {})", line, ordered);
            self.list = Some(List {
                ordered,
                items: Vec::new(),
            });
        }
        self.close_paragraph();

        let spans = self.tokenize(text, line);
        if let Some(list) = self.list.as_mut() {
            list.items.push(ListItem {
                explicit_number,
                spans,
            });
        }
    }

    fn tokenize(&mut self, text: &'a str, line: usize) -> Vec<Span<'a>> {
        let spans = tokenize_inline(text);
        if self.diagnostics.is_some() {
            if let Some(delimiter) = stray_delimiter(&spans) {
                self.report(Diagnostic::unbalanced_delimiter(delimiter, line));
            }
        }
        spans
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.push(diagnostic);
        }
    }

    fn close_paragraph(&mut self) {
        if let Some(spans) = self.paragraph.take() {
            if !spans.is_empty() {
                self.blocks.push(Block::Paragraph(Paragraph { spans }));
            }
        }
    }

    fn close_list(&mut self) {
        if let Some(list) = self.list.take() {
            debug!("closing list ({} items)", list.items.len());
            self.blocks.push(Block::List(list));
        }
    }

    fn close_quote(&mut self) {
        if let Some(quote) = self.quote.take() {
            debug!("closing quote (level {})", quote.level);
            self.blocks.push(Block::Quote(quote));
        }
    }

    fn close_code(&mut self) {
        if let Some(code) = self.code.take() {
            debug!("closing code block ({} bytes)", code.content.len());
            self.blocks.push(Block::Code(CodeBlock {
                language: Cow::Borrowed(code.language),
                content: Cow::Owned(code.content),
            }));
        }
    }

    /// Flush every open container except a code block.
    fn close_all(&mut self) {
        self.close_paragraph();
        self.close_list();
        self.close_quote();
    }

    fn finish(mut self) -> ParseResult<'a> {
        if let Some(code) = self.code.as_ref() {
            let diagnostic = Diagnostic::unclosed_code_fence(code.language, code.line);
            self.report(diagnostic);
        }
        self.close_all();
        self.close_code();

        ParseResult {
            blocks: self.blocks,
            diagnostics: self.diagnostics.unwrap_or_default(),
        }
    }
}
