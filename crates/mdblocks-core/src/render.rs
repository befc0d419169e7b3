//! Pluggable renderer for block trees.
//!
//! A [`Renderer`] is two dispatch tables: block kind to render function and
//! style flag to wrapping function. Rendering walks the tree depth-first:
//! spans are rendered first (text function, then the flag wrappers in
//! [`Flag::ALL`] order), children are joined, and the block function for the
//! node's kind receives the node's attributes plus its rendered children.
//!
//! Missing entries are not errors: a block without a function passes its
//! children through, a flag without a wrapper leaves text unchanged.
//!
//! Three presets ship with the crate: [`Renderer::html`],
//! [`Renderer::markdown`] and [`Renderer::plain_text`].

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Deserialize;

use crate::ast::{Block, BlockKind, CodeBlock, List, Quote};
use crate::span::{Flag, Span, BREAK};

/// Kind-specific attributes handed to block functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAttrs<'b> {
    Paragraph,
    Heading {
        level: u8,
    },
    List {
        ordered: bool,
    },
    ListItem {
        ordered: bool,
        /// 0-based position in the list.
        index: usize,
        explicit_number: Option<u64>,
    },
    Quote {
        level: usize,
    },
    Code {
        language: &'b str,
    },
    HorizontalRule,
}

impl BlockAttrs<'_> {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockAttrs::Paragraph => BlockKind::Paragraph,
            BlockAttrs::Heading { .. } => BlockKind::Heading,
            BlockAttrs::List { .. } => BlockKind::List,
            BlockAttrs::ListItem { .. } => BlockKind::ListItem,
            BlockAttrs::Quote { .. } => BlockKind::Quote,
            BlockAttrs::Code { .. } => BlockKind::Code,
            BlockAttrs::HorizontalRule => BlockKind::HorizontalRule,
        }
    }
}

/// Renders one block from its attributes and rendered children.
pub type BlockFn<'r> = Box<dyn Fn(&BlockAttrs<'_>, &str) -> String + 'r>;

/// Transforms a piece of text (flag wrappers, escaping).
pub type TextFn<'r> = Box<dyn Fn(&str) -> String + 'r>;

/// Block tree visitor driven by dispatch tables.
///
/// ```rust
/// use mdblocks_core::{parse, BlockKind, Flag, Renderer};
///
/// let renderer = Renderer::new()
///     .on_block(BlockKind::Paragraph, |_, children| format!("[{}]", children))
///     .on_flag(Flag::Bold, |text| text.to_uppercase());
///
/// assert_eq!(renderer.render(&parse("a **b**")), "[a B]");
/// ```
pub struct Renderer<'r> {
    block_fns: HashMap<BlockKind, BlockFn<'r>>,
    span_fns: HashMap<Flag, TextFn<'r>>,
    text_fn: TextFn<'r>,
    break_fn: TextFn<'r>,
    block_separator: String,
    child_separator: String,
}

impl Default for Renderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Renderer<'r> {
    /// Empty tables: text passes through, breaks render as `"\n"`.
    pub fn new() -> Self {
        Self {
            block_fns: HashMap::new(),
            span_fns: HashMap::new(),
            text_fn: Box::new(|text: &str| text.to_string()),
            break_fn: Box::new(|text: &str| text.to_string()),
            block_separator: String::new(),
            child_separator: String::new(),
        }
    }

    /// Register the function for a block kind.
    pub fn on_block<F>(mut self, kind: BlockKind, f: F) -> Self
    where
        F: Fn(&BlockAttrs<'_>, &str) -> String + 'r,
    {
        self.block_fns.insert(kind, Box::new(f));
        self
    }

    /// Register the wrapper for a style flag.
    pub fn on_flag<F>(mut self, flag: Flag, f: F) -> Self
    where
        F: Fn(&str) -> String + 'r,
    {
        self.span_fns.insert(flag, Box::new(f));
        self
    }

    /// Function applied to raw span text (and code bodies) before wrapping.
    pub fn on_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + 'r,
    {
        self.text_fn = Box::new(f);
        self
    }

    /// Function producing the output for a break span (receives `"\n"`).
    pub fn on_break<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + 'r,
    {
        self.break_fn = Box::new(f);
        self
    }

    /// Text placed between top-level blocks.
    pub fn block_separator(mut self, separator: impl Into<String>) -> Self {
        self.block_separator = separator.into();
        self
    }

    /// Text placed between list items and between quoted paragraphs.
    pub fn child_separator(mut self, separator: impl Into<String>) -> Self {
        self.child_separator = separator.into();
        self
    }

    /// Whether a block kind has a function registered.
    pub fn handles(&self, kind: BlockKind) -> bool {
        self.block_fns.contains_key(&kind)
    }

    /// Render a block list.
    pub fn render(&self, blocks: &[Block<'_>]) -> String {
        self.join_blocks(blocks, &self.block_separator)
    }

    /// Render one block.
    pub fn render_block(&self, block: &Block<'_>) -> String {
        match block {
            Block::Paragraph(p) => self.apply(&BlockAttrs::Paragraph, self.render_spans(&p.spans)),
            Block::Heading(h) => self.apply(
                &BlockAttrs::Heading { level: h.level },
                self.render_spans(&h.spans),
            ),
            Block::List(list) => self.render_list(list),
            Block::Quote(quote) => self.render_quote(quote),
            Block::Code(code) => self.render_code(code),
            Block::HorizontalRule => self.apply(&BlockAttrs::HorizontalRule, String::new()),
        }
    }

    /// Render a span sequence.
    pub fn render_spans(&self, spans: &[Span<'_>]) -> String {
        let mut out = String::new();
        for span in spans {
            out.push_str(&self.render_span(span));
        }
        out
    }

    /// Render one span: text function, then each set flag's wrapper.
    pub fn render_span(&self, span: &Span<'_>) -> String {
        if span.is_break() {
            return (self.break_fn)(BREAK);
        }

        let mut text = (self.text_fn)(&span.text);
        for flag in span.style.flags() {
            if let Some(wrap) = self.span_fns.get(&flag) {
                text = wrap(&text);
            }
        }
        text
    }

    fn render_list(&self, list: &List<'_>) -> String {
        let items: Vec<String> = list
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let attrs = BlockAttrs::ListItem {
                    ordered: list.ordered,
                    index,
                    explicit_number: item.explicit_number,
                };
                self.apply(&attrs, self.render_spans(&item.spans))
            })
            .collect();

        self.apply(
            &BlockAttrs::List {
                ordered: list.ordered,
            },
            items.join(&self.child_separator),
        )
    }

    fn render_quote(&self, quote: &Quote<'_>) -> String {
        let children = self.join_blocks(&quote.blocks, &self.child_separator);
        self.apply(&BlockAttrs::Quote { level: quote.level }, children)
    }

    fn render_code(&self, code: &CodeBlock<'_>) -> String {
        let body = (self.text_fn)(&code.content);
        self.apply(
            &BlockAttrs::Code {
                language: &code.language,
            },
            body,
        )
    }

    fn join_blocks(&self, blocks: &[Block<'_>], separator: &str) -> String {
        let rendered: Vec<String> = blocks.iter().map(|b| self.render_block(b)).collect();
        rendered.join(separator)
    }

    fn apply(&self, attrs: &BlockAttrs<'_>, children: String) -> String {
        match self.block_fns.get(&attrs.kind()) {
            Some(f) => f(attrs, &children),
            None => children,
        }
    }
}

// ============================================================================
// HTML preset
// ============================================================================

/// Class names used by the HTML preset. Empty strings emit no attribute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    pub paragraph_class: String,
    pub heading_class: String,
    pub list_class: String,
    pub list_item_class: String,
    pub quote_class: String,
    /// Prefix of the per-level quote class, e.g. `quote-level-2`.
    pub quote_level_prefix: String,
    /// Prefix of the language class on `<code>`, e.g. `language-rust`.
    pub code_language_prefix: String,
    pub rule_class: String,
    /// When set, the whole output is wrapped in `<div class="...">`.
    pub wrap_document: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            paragraph_class: String::new(),
            heading_class: String::new(),
            list_class: String::new(),
            list_item_class: String::new(),
            quote_class: "quote".to_string(),
            quote_level_prefix: "quote-level-".to_string(),
            code_language_prefix: "language-".to_string(),
            rule_class: String::new(),
            wrap_document: None,
        }
    }
}

fn class_attr(classes: &[&str]) -> String {
    let joined: Vec<&str> = classes.iter().copied().filter(|c| !c.is_empty()).collect();
    if joined.is_empty() {
        String::new()
    } else {
        format!(
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(&joined.join(" "))
        )
    }
}

impl<'r> Renderer<'r> {
    /// HTML preset. Text is escaped; breaks become `<br>`.
    pub fn html(options: &'r HtmlOptions) -> Self {
        Renderer::new()
            .on_text(|text| html_escape::encode_text(text).into_owned())
            .on_break(|_| "<br>".to_string())
            .on_flag(Flag::Bold, |t| format!("<strong>{}</strong>", t))
            .on_flag(Flag::Italic, |t| format!("<em>{}</em>", t))
            .on_flag(Flag::Underline, |t| format!("<u>{}</u>", t))
            .on_flag(Flag::Strikethrough, |t| format!("<s>{}</s>", t))
            .on_flag(Flag::Code, |t| format!("<code>{}</code>", t))
            .on_block(BlockKind::Paragraph, move |_, children| {
                format!("<p{}>{}</p>", class_attr(&[options.paragraph_class.as_str()]), children)
            })
            .on_block(BlockKind::Heading, move |attrs, children| {
                let level = match attrs {
                    BlockAttrs::Heading { level } => *level,
                    _ => 1,
                };
                format!(
                    "<h{level}{}>{}</h{level}>",
                    class_attr(&[options.heading_class.as_str()]),
                    children
                )
            })
            .on_block(BlockKind::List, move |attrs, children| {
                let tag = match attrs {
                    BlockAttrs::List { ordered: true } => "ol",
                    _ => "ul",
                };
                format!(
                    "<{tag}{}>\n{}\n</{tag}>",
                    class_attr(&[options.list_class.as_str()]),
                    children
                )
            })
            .on_block(BlockKind::ListItem, move |attrs, children| {
                let value = match attrs {
                    BlockAttrs::ListItem {
                        ordered: true,
                        explicit_number: Some(n),
                        ..
                    } => format!(" value=\"{}\"", n),
                    _ => String::new(),
                };
                format!(
                    "<li{}{}>{}</li>",
                    class_attr(&[options.list_item_class.as_str()]),
                    value,
                    children
                )
            })
            .on_block(BlockKind::Quote, move |attrs, children| {
                let level = match attrs {
                    BlockAttrs::Quote { level } => *level,
                    _ => 1,
                };
                let level_class = format!("{}{}", options.quote_level_prefix, level);
                format!(
                    "<blockquote{}>\n{}\n</blockquote>",
                    class_attr(&[options.quote_class.as_str(), level_class.as_str()]),
                    children
                )
            })
            .on_block(BlockKind::Code, move |attrs, children| {
                let language = match attrs {
                    BlockAttrs::Code { language } => *language,
                    _ => "",
                };
                let language_class = format!("{}{}", options.code_language_prefix, language);
                format!(
                    "<pre><code{}>{}</code></pre>",
                    class_attr(&[language_class.as_str()]),
                    children
                )
            })
            .on_block(BlockKind::HorizontalRule, move |_, _| {
                format!("<hr{}>", class_attr(&[options.rule_class.as_str()]))
            })
            .block_separator("\n")
            .child_separator("\n")
    }

    /// Markdown preset: re-serializes a tree into the authoring syntax.
    pub fn markdown() -> Self {
        Renderer::new()
            .on_flag(Flag::Bold, |t| format!("**{}**", t))
            .on_flag(Flag::Italic, |t| format!("*{}*", t))
            .on_flag(Flag::Underline, |t| format!("__{}__", t))
            .on_flag(Flag::Strikethrough, |t| format!("~~{}~~", t))
            .on_flag(Flag::Code, |t| format!("`{}`", t))
            .on_block(BlockKind::Heading, |attrs, children| {
                let level = match attrs {
                    BlockAttrs::Heading { level } => *level as usize,
                    _ => 1,
                };
                format!("{} {}", "#".repeat(level), children)
            })
            .on_block(BlockKind::ListItem, |attrs, children| match attrs {
                BlockAttrs::ListItem {
                    ordered: true,
                    index,
                    explicit_number,
                } => {
                    let n = explicit_number.unwrap_or(*index as u64 + 1);
                    format!("{}. {}", n, children)
                }
                _ => format!("- {}", children),
            })
            .on_block(BlockKind::Quote, |attrs, children| {
                let level = match attrs {
                    BlockAttrs::Quote { level } => *level,
                    _ => 1,
                };
                let marker = ">".repeat(level);
                let mut out = String::new();
                for (i, line) in children.split('\n').enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    // Writing to a String cannot fail.
                    let _ = write!(out, "{} {}", marker, line);
                }
                out
            })
            .on_block(BlockKind::Code, |attrs, children| {
                let language = match attrs {
                    BlockAttrs::Code { language } => *language,
                    _ => "",
                };
                format!("```{}\n{}```", language, children)
            })
            .on_block(BlockKind::HorizontalRule, |_, _| "---".to_string())
            .block_separator("\n\n")
            .child_separator("\n")
    }

    /// Plain-text preset: no markup, blocks separated by blank lines.
    pub fn plain_text() -> Self {
        Renderer::new()
            .on_block(BlockKind::Code, |_, children| {
                children.trim_end_matches('\n').to_string()
            })
            .block_separator("\n\n")
            .child_separator("\n")
    }
}

/// Render blocks as HTML with default options.
pub fn to_html(blocks: &[Block<'_>]) -> String {
    to_html_with(blocks, &HtmlOptions::default())
}

/// Render blocks as HTML, honoring [`HtmlOptions::wrap_document`].
pub fn to_html_with(blocks: &[Block<'_>], options: &HtmlOptions) -> String {
    let body = Renderer::html(options).render(blocks);
    match &options.wrap_document {
        Some(class) => format!("<div{}>\n{}\n</div>", class_attr(&[class.as_str()]), body),
        None => body,
    }
}

/// Render blocks as text without markup.
pub fn to_plain_text(blocks: &[Block<'_>]) -> String {
    Renderer::plain_text().render(blocks)
}
