//! Block tree types produced by the parser.
//!
//! The tree is flat by construction: containers are one level deep
//! (a [`List`] holds [`ListItem`]s, a [`Quote`] holds paragraphs) and
//! every text-bearing node holds [`Span`]s.
//!
//! - **Zero-copy**: text uses `Cow<'a, str>` and borrows from the input
//!   except where the parser had to assemble it (code block bodies)
//! - **Value-typed**: nodes have no identity beyond their position

use crate::span::{Span, Style};

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// Language recorded for a code fence without a tag.
pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    /// Run of plain-text lines.
    Paragraph(Paragraph<'a>),
    /// Section heading (levels 1-6).
    Heading(Heading<'a>),
    /// Ordered or unordered list.
    List(List<'a>),
    /// Block quotation at a fixed nesting level.
    Quote(Quote<'a>),
    /// Fenced code block.
    Code(CodeBlock<'a>),
    /// Horizontal rule / thematic break.
    HorizontalRule,
}

/// Fieldless block kind, used to key renderer dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    List,
    ListItem,
    Quote,
    Code,
    HorizontalRule,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Paragraph,
        BlockKind::Heading,
        BlockKind::List,
        BlockKind::ListItem,
        BlockKind::Quote,
        BlockKind::Code,
        BlockKind::HorizontalRule,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading => "heading",
            BlockKind::List => "list",
            BlockKind::ListItem => "list_item",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::HorizontalRule => "horizontal_rule",
        }
    }
}

impl<'a> Block<'a> {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::Heading(_) => BlockKind::Heading,
            Block::List(_) => BlockKind::List,
            Block::Quote(_) => BlockKind::Quote,
            Block::Code(_) => BlockKind::Code,
            Block::HorizontalRule => BlockKind::HorizontalRule,
        }
    }

    /// Spans of a text-bearing block, `None` for containers and rules.
    pub fn spans(&self) -> Option<&[Span<'a>]> {
        match self {
            Block::Paragraph(p) => Some(&p.spans),
            Block::Heading(h) => Some(&h.spans),
            _ => None,
        }
    }

    /// Detach the whole block from the input buffer.
    pub fn into_owned(self) -> Block<'static> {
        match self {
            Block::Paragraph(p) => Block::Paragraph(p.into_owned()),
            Block::Heading(h) => Block::Heading(Heading {
                level: h.level,
                spans: own_spans(h.spans),
            }),
            Block::List(l) => Block::List(List {
                ordered: l.ordered,
                items: l
                    .items
                    .into_iter()
                    .map(|item| ListItem {
                        explicit_number: item.explicit_number,
                        spans: own_spans(item.spans),
                    })
                    .collect(),
            }),
            Block::Quote(q) => Block::Quote(Quote {
                level: q.level,
                blocks: q.blocks.into_iter().map(Block::into_owned).collect(),
            }),
            Block::Code(c) => Block::Code(CodeBlock {
                language: CowStr::Owned(c.language.into_owned()),
                content: CowStr::Owned(c.content.into_owned()),
            }),
            Block::HorizontalRule => Block::HorizontalRule,
        }
    }
}

fn own_spans(spans: Vec<Span<'_>>) -> Vec<Span<'static>> {
    spans.into_iter().map(Span::into_owned).collect()
}

/// Consecutive plain-text lines joined by break spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph<'a> {
    pub spans: Vec<Span<'a>>,
}

impl<'a> Paragraph<'a> {
    pub fn into_owned(self) -> Paragraph<'static> {
        Paragraph {
            spans: own_spans(self.spans),
        }
    }
}

/// Section heading with level and inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    /// Heading level (1-6).
    pub level: u8,
    pub spans: Vec<Span<'a>>,
}

/// A list block. Items never mix formats: a format switch starts a new list.
#[derive(Debug, Clone, PartialEq)]
pub struct List<'a> {
    pub ordered: bool,
    pub items: Vec<ListItem<'a>>,
}

/// A single list item.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<'a> {
    /// Numeral written by the author; only set in ordered lists.
    pub explicit_number: Option<u64>,
    pub spans: Vec<Span<'a>>,
}

/// Block quotation. Nesting is a property, not recursion: `>>x` is one quote
/// with `level == 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote<'a> {
    /// Count of leading `>` markers.
    pub level: usize,
    /// One paragraph per quoted line.
    pub blocks: Vec<Block<'a>>,
}

/// Fenced code block, captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock<'a> {
    /// Language tag, `"plaintext"` when the fence had none.
    pub language: CowStr<'a>,
    /// Raw content; every captured line ends with `'\n'`.
    pub content: CowStr<'a>,
}

impl<'a> CodeBlock<'a> {
    /// The body as a single code-styled span (empty body yields no span).
    pub fn spans(&self) -> Vec<Span<'_>> {
        if self.content.is_empty() {
            Vec::new()
        } else {
            vec![Span::new(self.content.as_ref(), Style::CODE)]
        }
    }
}
