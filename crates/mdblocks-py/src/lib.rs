//! Python bindings for the mdblocks parser.

use mdblocks_core::{
    error::Diagnostic as CoreDiagnostic, parse as core_parse, to_html_with, Block as CoreBlock,
    BlockKind, CodeBlock as CoreCodeBlock, Flag, HtmlOptions, ListItem as CoreListItem,
    Parser as CoreParser, Renderer, Span as CoreSpan,
};
use pyo3::prelude::*;

// ============================================================================
// Span
// ============================================================================

/// A run of text with style flags. A break span has text `"\n"`.
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        let flags = self.flag_names();
        if flags.is_empty() {
            format!("Span({:?})", self.text)
        } else {
            format!("Span({:?}, {})", self.text, flags.join("+"))
        }
    }

    /// Names of the set flags, in wrapping order.
    #[getter]
    fn flags(&self) -> Vec<&'static str> {
        self.flag_names()
    }

    #[getter]
    fn is_break(&self) -> bool {
        self.text == "\n" && self.flag_names().is_empty()
    }
}

impl PySpan {
    fn flag_names(&self) -> Vec<&'static str> {
        let set = [
            (Flag::Bold, self.bold),
            (Flag::Italic, self.italic),
            (Flag::Underline, self.underline),
            (Flag::Strikethrough, self.strikethrough),
            (Flag::Code, self.code),
        ];
        set.iter()
            .filter(|(_, on)| *on)
            .map(|(flag, _)| flag.name())
            .collect()
    }
}

impl From<&CoreSpan<'_>> for PySpan {
    fn from(s: &CoreSpan<'_>) -> Self {
        PySpan {
            text: s.text.to_string(),
            bold: s.style.bold,
            italic: s.style.italic,
            underline: s.style.underline,
            strikethrough: s.style.strikethrough,
            code: s.style.code,
        }
    }
}

fn convert_spans(spans: &[CoreSpan<'_>]) -> Vec<PySpan> {
    spans.iter().map(PySpan::from).collect()
}

// ============================================================================
// Block
// ============================================================================

/// A node of the block tree.
///
/// `kind` is one of "paragraph", "heading", "list", "list_item", "quote",
/// "code" or "horizontal_rule". Fields that do not apply to a kind are None.
#[pyclass(frozen, get_all, name = "Block")]
#[derive(Clone)]
pub struct PyBlock {
    pub kind: &'static str,
    /// Heading level (1-6) or quote nesting level.
    pub level: Option<usize>,
    pub ordered: Option<bool>,
    pub explicit_number: Option<u64>,
    pub language: Option<String>,
    /// Verbatim code block body.
    pub content: Option<String>,
    pub spans: Vec<PySpan>,
    /// List items of a list, paragraphs of a quote.
    pub children: Vec<PyBlock>,
}

#[pymethods]
impl PyBlock {
    fn __repr__(&self) -> String {
        match (self.level, &self.language) {
            (Some(level), _) => format!("Block({}, level={})", self.kind, level),
            (None, Some(language)) => format!("Block({}, language={:?})", self.kind, language),
            _ => format!("Block({})", self.kind),
        }
    }

    /// Concatenated span text, breaks included.
    #[getter]
    fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

impl PyBlock {
    fn new(kind: BlockKind) -> Self {
        PyBlock {
            kind: kind.name(),
            level: None,
            ordered: None,
            explicit_number: None,
            language: None,
            content: None,
            spans: Vec::new(),
            children: Vec::new(),
        }
    }
}

fn convert_list_item(item: &CoreListItem<'_>, ordered: bool) -> PyBlock {
    PyBlock {
        ordered: Some(ordered),
        explicit_number: item.explicit_number,
        spans: convert_spans(&item.spans),
        ..PyBlock::new(BlockKind::ListItem)
    }
}

fn convert_code(code: &CoreCodeBlock<'_>) -> PyBlock {
    PyBlock {
        language: Some(code.language.to_string()),
        content: Some(code.content.to_string()),
        spans: convert_spans(&code.spans()),
        ..PyBlock::new(BlockKind::Code)
    }
}

fn convert_block(block: &CoreBlock<'_>) -> PyBlock {
    match block {
        CoreBlock::Paragraph(p) => PyBlock {
            spans: convert_spans(&p.spans),
            ..PyBlock::new(BlockKind::Paragraph)
        },
        CoreBlock::Heading(h) => PyBlock {
            level: Some(h.level as usize),
            spans: convert_spans(&h.spans),
            ..PyBlock::new(BlockKind::Heading)
        },
        CoreBlock::List(l) => PyBlock {
            ordered: Some(l.ordered),
            children: l
                .items
                .iter()
                .map(|item| convert_list_item(item, l.ordered))
                .collect(),
            ..PyBlock::new(BlockKind::List)
        },
        CoreBlock::Quote(q) => PyBlock {
            level: Some(q.level),
            children: q.blocks.iter().map(convert_block).collect(),
            ..PyBlock::new(BlockKind::Quote)
        },
        CoreBlock::Code(c) => convert_code(c),
        CoreBlock::HorizontalRule => PyBlock::new(BlockKind::HorizontalRule),
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// A likely authoring mistake, with its 1-based line.
#[pyclass(frozen, get_all, name = "Diagnostic")]
#[derive(Clone)]
pub struct PyDiagnostic {
    pub kind: &'static str,
    pub message: String,
    pub line: usize,
}

#[pymethods]
impl PyDiagnostic {
    fn __repr__(&self) -> String {
        format!("Diagnostic({}, line={})", self.kind, self.line)
    }

    fn __str__(&self) -> String {
        format!("{} at line {}", self.message, self.line)
    }
}

impl From<&CoreDiagnostic> for PyDiagnostic {
    fn from(d: &CoreDiagnostic) -> Self {
        PyDiagnostic {
            kind: d.kind.as_str(),
            message: d.message.clone(),
            line: d.line,
        }
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Parse content into a list of blocks.
///
/// Args:
///     input: Content string
///
/// Returns:
///     list[Block]: Top-level blocks
#[pyfunction]
#[pyo3(signature = (input), text_signature = "(input)")]
fn parse(input: &str) -> Vec<PyBlock> {
    core_parse(input).iter().map(convert_block).collect()
}

/// Split one line into styled spans.
#[pyfunction]
#[pyo3(signature = (line), text_signature = "(line)")]
fn tokenize_inline(line: &str) -> Vec<PySpan> {
    convert_spans(&mdblocks_core::tokenize_inline(line))
}

/// Render content as HTML.
///
/// Args:
///     input: Content string
///     wrap_document: Optional class for a wrapping <div>
#[pyfunction]
#[pyo3(signature = (input, wrap_document=None), text_signature = "(input, wrap_document=None)")]
fn render_html(input: &str, wrap_document: Option<String>) -> String {
    let options = HtmlOptions {
        wrap_document,
        ..HtmlOptions::default()
    };
    to_html_with(&core_parse(input), &options)
}

/// Re-serialize content into canonical markup.
#[pyfunction]
#[pyo3(signature = (input), text_signature = "(input)")]
fn render_markdown(input: &str) -> String {
    Renderer::markdown().render(&core_parse(input))
}

/// Render content as text without markup.
#[pyfunction]
#[pyo3(signature = (input), text_signature = "(input)")]
fn render_text(input: &str) -> String {
    Renderer::plain_text().render(&core_parse(input))
}

/// Report authoring problems. An empty list means the content is clean.
#[pyfunction]
#[pyo3(signature = (input), text_signature = "(input)")]
fn validate(input: &str) -> Vec<PyDiagnostic> {
    let result = CoreParser::new().parse_with_diagnostics(input);
    result.diagnostics.iter().map(PyDiagnostic::from).collect()
}

// ============================================================================
// Module
// ============================================================================

/// mdblocks - Parser for CMS rich-text markup.
#[pymodule]
fn pymdb(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyBlock>()?;
    m.add_class::<PyDiagnostic>()?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(tokenize_inline, m)?)?;
    m.add_function(wrap_pyfunction!(render_html, m)?)?;
    m.add_function(wrap_pyfunction!(render_markdown, m)?)?;
    m.add_function(wrap_pyfunction!(render_text, m)?)?;
    m.add_function(wrap_pyfunction!(validate, m)?)?;
    Ok(())
}
