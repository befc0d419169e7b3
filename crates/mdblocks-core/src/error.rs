//! Non-fatal parse diagnostics.
//!
//! Parsing never fails: malformed markup degrades into plain text. When the
//! caller asks for diagnostics, the parser additionally records the places
//! where that degradation probably surprised the author.

use std::fmt;

use thiserror::Error;

/// Diagnostic kinds for categorizing authoring problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A code fence was still open at end of input.
    UnclosedCodeFence,
    /// Seven or more `#` before a space; rendered as paragraph text.
    HeadingTooDeep,
    /// A styling delimiter that found no partner on its line.
    UnbalancedDelimiter,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnclosedCodeFence => "unclosed-code-fence",
            DiagnosticKind::HeadingTooDeep => "heading-too-deep",
            DiagnosticKind::UnbalancedDelimiter => "unbalanced-delimiter",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning with its source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}")]
pub struct Diagnostic {
    /// Human-readable message.
    pub message: String,
    /// 1-based source line.
    pub line: usize,
    /// Categorization.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// A code fence left open at end of input, reported at its opening line.
    pub fn unclosed_code_fence(language: &str, line: usize) -> Self {
        Self {
            message: format!("unclosed code fence (language: {})", language),
            line,
            kind: DiagnosticKind::UnclosedCodeFence,
        }
    }

    pub fn heading_too_deep(hashes: usize, line: usize) -> Self {
        Self {
            message: format!("heading with {} '#' is deeper than 6, kept as text", hashes),
            line,
            kind: DiagnosticKind::HeadingTooDeep,
        }
    }

    pub fn unbalanced_delimiter(delimiter: &str, line: usize) -> Self {
        Self {
            message: format!("unbalanced '{}'", delimiter),
            line,
            kind: DiagnosticKind::UnbalancedDelimiter,
        }
    }
}

/// Diagnostics collected during one parse, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Count of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
