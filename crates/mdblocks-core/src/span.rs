//! Styled text runs, the leaf unit of every text-bearing block.
//!
//! A [`Span`] is a piece of text plus a [`Style`]: five independent flags
//! that may be combined freely (`***x***` yields a span that is both bold and
//! italic). The single-character text `"\n"` is a forced line break.

use crate::ast::CowStr;

/// The text of a forced line break span.
pub const BREAK: &str = "\n";

/// Independent style flags carried by a span.
///
/// # Example
///
/// ```rust
/// use mdblocks_core::span::Style;
///
/// let style = Style::BOLD.with(Style::ITALIC);
/// assert!(style.bold && style.italic);
/// assert!(!style.is_plain());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

impl Style {
    /// No flags set.
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
        code: false,
    };
    pub const BOLD: Style = Style {
        bold: true,
        ..Style::PLAIN
    };
    pub const ITALIC: Style = Style {
        italic: true,
        ..Style::PLAIN
    };
    pub const BOLD_ITALIC: Style = Style {
        bold: true,
        italic: true,
        ..Style::PLAIN
    };
    pub const UNDERLINE: Style = Style {
        underline: true,
        ..Style::PLAIN
    };
    pub const STRIKETHROUGH: Style = Style {
        strikethrough: true,
        ..Style::PLAIN
    };
    pub const CODE: Style = Style {
        code: true,
        ..Style::PLAIN
    };

    /// Union of two flag sets.
    #[inline]
    pub const fn with(self, other: Style) -> Style {
        Style {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            code: self.code || other.code,
        }
    }

    /// True when no flag is set.
    #[inline]
    pub const fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline || self.strikethrough || self.code)
    }

    /// Check a single flag.
    #[inline]
    pub const fn has(&self, flag: Flag) -> bool {
        match flag {
            Flag::Bold => self.bold,
            Flag::Italic => self.italic,
            Flag::Underline => self.underline,
            Flag::Strikethrough => self.strikethrough,
            Flag::Code => self.code,
        }
    }

    /// Iterate the set flags in wrapping order.
    pub fn flags(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

/// A single style flag, used as a renderer dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl Flag {
    /// All flags in the order renderers compose their wrappers
    /// (first listed is applied first, so ends up innermost).
    pub const ALL: [Flag; 5] = [
        Flag::Bold,
        Flag::Italic,
        Flag::Underline,
        Flag::Strikethrough,
        Flag::Code,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Flag::Bold => "bold",
            Flag::Italic => "italic",
            Flag::Underline => "underline",
            Flag::Strikethrough => "strikethrough",
            Flag::Code => "code",
        }
    }
}

/// A run of text with zero or more style flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// Literal text, never empty.
    pub text: CowStr<'a>,
    /// Style flags.
    pub style: Style,
}

impl<'a> Span<'a> {
    #[inline]
    pub fn new(text: impl Into<CowStr<'a>>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// A span with no flags.
    #[inline]
    pub fn plain(text: impl Into<CowStr<'a>>) -> Self {
        Self::new(text, Style::PLAIN)
    }

    /// The forced line break span.
    #[inline]
    pub fn line_break() -> Self {
        Self::plain(BREAK)
    }

    /// Whether this is a forced line break.
    #[inline]
    pub fn is_break(&self) -> bool {
        self.style.is_plain() && self.text == BREAK
    }

    /// Detach from the input buffer.
    pub fn into_owned(self) -> Span<'static> {
        Span {
            text: CowStr::Owned(self.text.into_owned()),
            style: self.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_wrapping_order() {
        let style = Style::CODE.with(Style::BOLD).with(Style::STRIKETHROUGH);
        let flags: Vec<_> = style.flags().collect();
        assert_eq!(flags, vec![Flag::Bold, Flag::Strikethrough, Flag::Code]);
    }

    #[test]
    fn break_span_is_plain_newline() {
        assert!(Span::line_break().is_break());
        assert!(!Span::new("\n", Style::CODE).is_break());
        assert!(!Span::plain("x").is_break());
    }
}
