//! Inline span tokenizer.
//!
//! Tokenization is a fold over an ordered rule list. Each rule owns a regex
//! with one non-greedy capture group and a style. A rule re-splits every
//! fragment that is still unclassified into alternating plain/captured
//! pieces; captured pieces take the rule's style and are settled, so later
//! (lower priority) rules never look inside them. Matching never crosses a
//! newline.
//!
//! Output borrows from the input line.

use std::sync::OnceLock;

use memchr::{memchr, memchr3};
use regex::Regex;

use crate::span::{Span, Style, BREAK};

/// One styling rule of the fold.
struct InlineRule {
    pattern: Regex,
    style: Style,
}

/// Rules in priority order. The last one isolates literal newlines.
const RULE_SOURCES: [(&str, Style); 9] = [
    (r"```(.+?)```", Style::CODE),
    (r"`(.+?)`", Style::CODE),
    (r"\*\*\*(.+?)\*\*\*", Style::BOLD_ITALIC),
    (r"\*\*(.+?)\*\*", Style::BOLD),
    (r"\*(.+?)\*", Style::ITALIC),
    (r"__(.+?)__", Style::UNDERLINE),
    (r"_(.+?)_", Style::ITALIC),
    (r"~~(.+?)~~", Style::STRIKETHROUGH),
    (r"(\n)", Style::PLAIN),
];

fn rules() -> &'static [InlineRule] {
    static RULES: OnceLock<Vec<InlineRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        RULE_SOURCES
            .iter()
            .map(|(source, style)| InlineRule {
                pattern: Regex::new(source).expect("invalid inline rule regex"),
                style: *style,
            })
            .collect()
    })
}

/// Working piece of a line during the fold.
#[derive(Debug, Clone, Copy)]
struct Fragment<'a> {
    text: &'a str,
    style: Style,
    /// Produced by a rule; never re-split.
    settled: bool,
}

impl<'a> Fragment<'a> {
    #[inline]
    fn is_break(&self) -> bool {
        self.settled && self.style.is_plain() && self.text == BREAK
    }

    /// Empty and whitespace-only pieces are dropped, break spans kept.
    #[inline]
    fn is_kept(&self) -> bool {
        self.is_break() || !self.text.trim().is_empty()
    }
}

/// Tokenize one line into styled spans.
///
/// # Example
///
/// ```rust
/// use mdblocks_core::inline::tokenize_inline;
/// use mdblocks_core::span::Style;
///
/// let spans = tokenize_inline("plain **bold** tail");
/// assert_eq!(spans.len(), 3);
/// assert_eq!(spans[1].text, "bold");
/// assert_eq!(spans[1].style, Style::BOLD);
/// ```
pub fn tokenize_inline(line: &str) -> Vec<Span<'_>> {
    if line.is_empty() {
        return Vec::new();
    }

    if !has_delimiters(line) {
        return split_breaks(line);
    }

    let mut fragments = vec![Fragment {
        text: line,
        style: Style::PLAIN,
        settled: false,
    }];

    for rule in rules() {
        fragments = apply_rule(rule, fragments);
    }

    fragments
        .into_iter()
        .filter(Fragment::is_kept)
        .map(|f| Span::new(f.text, f.style))
        .collect()
}

/// Fast check for any styling delimiter byte.
#[inline]
fn has_delimiters(line: &str) -> bool {
    let bytes = line.as_bytes();
    memchr3(b'`', b'*', b'_', bytes).is_some() || memchr(b'~', bytes).is_some()
}

/// No-markup path: plain pieces with break spans between them.
fn split_breaks(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::with_capacity(1);
    for (i, piece) in line.split('\n').enumerate() {
        if i > 0 {
            spans.push(Span::line_break());
        }
        if !piece.trim().is_empty() {
            spans.push(Span::plain(piece));
        }
    }
    spans
}

fn apply_rule<'a>(rule: &InlineRule, fragments: Vec<Fragment<'a>>) -> Vec<Fragment<'a>> {
    let mut out = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        if fragment.settled {
            out.push(fragment);
            continue;
        }

        let text = fragment.text;
        let mut last = 0;
        for caps in rule.pattern.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_plain(&mut out, &text[last..whole.start()]);
            out.push(Fragment {
                text: inner.as_str(),
                style: rule.style,
                settled: true,
            });
            last = whole.end();
        }
        push_plain(&mut out, &text[last..]);
    }

    out
}

#[inline]
fn push_plain<'a>(out: &mut Vec<Fragment<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Fragment {
            text,
            style: Style::PLAIN,
            settled: false,
        });
    }
}

/// First delimiter run left over in plain spans, i.e. markup that did not
/// pair up on its line.
pub(crate) fn stray_delimiter(spans: &[Span<'_>]) -> Option<&'static str> {
    const DELIMITERS: [&str; 4] = ["**", "__", "~~", "`"];

    spans
        .iter()
        .filter(|s| s.style.is_plain())
        .find_map(|s| DELIMITERS.into_iter().find(|d| s.text.contains(d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(line: &str) -> Vec<(String, Style)> {
        tokenize_inline(line)
            .into_iter()
            .map(|s| (s.text.into_owned(), s.style))
            .collect()
    }

    #[test]
    fn plain_line_is_one_span() {
        assert_eq!(styles("hello world"), vec![("hello world".into(), Style::PLAIN)]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(tokenize_inline("").is_empty());
        assert!(tokenize_inline("   ").is_empty());
    }

    #[test]
    fn settled_fragments_are_not_resplit() {
        assert_eq!(styles("`*x*`"), vec![("*x*".into(), Style::CODE)]);
        assert_eq!(styles("**a *b* c**"), vec![("a *b* c".into(), Style::BOLD)]);
    }

    #[test]
    fn triple_backtick_code_wins_over_single() {
        assert_eq!(styles("```a `b` c```"), vec![("a `b` c".into(), Style::CODE)]);
    }

    #[test]
    fn stray_asterisk_stays_literal() {
        assert_eq!(styles("5 * 3"), vec![("5 * 3".into(), Style::PLAIN)]);
    }

    #[test]
    fn embedded_newlines_become_breaks() {
        let spans = tokenize_inline("a\nb **c**");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_ref()).collect();
        assert_eq!(texts, vec!["a", "\n", "b ", "c"]);
        assert!(spans[1].is_break());

        let spans = tokenize_inline("a\nb");
        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_ref()).collect();
        assert_eq!(texts, vec!["a", "\n", "b"]);
    }

    #[test]
    fn stray_delimiter_detection() {
        assert_eq!(stray_delimiter(&tokenize_inline("a **b")), Some("**"));
        assert_eq!(stray_delimiter(&tokenize_inline("a **b**")), None);
    }
}
