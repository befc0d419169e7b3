//! Line-based lexer with SIMD-accelerated scanning.
//!
//! The lexer splits input into lines for the block parser, yielding exactly
//! the pieces `input.split('\n')` would: an empty input is one empty line and
//! a trailing newline produces a final empty line. It uses `memchr` for fast
//! newline detection (SIMD on supported platforms).
//!
//! - Zero-copy: lines borrow directly from input
//! - CRLF tolerant: a trailing `'\r'` is not part of the line text

use memchr::memchr;

/// A single line from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing newline).
    pub text: &'a str,
    /// 1-based line number.
    pub number: usize,
}

impl<'a> Line<'a> {
    /// Get the line text with leading/trailing whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }
}

/// Line iterator over the parser input.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte offset.
    offset: usize,
    /// Number of lines yielded so far.
    line: usize,
    /// Set once the final (newline-less) piece has been yielded.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 0,
            finished: false,
        }
    }

    /// Read the next line from input.
    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.finished {
            return None;
        }

        let bytes = self.input.as_bytes();
        let start = self.offset;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => {
                self.offset = start + pos + 1;
                start + pos
            }
            None => {
                self.finished = true;
                self.offset = bytes.len();
                bytes.len()
            }
        };

        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.line += 1;
        // `start` follows a '\n' (or is 0) and `text_end` precedes '\r'/'\n'
        // (or is the end), so both are char boundaries.
        Some(Line {
            text: &self.input[start..text_end],
            number: self.line,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    #[inline]
    fn next(&mut self) -> Option<Line<'a>> {
        self.read_line()
    }
}
