//! Byte offsets and spans over tokenized text.
//!
//! Lexing tracks raw offsets only. Hosts that want lines and columns derive
//! them from the span and the input.

use std::fmt;
use std::ops::Range;

/// A byte offset into the tokenized text.
pub type TextPos = usize;

/// The half-open byte range `start..start + length` covered by a lexeme.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: usize,
}

impl TextSpan {
    #[inline]
    pub const fn new(start: TextPos, length: usize) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset.
    #[inline]
    pub const fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether `next` starts exactly where this span ends.
    #[inline]
    pub const fn is_followed_by(&self, next: &TextSpan) -> bool {
        self.end() == next.start
    }

    /// The text under this span, or `None` if it is out of bounds or
    /// splits a character.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end())
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl From<TextSpan> for Range<usize> {
    fn from(span: TextSpan) -> Self {
        span.start..span.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        let span = TextSpan::new(3, 4);
        assert_eq!(span.end(), 7);
        assert!(!span.is_empty());
        assert!(TextSpan::new(7, 0).is_empty());
        assert_eq!(Range::from(span), 3..7);
        assert_eq!(format!("{span:?}"), "3..7");
    }

    #[test]
    fn test_span_adjacency() {
        let tag = TextSpan::new(1, 3);
        assert!(tag.is_followed_by(&TextSpan::new(4, 1)));
        assert!(!tag.is_followed_by(&TextSpan::new(5, 1)));
    }

    #[test]
    fn test_span_slice() {
        let text = "<é>";
        assert_eq!(TextSpan::new(1, 2).slice(text), Some("é"));
        assert_eq!(TextSpan::new(1, 1).slice(text), None);
        assert_eq!(TextSpan::new(3, 2).slice(text), None);
    }
}
