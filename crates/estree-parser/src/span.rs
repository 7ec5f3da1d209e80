//! Source location tracking.
//!
//! Every AST node carries a [`Span`] with its byte offsets in the source text
//! and, when location tracking is enabled, a [`SourceLocation`] with
//! 1-based lines and 0-based columns.

use serde::{Deserialize, Serialize};

/// A line/column pair. Lines are 1-based, columns are 0-based byte offsets
/// from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Start and end positions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// A span in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start.
    pub start: u32,
    /// Byte offset of the end (exclusive).
    pub end: u32,
    /// Line/column range, present only when the parser was asked for it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loc: Option<SourceLocation>,
}

impl Span {
    /// Create a new span without line/column information.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end, loc: None }
    }

    /// Create an empty span at a position.
    #[inline]
    pub const fn empty(pos: u32) -> Self {
        Self::new(pos, pos)
    }
}

/// Convert byte offsets to line/column pairs.
///
/// Built once per parse when locations are requested, and on demand when an
/// error needs a position.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build a line index from source code. CRLF counts as one break, and
    /// U+2028/U+2029 terminate lines as they do for the scanner.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        for (i, c) in source.char_indices() {
            match c {
                '\n' => line_starts.push((i + 1) as u32),
                '\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push((i + 1) as u32),
                '\u{2028}' | '\u{2029}' => line_starts.push((i + c.len_utf8()) as u32),
                _ => {}
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a [`Position`] (1-based line, 0-based column).
    pub fn position(&self, offset: u32) -> Position {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        Position::new(line as u32 + 1, offset - self.line_starts[line])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let source = "line1\nline2\r\nline3";
        let index = LineIndex::new(source);

        assert_eq!(index.position(0), Position::new(1, 0));
        assert_eq!(index.position(5), Position::new(1, 5));
        assert_eq!(index.position(6), Position::new(2, 0));
        assert_eq!(index.position(13), Position::new(3, 0));
        assert_eq!(index.position(15), Position::new(3, 2));
    }

    #[test]
    fn test_line_index_unicode_terminators() {
        let index = LineIndex::new("a\u{2028}b");
        assert_eq!(index.position(4), Position::new(2, 0));
    }
}
