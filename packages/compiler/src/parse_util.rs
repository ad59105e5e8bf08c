//! Parse Utilities
//!
//! Source spans, diagnostics and line/column lookup shared by the markup
//! parser, the template parser and the expression boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chars;

/// Half-open byte range `[start, end)` in the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        SourceSpan { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span by `offset` bytes.
    pub fn offset_by(&self, offset: usize) -> SourceSpan {
        SourceSpan::new(self.start + offset, self.end + offset)
    }

    /// The text covered by this span, or an empty string if the span is out of range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A compile-time message anchored to an absolute source range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(start: usize, end: usize, message: impl Into<String>) -> Self {
        Diagnostic { start, end, message: message.into() }
    }

    pub fn at(span: SourceSpan, message: impl Into<String>) -> Self {
        Diagnostic::new(span.start, span.end, message)
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.end)
    }

    /// Rebase a diagnostic reported relative to an embedded segment.
    pub fn offset_by(&self, offset: usize) -> Diagnostic {
        Diagnostic::new(self.start + offset, self.end + offset, self.message.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) {}", self.start, self.end, self.message)
    }
}

/// Zero-based line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub content: String,
    pub url: String,
}

impl SourceFile {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        SourceFile { content: content.into(), url: url.into() }
    }

    pub fn location(&self, offset: usize) -> ParseLocation {
        let offset = offset.min(self.content.len());
        let mut line = 0;
        let mut col = 0;
        for (index, ch) in self.content.char_indices() {
            if index >= offset {
                break;
            }
            if ch == chars::LF {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        ParseLocation { offset, line, col }
    }

    fn line_text(&self, line: usize) -> &str {
        self.content.lines().nth(line).unwrap_or("")
    }

    /// Render a diagnostic as `url:line:col: error: message` followed by the
    /// offending source line and a caret marker.
    pub fn describe(&self, diagnostic: &Diagnostic) -> String {
        let start = self.location(diagnostic.start);
        let end = self.location(diagnostic.end.max(diagnostic.start));
        let text = self.line_text(start.line);
        let width = if end.line == start.line {
            (end.col - start.col).max(1)
        } else {
            text.chars().count().saturating_sub(start.col).max(1)
        };
        format!(
            "{}:{}:{}: error: {}\n    {}\n    {}{}",
            self.url,
            start.line + 1,
            start.col + 1,
            diagnostic.message,
            text,
            " ".repeat(start.col),
            "^".repeat(width)
        )
    }
}
