//! Line/column conversion for source text.
//!
//! Columns are counted in UTF-16 code units, which is what LSP clients
//! expect by default.

use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// Maps byte offsets of one file's text to zero-based line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
    text: std::sync::Arc<str>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            text: text.into(),
        }
    }

    /// Number of lines in the text (a trailing newline starts an empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(TextSize::of(&*self.text));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = usize::from(self.line_starts[line]);
        let column = self.text[line_start..usize::from(offset)]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line, column)
    }

    /// Convert a byte range to a span. The end is the node's own end, not adjusted.
    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }

    /// Convert a line/column position back to a byte offset.
    ///
    /// Returns `None` when the line does not exist; columns past the end of
    /// the line clamp to the line end.
    pub fn offset(&self, position: Position) -> Option<TextSize> {
        let line_start = usize::from(*self.line_starts.get(position.line)?);
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .map(|s| usize::from(*s))
            .unwrap_or(self.text.len());

        let mut column = 0;
        for (idx, ch) in self.text[line_start..line_end].char_indices() {
            if column >= position.column || ch == '\n' {
                return Some(TextSize::new((line_start + idx) as u32));
            }
            column += ch.len_utf16();
        }
        Some(TextSize::new(line_end as u32))
    }

    /// Convert a span back to a byte range.
    pub fn range(&self, span: Span) -> Option<TextRange> {
        let start = self.offset(span.start)?;
        let end = self.offset(span.end)?;
        (start <= end).then(|| TextRange::new(start, end))
    }
}
