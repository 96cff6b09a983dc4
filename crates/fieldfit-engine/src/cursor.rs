use crate::text::{LINE_BREAK, char_len};

/// A caret position as a line and a column, both counted in characters.
///
/// Converts between the flat caret offset a textarea reports and the
/// row/column view the reflow pass and terminal renderer need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCursor {
    pub row: usize,
    pub col: usize,
}

impl LineCursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Locate a flat caret offset within `text`.
    ///
    /// Offsets past the end clamp to the end of the last line.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut cursor = Self::default();
        for ch in text.chars().take(offset) {
            if ch == LINE_BREAK {
                cursor.row += 1;
                cursor.col = 0;
            } else {
                cursor.col += 1;
            }
        }
        cursor
    }

    /// Flat offset of this position within `lines` joined by line breaks.
    ///
    /// Rows past the end clamp to the end of the last line, and columns clamp
    /// to the end of their line.
    pub fn to_offset<S: AsRef<str>>(&self, lines: &[S]) -> usize {
        let Some(last) = lines.len().checked_sub(1) else {
            return 0;
        };
        let row = self.row.min(last);
        let before: usize = lines[..row]
            .iter()
            .map(|line| char_len(line.as_ref()) + 1)
            .sum();
        let line_len = char_len(lines[row].as_ref());
        let col = if self.row > last {
            line_len
        } else {
            self.col.min(line_len)
        };
        before + col
    }
}
