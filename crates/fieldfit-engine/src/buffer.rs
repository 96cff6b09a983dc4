//! In-memory text control.
//!
//! Holds what a textarea holds (value, collapsed caret, row count and the
//! status region next to it) and the basic edits a user performs on it.
//! Front ends without a native textarea render from this.

use crate::cursor::LineCursor;
use crate::field::TextControl;
use crate::reflow::FieldStatus;
use crate::text::{LINE_BREAK, byte_offset, char_len, clamp_caret, normalize_line_breaks};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    value: String,
    /// Caret offset in characters
    caret: usize,
    rows: usize,
    status: Option<FieldStatus>,
}

impl TextBuffer {
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        let value = normalize_line_breaks(&value, 0).0.into_owned();
        let caret = char_len(&value);
        Self {
            value,
            caret,
            rows: 1,
            status: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn status(&self) -> Option<&FieldStatus> {
        self.status.as_ref()
    }

    /// Caret as a line and column.
    pub fn cursor(&self) -> LineCursor {
        LineCursor::from_offset(&self.value, self.caret)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.value.split(LINE_BREAK)
    }

    /// Insert `s` at the caret and move the caret past it.
    pub fn insert_str(&mut self, s: &str) {
        let (s, _) = normalize_line_breaks(s, 0);
        let at = byte_offset(&self.value, self.caret);
        self.value.insert_str(at, &s);
        self.caret += char_len(&s);
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = byte_offset(&self.value, self.caret);
        self.value.insert(at, ch);
        self.caret += 1;
    }

    /// Delete the character before the caret. Returns `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        let at = byte_offset(&self.value, self.caret);
        self.value.remove(at);
        true
    }

    /// Delete the character after the caret. Returns `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= char_len(&self.value) {
            return false;
        }
        let at = byte_offset(&self.value, self.caret);
        self.value.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.caret = clamp_caret(&self.value, self.caret + 1);
    }

    pub fn move_up(&mut self) {
        let cursor = self.cursor();
        if cursor.row > 0 {
            self.move_to(LineCursor::new(cursor.row - 1, cursor.col));
        } else {
            self.caret = 0;
        }
    }

    pub fn move_down(&mut self) {
        let cursor = self.cursor();
        self.move_to(LineCursor::new(cursor.row + 1, cursor.col));
    }

    pub fn move_home(&mut self) {
        let cursor = self.cursor();
        self.move_to(LineCursor::new(cursor.row, 0));
    }

    pub fn move_end(&mut self) {
        let cursor = self.cursor();
        self.move_to(LineCursor::new(cursor.row, usize::MAX));
    }

    fn move_to(&mut self, cursor: LineCursor) {
        let lines: Vec<&str> = self.value.split(LINE_BREAK).collect();
        self.caret = cursor.to_offset(&lines);
    }
}

impl TextControl for TextBuffer {
    fn value(&self) -> &str {
        &self.value
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
        self.caret = clamp_caret(&self.value, self.caret);
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = clamp_caret(&self.value, offset);
    }

    fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    fn set_status(&mut self, status: FieldStatus) {
        self.status = Some(status);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
