//! Glue between the pure reflow engine and a live text control.
//!
//! [`ConstrainedField`] reads the control once, runs [`reflow`](crate::reflow()),
//! and writes the outcome back once. The control itself is anything that
//! implements [`TextControl`], from a terminal textarea to a test double.

use std::fmt;

use crate::constraints::Constraints;
use crate::layout::Viewport;
use crate::reflow::{FieldStatus, InputSource, LineReflowEngine, ReflowResult};
use crate::text::LINE_BREAK;

/// A text control the formatter can read from and write back to.
pub trait TextControl {
    fn value(&self) -> &str;

    /// Caret offset in characters.
    fn caret(&self) -> usize;

    fn set_value(&mut self, value: String);

    /// Place a collapsed caret (selection start and end both at `offset`).
    fn set_caret(&mut self, offset: usize);

    /// Number of rows the control should allocate.
    fn set_rows(&mut self, rows: usize);

    /// Show the character count or the error message.
    fn set_status(&mut self, status: FieldStatus);

    fn clear_status(&mut self);
}

/// A text field limited to a number of lines and characters per line.
#[derive(Debug, Clone)]
pub struct ConstrainedField {
    engine: LineReflowEngine,
    viewport: Viewport,
    pending_paste: bool,
    focused: bool,
}

impl ConstrainedField {
    pub fn new(constraints: Constraints, viewport: Viewport) -> Self {
        Self {
            engine: LineReflowEngine::new(constraints),
            viewport,
            pending_paste: false,
            focused: false,
        }
    }

    pub fn constraints(&self) -> &Constraints {
        self.engine.constraints()
    }

    /// Replace the limits. Takes effect on the next [`format`](Self::format).
    pub fn update_constraints(&mut self, constraints: Constraints) {
        log::info!(
            "constraints changed to {} lines of {} chars",
            constraints.max_lines,
            constraints.max_chars_per_line
        );
        self.engine = LineReflowEngine::new(constraints);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Mark the next [`format`](Self::format) call as caused by a paste.
    pub fn handle_paste(&mut self) {
        self.pending_paste = true;
    }

    pub fn is_paste_pending(&self) -> bool {
        self.pending_paste
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Losing focus hides any error message.
    pub fn blur(&mut self, control: &mut impl TextControl) {
        self.focused = false;
        control.clear_status();
    }

    /// Reflow the control's text and apply the outcome to it.
    ///
    /// When the text fits, the reflowed text, the caret, the row hint and the
    /// character count are written back. When it does not, the text and caret
    /// are left as the user typed them and only the error message is shown.
    /// A pending paste is consumed either way.
    pub fn format(&mut self, control: &mut impl TextControl) -> ReflowResult {
        let source = if std::mem::take(&mut self.pending_paste) {
            InputSource::Pasted
        } else {
            InputSource::Typed
        };

        let result = self.engine.reflow(control.value(), control.caret(), source);

        if result.valid {
            control.set_value(result.output_text.clone());
            if let Some(caret) = result.new_caret_offset {
                control.set_caret(caret);
            }
            control.set_rows(result.display_rows(&self.viewport));
        } else {
            log::debug!("text does not fit, leaving control untouched");
        }
        control.set_status(result.status.clone());

        result
    }
}

/// The field label is only shown once there is text to label.
pub fn label_visible(value: &str) -> bool {
    !value.is_empty()
}

/// One line of the field as it would be stored in its own column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub index: usize,
    pub content: String,
}

impl fmt::Display for FieldRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {}: {}", self.index, self.content)
    }
}

/// Split `text` into the separate fields its lines would be stored in.
pub fn field_rows(text: &str) -> Vec<FieldRow> {
    text.split(LINE_BREAK)
        .enumerate()
        .map(|(index, line)| FieldRow {
            index,
            content: line.to_string(),
        })
        .collect()
}

/// One `field N: ...` line per row.
pub fn render_field_rows(rows: &[FieldRow]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use pretty_assertions::assert_eq;

    fn field(max_chars_per_line: usize, max_lines: usize) -> ConstrainedField {
        ConstrainedField::new(
            Constraints::new(max_chars_per_line, max_lines).unwrap(),
            Viewport::new(360, 9),
        )
    }

    #[test]
    fn format_writes_back_valid_result() {
        let mut field = field(5, 2);
        let mut control = TextBuffer::new("abcdef");

        let result = field.format(&mut control);

        assert!(result.valid);
        assert_eq!(control.value(), "abcde\nf");
        assert_eq!(control.caret(), 7);
        assert_eq!(control.rows(), 2);
        assert_eq!(control.status().map(ToString::to_string), Some("6/10".into()));
    }

    #[test]
    fn format_leaves_invalid_text_visible() {
        let mut field = field(5, 2);
        let mut control = TextBuffer::new("abcdefghijk");
        control.set_caret(4);

        let result = field.format(&mut control);

        assert!(!result.valid);
        assert_eq!(control.value(), "abcdefghijk");
        assert_eq!(control.caret(), 4);
        assert_eq!(
            control.status().map(ToString::to_string),
            Some("This field can only have 2 lines with 5 characters per line.".into())
        );
    }

    #[test]
    fn field_recovers_on_next_valid_keystroke() {
        let mut field = field(5, 2);
        let mut control = TextBuffer::new("abcdefghijk");
        assert!(!field.format(&mut control).valid);

        control.backspace();
        let result = field.format(&mut control);

        assert!(result.valid);
        assert_eq!(control.value(), "abcde\nfghij");
        assert!(!control.status().unwrap().is_error());
    }

    #[test]
    fn paste_flag_is_consumed_by_one_format() {
        let mut field = field(5, 3);
        let mut control = TextBuffer::default();
        control.insert_str("hello world foo");

        field.handle_paste();
        assert!(field.is_paste_pending());
        field.format(&mut control);
        assert!(!field.is_paste_pending());
        assert_eq!(control.value(), "hello\n worl\nd foo");
        assert_eq!(control.caret(), 17);
    }

    #[test]
    fn paste_flag_is_consumed_even_when_invalid() {
        let mut field = field(2, 1);
        let mut control = TextBuffer::new("abc");
        field.handle_paste();
        assert!(!field.format(&mut control).valid);
        assert!(!field.is_paste_pending());
    }

    #[test]
    fn update_constraints_applies_to_next_format() {
        let mut field = field(5, 2);
        let mut control = TextBuffer::new("abcdefghijk");
        assert!(!field.format(&mut control).valid);

        field.update_constraints(Constraints::new(6, 2).unwrap());
        assert!(field.format(&mut control).valid);
        assert_eq!(control.value(), "abcdef\nghijk");
    }

    #[test]
    fn row_hint_follows_viewport() {
        let mut field = field(20, 2);
        field.set_viewport(Viewport::from_columns(5));
        let mut control = TextBuffer::new("abcdefghijkl");

        field.format(&mut control);

        assert_eq!(control.rows(), 3);
    }

    #[test]
    fn blur_clears_status() {
        let mut field = field(2, 1);
        let mut control = TextBuffer::new("abc");
        field.focus();
        assert!(field.is_focused());
        field.format(&mut control);
        assert!(control.status().is_some());

        field.blur(&mut control);

        assert!(!field.is_focused());
        assert_eq!(control.status(), None);
    }

    #[test]
    fn label_only_for_non_empty_values() {
        assert!(!label_visible(""));
        assert!(label_visible("a"));
    }

    #[test]
    fn field_rows_preview() {
        let rows = field_rows("abcde\nfghij\nk");
        assert_eq!(rows.len(), 3);
        insta::assert_snapshot!(render_field_rows(&rows), @r"
        field 0: abcde
        field 1: fghij
        field 2: k
        ");
    }
}
