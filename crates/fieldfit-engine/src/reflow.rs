//! Line reflow: pushes overflowing characters onto following lines until
//! every line fits the per-line limit, while keeping the caret on the
//! character the user was editing.
//!
//! ## Algorithm
//!
//! 1. Normalize line breaks and split the text into lines.
//! 2. Walk the lines by index. Whenever a line is longer than
//!    `max_chars_per_line`, its tail is prepended to the next line
//!    (appending an empty line first if there is none) and the line is cut
//!    to the limit. The walk re-reads the number of lines on every step, so
//!    a tail that makes the next line too long is pushed again when that
//!    line's turn comes.
//! 3. The result is valid iff it has at most `max_lines` lines and at most
//!    `max_lines × max_chars_per_line` non-break characters.
//!
//! ## Caret correction
//!
//! Typed input uses the incremental rule: if a push leaves a freshly
//! inserted line break directly in front of the caret, the caret moves one
//! to the right so it stays after the character that was just typed.
//!
//! Pasted text may cascade over several lines, so the caret's row and column
//! are followed through every push instead, and the correction is the
//! number of line breaks in front of the caret afterwards minus the number
//! before.

use std::fmt;

use serde::Serialize;

use crate::constraints::Constraints;
use crate::cursor::LineCursor;
use crate::layout::{Viewport, display_rows};
use crate::text::{
    LINE_BREAK, char_len, clamp_caret, count_line_breaks_before, normalize_line_breaks,
    split_at_char, strip_line_breaks,
};

/// What triggered a formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Keystrokes and other single edits
    #[default]
    Typed,
    /// A clipboard paste, which may push text across many lines at once
    Pasted,
}

/// What the status region next to the field shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldStatus {
    /// Characters used out of the budget, shown as `used/budget`
    Count { used: usize, budget: usize },
    /// The text does not fit; the count is replaced by this message
    Overflow { message: String },
}

impl FieldStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, FieldStatus::Overflow { .. })
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStatus::Count { used, budget } => write!(f, "{used}/{budget}"),
            FieldStatus::Overflow { message } => f.write_str(message),
        }
    }
}

/// Outcome of one reflow pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflowResult {
    /// Reflowed lines joined by `\n`. When invalid this is the attempted
    /// layout and should not be written back to the field.
    pub output_text: String,
    /// The reflowed lines
    pub lines: Vec<String>,
    /// How far the caret moves; `None` means the caret must not be restored
    pub caret_correction: Option<isize>,
    /// Caret offset in `output_text`; `None` when invalid
    pub new_caret_offset: Option<usize>,
    pub valid: bool,
    /// Characters in the text, line breaks excluded
    pub total_character_count: usize,
    pub status: FieldStatus,
}

impl ReflowResult {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Rows the rendered control needs to show the text without scrolling,
    /// including rows taken by soft-wrapped long lines.
    pub fn display_rows(&self, viewport: &Viewport) -> usize {
        display_rows(&self.lines, viewport.visible_chars_per_line())
    }
}

/// Reflow engine bound to one set of constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReflowEngine {
    constraints: Constraints,
}

impl LineReflowEngine {
    pub fn new(constraints: Constraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn reflow(&self, text: &str, caret_offset: usize, source: InputSource) -> ReflowResult {
        reflow(text, caret_offset, &self.constraints, source)
    }
}

/// Reflow `text` to fit `constraints`, tracking the caret at `caret_offset`.
///
/// Pure: reads nothing but its arguments and never panics. Offsets are in
/// characters; a caret past the end of `text` is treated as being at the end.
pub fn reflow(
    text: &str,
    caret_offset: usize,
    constraints: &Constraints,
    source: InputSource,
) -> ReflowResult {
    let (text, caret) = normalize_line_breaks(text, caret_offset);
    let caret = clamp_caret(&text, caret);
    let limit = constraints.max_chars_per_line;

    let mut lines: Vec<String> = text.split(LINE_BREAK).map(str::to_owned).collect();
    let total_character_count = char_len(&strip_line_breaks(&text));

    let mut tracked = LineCursor::from_offset(&text, caret);
    let mut typed_correction: isize = 0;

    // `lines` grows while it is walked, so the bound is re-read every step
    let mut row = 0;
    while row < lines.len() {
        if char_len(&lines[row]) > limit {
            if row + 1 == lines.len() {
                lines.push(String::new());
            }

            let (kept, overflow) = split_at_char(&lines[row], limit);
            let (kept, overflow) = (kept.to_owned(), overflow.to_owned());
            let overflow_len = char_len(&overflow);
            log::trace!("pushing {overflow_len} chars from line {row} to line {}", row + 1);

            lines[row + 1].insert_str(0, &overflow);
            lines[row] = kept;

            if tracked.row == row && tracked.col > limit {
                tracked = LineCursor::new(row + 1, tracked.col - limit);
            } else if tracked.row == row + 1 {
                tracked.col += overflow_len;
            }

            if break_inserted_before(&lines, row, caret) {
                typed_correction = 1;
            }
        }
        row += 1;
    }

    let output_text = lines.join("\n");
    let valid = lines.len() <= constraints.max_lines
        && total_character_count <= constraints.char_budget();

    log::debug!(
        "reflow: {} lines, {} chars, valid={valid}",
        lines.len(),
        total_character_count
    );

    if !valid {
        return ReflowResult {
            output_text,
            lines,
            caret_correction: None,
            new_caret_offset: None,
            valid,
            total_character_count,
            status: FieldStatus::Overflow {
                message: constraints.error_message(),
            },
        };
    }

    let correction = match source {
        InputSource::Typed => typed_correction,
        InputSource::Pasted => {
            tracked.row as isize - count_line_breaks_before(&text, caret) as isize
        }
    };
    let new_caret_offset = caret
        .checked_add_signed(correction)
        .unwrap_or(0)
        .min(char_len(&output_text));

    ReflowResult {
        output_text,
        lines,
        caret_correction: Some(correction),
        new_caret_offset: Some(new_caret_offset),
        valid,
        total_character_count,
        status: FieldStatus::Count {
            used: total_character_count,
            budget: constraints.char_budget(),
        },
    }
}

/// True if the break right after `row` sits directly in front of `caret`.
fn break_inserted_before(lines: &[String], row: usize, caret: usize) -> bool {
    let Some(before_caret) = caret.checked_sub(1) else {
        return false;
    };
    let break_offset = lines[..=row]
        .iter()
        .map(|line| char_len(line))
        .sum::<usize>()
        + row;
    before_caret == break_offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn limits(max_chars_per_line: usize, max_lines: usize) -> Constraints {
        Constraints::new(max_chars_per_line, max_lines).unwrap()
    }

    #[test]
    fn fits_exactly_on_two_lines() {
        let result = reflow("abcdefghij", 0, &limits(5, 2), InputSource::Typed);
        assert!(result.valid);
        assert_eq!(result.output_text, "abcde\nfghij");
        assert_eq!(result.total_character_count, 10);
        assert_eq!(
            result.status,
            FieldStatus::Count {
                used: 10,
                budget: 10
            }
        );
        assert_eq!(result.status.to_string(), "10/10");
    }

    #[test]
    fn one_char_too_many_is_rejected() {
        let result = reflow("abcdefghijk", 11, &limits(5, 2), InputSource::Typed);
        assert!(!result.valid);
        assert_eq!(result.output_text, "abcde\nfghij\nk");
        assert_eq!(result.caret_correction, None);
        assert_eq!(result.new_caret_offset, None);
        assert!(result.status.is_error());
        assert_eq!(
            result.status.to_string(),
            "This field can only have 2 lines with 5 characters per line."
        );
    }

    #[test]
    fn too_many_short_lines_is_rejected() {
        let result = reflow("a\nb\nc", 0, &limits(5, 2), InputSource::Typed);
        assert!(!result.valid);
        assert_eq!(result.output_text, "a\nb\nc");
    }

    #[test]
    fn empty_text_is_valid() {
        let result = reflow("", 0, &limits(1, 1), InputSource::Typed);
        assert!(result.valid);
        assert_eq!(result.output_text, "");
        assert_eq!(result.lines, vec![String::new()]);
        assert_eq!(result.new_caret_offset, Some(0));
    }

    #[test]
    fn caret_follows_typed_char_past_inserted_break() {
        let result = reflow("abcdef", 6, &limits(5, 3), InputSource::Typed);
        assert_eq!(result.output_text, "abcde\nf");
        assert_eq!(result.caret_correction, Some(1));
        assert_eq!(result.new_caret_offset, Some(7));
    }

    #[test]
    fn typing_at_end_of_full_line_moves_char_to_next_line() {
        // "abcde" was full, the user typed "x" after it
        let result = reflow("abcdex\nfgh", 6, &limits(5, 3), InputSource::Typed);
        assert_eq!(result.output_text, "abcde\nxfgh");
        assert_eq!(result.new_caret_offset, Some(7));
    }

    #[test]
    fn caret_at_split_point_stays_on_line() {
        // The user typed "e" and the overflow "f" was already there
        let result = reflow("abcdef", 5, &limits(5, 3), InputSource::Typed);
        assert_eq!(result.output_text, "abcde\nf");
        assert_eq!(result.new_caret_offset, Some(5));
    }

    #[test]
    fn caret_before_overflow_is_untouched() {
        let result = reflow("abcdefg", 2, &limits(5, 3), InputSource::Typed);
        assert_eq!(result.output_text, "abcde\nfg");
        assert_eq!(result.caret_correction, Some(0));
        assert_eq!(result.new_caret_offset, Some(2));
    }

    #[test]
    fn cascading_overflow_in_one_pass() {
        let result = reflow("abcdef", 0, &limits(2, 3), InputSource::Typed);
        assert!(result.valid);
        assert_eq!(result.output_text, "ab\ncd\nef");
    }

    #[test]
    fn cascade_merges_into_existing_lines() {
        let result = reflow("abcdefg\nhi\n", 0, &limits(4, 4), InputSource::Typed);
        assert_eq!(result.lines, vec!["abcd", "efgh", "i"]);
        assert!(result.valid);
    }

    #[test]
    fn paste_correction_counts_all_inserted_breaks() {
        let text = "hello world foo";
        let result = reflow(text, 15, &limits(5, 3), InputSource::Pasted);
        assert_eq!(result.output_text, "hello\n worl\nd foo");
        assert_eq!(result.caret_correction, Some(2));
        assert_eq!(result.new_caret_offset, Some(17));

        // Typed rule only sees breaks directly in front of the caret
        let typed = reflow(text, 15, &limits(5, 3), InputSource::Typed);
        assert_eq!(typed.caret_correction, Some(0));
    }

    #[test]
    fn paste_in_middle_keeps_caret_on_same_character() {
        // "XYZ" pasted into "ab|cd" giving "abXYZ|cd"
        let result = reflow("abXYZcd", 5, &limits(3, 3), InputSource::Pasted);
        assert_eq!(result.output_text, "abX\nYZc\nd");
        let caret = result.new_caret_offset.unwrap();
        assert_eq!(&result.output_text[..caret], "abX\nYZ");
    }

    #[test]
    fn paste_without_overflow_leaves_caret() {
        let result = reflow("ab\ncd", 5, &limits(5, 3), InputSource::Pasted);
        assert_eq!(result.caret_correction, Some(0));
        assert_eq!(result.new_caret_offset, Some(5));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let result = reflow("abc\r\ndefgh", 10, &limits(3, 4), InputSource::Pasted);
        assert_eq!(result.output_text, "abc\ndef\ngh");
        assert_eq!(result.new_caret_offset, Some(10));
    }

    #[test]
    fn caret_past_end_is_clamped() {
        let result = reflow("abc", 99, &limits(5, 1), InputSource::Typed);
        assert_eq!(result.new_caret_offset, Some(3));
    }

    #[test]
    fn multibyte_characters_count_as_one() {
        let result = reflow("ééééé€", 6, &limits(5, 2), InputSource::Typed);
        assert!(result.valid);
        assert_eq!(result.output_text, "ééééé\n€");
        assert_eq!(result.total_character_count, 6);
        assert_eq!(result.new_caret_offset, Some(7));
    }

    #[rstest]
    #[case("", 0)]
    #[case("abc", 3)]
    #[case("ab\ncd", 4)]
    #[case("ab\n\ncd\n", 4)]
    fn character_count_excludes_breaks(#[case] text: &str, #[case] expected: usize) {
        let result = reflow(text, 0, &limits(10, 10), InputSource::Typed);
        assert_eq!(result.total_character_count, expected);
    }

    #[rstest]
    #[case(InputSource::Typed)]
    #[case(InputSource::Pasted)]
    fn engine_delegates_to_reflow(#[case] source: InputSource) {
        let engine = LineReflowEngine::new(limits(5, 2));
        assert_eq!(
            engine.reflow("abcdefghij", 10, source),
            reflow("abcdefghij", 10, &limits(5, 2), source)
        );
    }

    #[test]
    fn display_rows_counts_soft_wrapped_rows() {
        let result = reflow("abcdefghij\nab", 0, &limits(10, 2), InputSource::Typed);
        let viewport = Viewport::new(36, 9);
        assert_eq!(viewport.visible_chars_per_line(), 4);
        // "abcdefghij" needs 2 extra rows at 4 visible chars
        assert_eq!(result.display_rows(&viewport), 4);
    }
}
