//! Display-size hints for the rendered field.
//!
//! These are presentation estimates only. Nothing here feeds back into the
//! reflow verdict or the reflowed text.

use crate::text::char_len;

/// Width available to the field, and the assumed width of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub char_width_px: u32,
}

impl Viewport {
    pub fn new(width_px: u32, char_width_px: u32) -> Self {
        Self {
            width_px,
            char_width_px,
        }
    }

    /// A viewport measured in whole character cells, as terminals are.
    pub fn from_columns(columns: u16) -> Self {
        Self::new(u32::from(columns), 1)
    }

    /// Characters that fit on one visual row before the control soft-wraps.
    ///
    /// Never less than 1, so narrow or unmeasured controls still get a hint.
    pub fn visible_chars_per_line(&self) -> usize {
        let per_line = self.width_px.checked_div(self.char_width_px).unwrap_or(0);
        (per_line as usize).max(1)
    }
}

/// Rows needed to show `lines` when each visual row holds
/// `visible_chars_per_line` characters.
///
/// Each line counts once, plus `len / visible` extra rows when it is longer
/// than a visual row.
pub fn display_rows<S: AsRef<str>>(lines: &[S], visible_chars_per_line: usize) -> usize {
    let visible = visible_chars_per_line.max(1);
    let extra: usize = lines
        .iter()
        .map(|line| char_len(line.as_ref()))
        .filter(|len| *len > visible)
        .map(|len| len / visible)
        .sum();
    lines.len() + extra
}
