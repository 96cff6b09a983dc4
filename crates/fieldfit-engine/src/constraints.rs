use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Characters per line must be at least 1")]
    ZeroCharsPerLine,

    #[error("Number of lines must be at least 1")]
    ZeroLines,
}

/// Size limits of a constrained field.
///
/// Both limits are at least 1. Use [`Constraints::new`] to build one from
/// untrusted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub max_chars_per_line: usize,
    pub max_lines: usize,
}

impl Constraints {
    pub fn new(max_chars_per_line: usize, max_lines: usize) -> Result<Self, ConstraintError> {
        if max_chars_per_line == 0 {
            return Err(ConstraintError::ZeroCharsPerLine);
        }
        if max_lines == 0 {
            return Err(ConstraintError::ZeroLines);
        }
        Ok(Self {
            max_chars_per_line,
            max_lines,
        })
    }

    /// Total number of non-break characters the field can hold.
    pub fn char_budget(&self) -> usize {
        self.max_lines.saturating_mul(self.max_chars_per_line)
    }

    /// Message shown in place of the character count when the text does not fit.
    pub fn error_message(&self) -> String {
        format!(
            "This field can only have {} lines with {} characters per line.",
            self.max_lines, self.max_chars_per_line
        )
    }
}
