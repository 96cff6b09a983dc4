//! Character-level text helpers.
//!
//! Every offset and length here counts `char`s, not bytes: a caret offset of
//! 3 means "after the third character" regardless of UTF-8 encoding width.

use std::borrow::Cow;

/// The only line-break form the reflow engine works with.
pub const LINE_BREAK: char = '\n';

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `n`th character, or `s.len()` if `s` is shorter.
#[inline]
pub fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Split `s` after its first `n` characters.
///
/// # Examples
///
/// ```
/// use fieldfit_engine::text::split_at_char;
///
/// assert_eq!(split_at_char("a€bc", 2), ("a€", "bc"));
/// assert_eq!(split_at_char("ab", 5), ("ab", ""));
/// ```
pub fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    s.split_at(byte_offset(s, n))
}

/// Clamp a caret offset to the end of `s`.
pub fn clamp_caret(s: &str, offset: usize) -> usize {
    offset.min(char_len(s))
}

/// Normalize line breaks (CRLF/CR → LF), shifting `caret` so it stays in
/// front of the same character.
///
/// # Examples
///
/// ```
/// use fieldfit_engine::text::normalize_line_breaks;
///
/// assert_eq!(normalize_line_breaks("ab\r\ncd", 5).0, "ab\ncd");
/// assert_eq!(normalize_line_breaks("ab\r\ncd", 5).1, 4);
/// assert_eq!(normalize_line_breaks("ab\rcd", 3), ("ab\ncd".into(), 3));
/// ```
pub fn normalize_line_breaks(text: &str, caret: usize) -> (Cow<'_, str>, usize) {
    if !text.contains('\r') {
        return (Cow::Borrowed(text), caret);
    }

    let mut out = String::with_capacity(text.len());
    let mut caret_out = caret;
    let mut it = text.chars().enumerate().peekable();
    while let Some((i, ch)) = it.next() {
        match ch {
            '\r' => {
                if it.peek().is_some_and(|(_, next)| *next == LINE_BREAK) {
                    // The CR of a CRLF pair is dropped; the LF follows.
                    if i < caret {
                        caret_out -= 1;
                    }
                } else {
                    out.push(LINE_BREAK);
                }
            }
            _ => out.push(ch),
        }
    }
    (Cow::Owned(out), caret_out)
}

/// Remove every line break, giving the content as one line.
///
/// # Examples
///
/// ```
/// use fieldfit_engine::text::strip_line_breaks;
///
/// assert_eq!(strip_line_breaks("abc"), "abc");
/// assert_eq!(strip_line_breaks("ab\ncd\r\nef"), "abcdef");
/// ```
pub fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(LINE_BREAK) && !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .filter(|c| *c != LINE_BREAK && *c != '\r')
            .collect(),
    )
}

/// Number of line breaks among the first `offset` characters of `text`.
pub fn count_line_breaks_before(text: &str, offset: usize) -> usize {
    text.chars()
        .take(offset)
        .filter(|c| *c == LINE_BREAK)
        .count()
}
