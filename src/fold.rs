//! Line folding.
//!
//! [`fold`] is the write-side counterpart of [`UnfoldingReader`]: it breaks
//! logical lines so that no physical line exceeds a byte width, inserting
//! `\r\n ` at each break, and converts every `\n` to `\r\n`.
//!
//! Folding never splits a UTF-8 encoded character. It is not a perfect inverse
//! of unfolding: if a logical line already begins with a space or tab (as in
//! `"hello\n world"`), folding keeps that whitespace at the start of the next
//! physical line and unfolding then treats it as a continuation marker.
//!
//! ```rust
//! use vcard::{fold, unfold};
//!
//! let folded = fold("NOTE:I am a rather long string", 12);
//! assert_eq!(folded, "NOTE:I am \r\n a rather \r\n long stri\r\n ng");
//! assert_eq!(unfold(&folded), "NOTE:I am a rather long string");
//! ```

use crate::UnfoldingReader;

/// Folds `text` so that each physical line holds at most `width - 2` bytes
/// before its `\r\n` terminator.
///
/// A lone `\r` is treated as ordinary content and counts toward the width.
#[must_use]
pub fn fold(text: &str, width: usize) -> String {
    let limit = width.saturating_sub(2);
    let mut out = String::with_capacity(text.len() + text.len() / limit.max(1) * 3);
    let mut line_len = 0;
    let mut last_cr = false;

    for ch in text.chars() {
        if last_cr {
            last_cr = false;
            if ch == '\n' {
                out.push_str("\r\n");
                line_len = 0;
                continue;
            }
            push_folded(&mut out, &mut line_len, limit, '\r');
        }
        match ch {
            '\r' => last_cr = true,
            '\n' => {
                out.push_str("\r\n");
                line_len = 0;
            }
            _ => push_folded(&mut out, &mut line_len, limit, ch),
        }
    }
    if last_cr {
        push_folded(&mut out, &mut line_len, limit, '\r');
    }
    out
}

fn push_folded(out: &mut String, line_len: &mut usize, limit: usize, ch: char) {
    if *line_len + ch.len_utf8() > limit {
        out.push_str("\r\n ");
        *line_len = 1;
    }
    out.push(ch);
    *line_len += ch.len_utf8();
}

/// Unfolds `text`: merges continuation lines and normalizes line endings to `\n`.
///
/// This is the string form of [`UnfoldingReader`], convenient for inspecting
/// folded output.
#[must_use]
pub fn unfold(text: &str) -> String {
    let mut bytes = Vec::with_capacity(text.len());
    let mut reader = UnfoldingReader::new(text.as_bytes());
    // A byte slice never reports an error, so `Err` cannot end the loop early.
    while let Ok(Some(b)) = reader.next_byte() {
        bytes.push(b);
    }
    // Only ASCII line endings and whitespace are removed, so the result is
    // valid UTF-8 whenever the input is.
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
