//! Error types for vCard parsing and serialization.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: grammar violations (missing markers, malformed
//!   parameters, bad escapes), reported with the logical line number
//! - **Unexpected End**: input ran out where more structure was required. This
//!   is distinct from the source being exhausted cleanly between cards, which
//!   the parser reports as `Ok(None)`
//! - **I/O Errors**: failures of the underlying byte source, passed through
//!   untouched
//!
//! ## Line Numbers
//!
//! Grammar errors carry the 1-based *logical* line (after unfolding) on which
//! the offending property started. Soft-wrapped continuation lines do not
//! advance the count.
//!
//! ## Examples
//!
//! ```rust
//! use vcard::{from_str, Error};
//!
//! let err = from_str("PROP:VALUE\r\nEND:VCARD").unwrap_err();
//! assert!(err.cards.is_empty());
//! assert_eq!(err.error.line(), Some(1));
//! assert!(matches!(err.error, Error::Syntax { .. }));
//! ```

use crate::Card;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing vCards.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the underlying byte source or writer.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Grammar violation.
    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    /// Input ended in the middle of a card.
    #[error("line {line}: {msg}")]
    UnexpectedEof { line: usize, msg: String },
}

impl Error {
    /// Creates a syntax error on the given logical line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vcard::Error;
    ///
    /// let err = Error::syntax(3, "expected ':'");
    /// assert_eq!(err.to_string(), "line 3: expected ':'");
    /// ```
    pub fn syntax(line: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            msg: msg.into(),
        }
    }

    /// Creates an unexpected end-of-input error on the given logical line.
    pub fn unexpected_eof(line: usize, msg: impl Into<String>) -> Self {
        Error::UnexpectedEof {
            line,
            msg: msg.into(),
        }
    }

    /// Returns the logical line of a grammar error, or `None` for I/O errors.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } | Error::UnexpectedEof { line, .. } => Some(*line),
            Error::Io(_) => None,
        }
    }

    /// Returns the error message without the line prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Error::Syntax { msg, .. } | Error::UnexpectedEof { msg, .. } => msg.clone(),
            Error::Io(e) => e.to_string(),
        }
    }

    /// Returns `true` if the error came from the byte source rather than the grammar.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Returns `true` if input ended before the card was complete.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }
}

/// Failure of a batch parse.
///
/// Holds every card parsed successfully before the error, in input order.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PartialParse {
    pub cards: Vec<Card>,
    #[source]
    pub error: Error,
}

impl PartialParse {
    /// Splits the failure into the cards parsed so far and the error.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Card>, Error) {
        (self.cards, self.error)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
