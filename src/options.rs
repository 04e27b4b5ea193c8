//! Configuration options for parsing and writing vCards.
//!
//! - [`ParseOptions`]: parser strictness
//! - [`DuplicateParams`]: what to do when a parameter name repeats within one property
//! - [`WriteOptions`]: fold width and the property emitted first
//!
//! ## Examples
//!
//! ```rust
//! use vcard::{Card, DuplicateParams, ParseOptions, Property, WriteOptions, to_string_with_options};
//!
//! let lenient = ParseOptions::new().with_duplicate_params(DuplicateParams::Append);
//! assert_eq!(lenient.duplicate_params, DuplicateParams::Append);
//!
//! let mut card = Card::new();
//! card.add("FN", Property::new("Forrest Gump"));
//!
//! // Fold at 40 bytes per physical line instead of the default 77
//! let options = WriteOptions::new().with_fold_width(40);
//! let text = to_string_with_options(&card, &options);
//! assert!(text.starts_with("BEGIN:VCARD\r\n"));
//! ```

/// Maximum physical line width used when folding, terminator included.
///
/// This leaves 75 content bytes per line, the limit recommended by the vCard format.
pub const DEFAULT_FOLD_WIDTH: usize = 77;

/// The property written first, right after `BEGIN:VCARD`.
pub const DEFAULT_PRIORITY: &str = "VERSION";

/// Policy for a parameter name that appears more than once in a single property.
///
/// # Examples
///
/// ```rust
/// use vcard::{from_str_with_options, DuplicateParams, ParseOptions};
///
/// let input = "BEGIN:VCARD\r\nTEL;TYPE=HOME;TYPE=VOICE:555\r\nEND:VCARD\r\n";
///
/// assert!(from_str_with_options(input, &ParseOptions::new()).is_err());
///
/// let options = ParseOptions::new().with_duplicate_params(DuplicateParams::Append);
/// let cards = from_str_with_options(input, &options).unwrap();
/// assert_eq!(
///     cards[0].get("TEL")[0].param("TYPE").unwrap(),
///     ["HOME".to_string(), "VOICE".to_string()]
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DuplicateParams {
    /// Fail with a "duplicate parameter" syntax error.
    #[default]
    Reject,
    /// Append the later values to the list of the first occurrence.
    Append,
}

/// Configuration for [`Parser`](crate::Parser).
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub duplicate_params: DuplicateParams,
}

impl ParseOptions {
    /// Creates default options (duplicate parameters are rejected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate parameter policy.
    #[must_use]
    pub fn with_duplicate_params(mut self, policy: DuplicateParams) -> Self {
        self.duplicate_params = policy;
        self
    }
}

/// Configuration for [`Serializer`](crate::Serializer).
///
/// # Examples
///
/// ```rust
/// use vcard::WriteOptions;
///
/// let options = WriteOptions::new();
/// assert_eq!(options.fold_width, Some(77));
/// assert_eq!(options.priority.as_deref(), Some("VERSION"));
///
/// let debug = WriteOptions::unfolded();
/// assert_eq!(debug.fold_width, None);
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Physical line width including the two terminator bytes; `None` disables
    /// folding and keeps bare `\n` terminators.
    pub fold_width: Option<usize>,
    /// Property name written before all others, if present in the card.
    pub priority: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            fold_width: Some(DEFAULT_FOLD_WIDTH),
            priority: Some(DEFAULT_PRIORITY.to_string()),
        }
    }
}

impl WriteOptions {
    /// Creates default options (folded at 77 bytes, `VERSION` first).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for unfolded debug output with `\n` line endings.
    #[must_use]
    pub fn unfolded() -> Self {
        WriteOptions {
            fold_width: None,
            ..Default::default()
        }
    }

    /// Sets the fold width, terminator included.
    #[must_use]
    pub fn with_fold_width(mut self, width: usize) -> Self {
        self.fold_width = Some(width);
        self
    }

    /// Sets the property written first. The name is matched case-insensitively.
    #[must_use]
    pub fn with_priority(mut self, name: &str) -> Self {
        self.priority = Some(name.to_ascii_uppercase());
        self
    }

    /// Writes all properties in card order, with no priority property.
    #[must_use]
    pub fn without_priority(mut self) -> Self {
        self.priority = None;
        self
    }
}
