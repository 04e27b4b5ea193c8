//! # vcard
//!
//! A streaming parser and serializer for the vCard personal-data format.
//!
//! ## What is handled
//!
//! vCard is a line-oriented, property-based text format:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! item1.TEL;TYPE=WORK,VOICE:(111) 555-1212
//! LABEL;TYPE=HOME:42 Plantation St.\nBaytown\, LA 30314
//! END:VCARD
//! ```
//!
//! Long lines may be folded onto several physical lines, each continuation
//! starting with a space or tab. Folds can land anywhere, even inside a property
//! name, so this crate unfolds the raw bytes before tokenizing them.
//!
//! This crate covers the generic grammar: groups, parameters with multiple
//! values, properties with multiple values and multiple occurrences, value
//! escaping, and line folding. It does not interpret what individual properties
//! mean.
//!
//! ## Key Features
//!
//! - **Streaming**: cards are parsed from any [`std::io::Read`] with one byte of lookahead
//! - **Precise errors**: every grammar error carries the logical line number
//! - **Ordered model**: occurrences of a property keep their input order
//! - **Symmetric writer**: output is escaped and folded to 75 bytes per line
//!
//! ## Quick Start
//!
//! ```rust
//! use vcard::{from_str, to_string};
//!
//! let input = "BEGIN:VCARD\r\n\
//!              VERSION:3.0\r\n\
//!              FN:Forrest Gump\r\n\
//!              TEL;TYPE=WORK,VOICE:(111) 555-1212\r\n\
//!              END:VCARD\r\n";
//!
//! let cards = from_str(input).unwrap();
//! let tel = &cards[0].get("tel")[0];
//! assert_eq!(tel.param("type").unwrap(), ["WORK", "VOICE"]);
//! assert_eq!(tel.value(), "(111) 555-1212");
//!
//! assert_eq!(to_string(&cards[0]), input);
//! ```
//!
//! ### Reading card by card
//!
//! ```rust
//! use vcard::Parser;
//!
//! let input = "BEGIN:VCARD\nFN:A\nEND:VCARD\nBEGIN:VCARD\nFN:B\nEND:VCARD\n";
//! let names: Vec<String> = Parser::new(input.as_bytes())
//!     .map(|card| card.unwrap().get("FN")[0].value().to_string())
//!     .collect();
//! assert_eq!(names, ["A", "B"]);
//! ```
//!
//! ## Errors
//!
//! A batch parse that fails keeps the cards read before the failure:
//!
//! ```rust
//! use vcard::from_str;
//!
//! let input = "BEGIN:VCARD\r\nFN:A\r\nEND:VCARD\r\nBEGIN:VCARD\r\nFN;:B\r\n";
//! let err = from_str(input).unwrap_err();
//! assert_eq!(err.cards.len(), 1);
//! assert_eq!(err.error.to_string(), "line 5: expected parameter name");
//! ```
//!
//! ## Logging
//!
//! Parse progress is reported through [`tracing`] at `debug` and `trace` level.
//! The library never installs a subscriber.

pub mod card;
pub mod de;
pub mod error;
pub mod fold;
pub mod options;
pub mod ser;
pub mod unfold;

pub use card::{Card, Property};
pub use de::{parse_all, parse_all_with_options, Parser};
pub use error::{Error, PartialParse, Result};
pub use fold::{fold, unfold};
pub use options::{DuplicateParams, ParseOptions, WriteOptions, DEFAULT_FOLD_WIDTH};
pub use ser::Serializer;
pub use unfold::UnfoldingReader;

use std::io;

/// Serializes a card to folded, wire-ready vCard text.
///
/// # Examples
///
/// ```rust
/// use vcard::{to_string, Card, Property};
///
/// let mut card = Card::new();
/// card.add("FN", Property::new("Alice"));
/// assert_eq!(to_string(&card), "BEGIN:VCARD\r\nFN:Alice\r\nEND:VCARD\r\n");
/// ```
#[must_use]
pub fn to_string(card: &Card) -> String {
    to_string_with_options(card, &WriteOptions::default())
}

/// Serializes a card without folding, using `\n` line endings.
///
/// Meant for debugging and tests; use [`to_string`] for output that other
/// vCard implementations will read.
#[must_use]
pub fn to_string_unfolded(card: &Card) -> String {
    to_string_with_options(card, &WriteOptions::unfolded())
}

/// Serializes a card with custom options.
#[must_use]
pub fn to_string_with_options(card: &Card, options: &WriteOptions) -> String {
    let mut serializer = Serializer::new(options.clone());
    serializer.write_card(card);
    serializer.into_inner()
}

/// Writes a card to `writer` as folded vCard text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn to_writer<W: io::Write>(writer: W, card: &Card) -> Result<()> {
    to_writer_with_options(writer, card, &WriteOptions::default())
}

/// Writes a card to `writer` with custom options.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn to_writer_with_options<W: io::Write>(
    mut writer: W,
    card: &Card,
    options: &WriteOptions,
) -> Result<()> {
    writer.write_all(to_string_with_options(card, options).as_bytes())?;
    Ok(())
}

/// Parses every card in a string.
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the error.
pub fn from_str(s: &str) -> std::result::Result<Vec<Card>, PartialParse> {
    parse_all(s.as_bytes())
}

/// Parses every card in a string with custom options.
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the error.
pub fn from_str_with_options(
    s: &str,
    options: &ParseOptions,
) -> std::result::Result<Vec<Card>, PartialParse> {
    parse_all_with_options(s.as_bytes(), options)
}

/// Parses every card in a byte slice.
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the error.
pub fn from_slice(v: &[u8]) -> std::result::Result<Vec<Card>, PartialParse> {
    parse_all(v)
}

/// Parses every card from an I/O stream, buffering it internally.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use vcard::from_reader;
///
/// let cards = from_reader(Cursor::new(b"BEGIN:VCARD\nEND:VCARD\n")).unwrap();
/// assert_eq!(cards.len(), 1);
/// assert!(cards[0].is_empty());
/// ```
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the
/// error, which may be an I/O error of the reader.
pub fn from_reader<R: io::Read>(reader: R) -> std::result::Result<Vec<Card>, PartialParse> {
    parse_all(io::BufReader::new(reader))
}
