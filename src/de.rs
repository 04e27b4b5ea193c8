//! vCard parsing.
//!
//! This module provides the [`Parser`] that reads cards from any byte source,
//! and [`parse_all`] for reading a whole stream at once.
//!
//! ## Overview
//!
//! - **Streaming**: bytes are pulled one at a time through an [`UnfoldingReader`],
//!   so folded lines are merged before the grammar sees them
//! - **Single pass**: every production needs at most one byte of lookahead
//! - **Line-numbered errors**: each error names the logical line on which the
//!   offending property started
//!
//! ## Grammar
//!
//! ```text
//! card      = "BEGIN:VCARD" NL *property "END:VCARD" [NL]
//! property  = [name "."] name *(";" parameter) ":" value *("," value) (NL / end of input)
//! parameter = name "=" param-value *("," param-value)
//! name      = 1*(ALPHA / DIGIT / "-")          ; read as uppercase
//! ```
//!
//! A parameter value is either a run of safe characters or a double-quoted
//! string, which may additionally contain `;`, `:` and `,`. In property values
//! the escapes `\,`, `\\` and `\n` decode to a comma, a backslash and a newline.
//! `\;` is kept as the two characters `\;` because several structured values
//! (`N`, `ADR`) use `;` as an internal separator.
//!
//! ## Usage
//!
//! ```rust
//! use vcard::Parser;
//!
//! let input = "BEGIN:VCARD\r\nFN:Forrest Gump\r\nEND:VCARD\r\n";
//! let mut parser = Parser::new(input.as_bytes());
//!
//! let card = parser.next_card().unwrap().unwrap();
//! assert_eq!(card.get("FN")[0].value(), "Forrest Gump");
//! assert!(parser.next_card().unwrap().is_none());
//! ```

use crate::options::{DuplicateParams, ParseOptions};
use crate::{Card, Error, PartialParse, Property, Result, UnfoldingReader};
use std::io::Read;
use tracing::{debug, trace};

/// The value carried by the `BEGIN` and `END` markers.
const CARD_KIND: &str = "VCARD";

/// The vCard parser.
///
/// Reads cards one at a time with [`next_card`](Self::next_card), or iterates
/// over them. Iteration stops after the first error.
pub struct Parser<R> {
    reader: UnfoldingReader<R>,
    options: ParseOptions,
    property_line: usize,
    finished: bool,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Parser {
            reader: UnfoldingReader::new(reader),
            options,
            property_line: 1,
            finished: false,
        }
    }

    /// Returns the logical line the parser is positioned on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.reader.line()
    }

    /// Consumes the parser, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Parses the next card.
    ///
    /// Returns `Ok(None)` when the input is exhausted between cards. After an
    /// error the parser is left in the middle of a card and should be dropped;
    /// no attempt is made to resynchronize on the next `BEGIN`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for malformed input, an unexpected-end error if
    /// the input stops inside a card, or the I/O error of the source.
    pub fn next_card(&mut self) -> Result<Option<Card>> {
        if self.reader.peek_byte()?.is_none() {
            return Ok(None);
        }
        let start = self.reader.line();
        match self.parse_card() {
            Ok(card) => {
                debug!(line = start, properties = card.len(), "parsed card");
                Ok(Some(card))
            }
            Err(e) => {
                debug!(line = start, error = %e, "failed to parse card");
                Err(e)
            }
        }
    }

    fn parse_card(&mut self) -> Result<Card> {
        let (name, prop) = self.parse_property()?;
        if name != "BEGIN" || !is_marker(&prop) {
            return Err(self.syntax("expected beginning of card"));
        }

        let mut card = Card::new();
        loop {
            if self.reader.peek_byte()?.is_none() {
                return Err(Error::unexpected_eof(
                    self.reader.line(),
                    "unexpected end of input before ending card",
                ));
            }
            let (name, prop) = self.parse_property()?;
            if name == "END" {
                if !is_marker(&prop) {
                    return Err(self.syntax("malformed end tag"));
                }
                return Ok(card);
            }
            trace!(line = self.property_line, name = %name, "parsed property");
            card.add(&name, prop);
        }
    }

    fn parse_property(&mut self) -> Result<(String, Property)> {
        self.property_line = self.reader.line();
        let mut prop = Property::new("");

        let mut name = self.parse_name("expected property name")?;
        let mut b = self.demand_byte("expected parameters or property value")?;
        if b == b'.' {
            prop.set_group(&name);
            name = self.parse_name("expected property name")?;
            b = self.demand_byte("expected parameters or property value")?;
        }
        if b == b';' {
            self.parse_parameters(&mut prop)?;
            b = self.demand_byte("expected property value")?;
        }
        if b != b':' {
            return Err(self.syntax("expected ':'"));
        }
        prop.set_values(self.parse_values()?);

        match self.reader.next_byte()? {
            None | Some(b'\n') => Ok((name, prop)),
            Some(b) => Err(self.syntax(format!(
                "unexpected character '{}' after property value",
                b.escape_ascii()
            ))),
        }
    }

    fn parse_values(&mut self) -> Result<Vec<String>> {
        let mut values = vec![self.parse_value()?];
        while self.reader.peek_byte()? == Some(b',') {
            self.reader.next_byte()?;
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    /// Parses one property value. An empty value is valid.
    fn parse_value(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        while let Some(b) = self.reader.peek_byte()? {
            if !is_value_char(b) {
                break;
            }
            self.reader.next_byte()?;
            if b != b'\\' {
                bytes.push(b);
                continue;
            }
            match self.demand_byte("expected escaped character")? {
                b',' => bytes.push(b','),
                b'\\' => bytes.push(b'\\'),
                b'n' => bytes.push(b'\n'),
                b';' => bytes.extend_from_slice(b"\\;"),
                other => {
                    return Err(self.syntax(format!(
                        "'{}' cannot be escaped",
                        other.escape_ascii()
                    )))
                }
            }
        }
        self.utf8(bytes, "property value")
    }

    fn parse_parameters(&mut self, prop: &mut Property) -> Result<()> {
        loop {
            let (key, values) = self.parse_parameter()?;
            let params = prop.params_mut();
            match params.get_mut(&key) {
                None => {
                    params.insert(key, values);
                }
                Some(existing) => match self.options.duplicate_params {
                    DuplicateParams::Append => existing.extend(values),
                    DuplicateParams::Reject => {
                        return Err(self.syntax(format!("duplicate parameter {key}")))
                    }
                },
            }

            if self.reader.peek_byte()? != Some(b';') {
                return Ok(());
            }
            self.reader.next_byte()?;
        }
    }

    fn parse_parameter(&mut self) -> Result<(String, Vec<String>)> {
        let key = self.parse_name("expected parameter name")?;

        let msg = format!("expected '=' after parameter name {key}");
        if self.demand_byte(&msg)? != b'=' {
            return Err(self.syntax(msg));
        }

        let mut values = vec![self.parse_param_value()?];
        while self.reader.peek_byte()? == Some(b',') {
            self.reader.next_byte()?;
            values.push(self.parse_param_value()?);
        }
        Ok((key, values))
    }

    fn parse_param_value(&mut self) -> Result<String> {
        if self.reader.peek_byte()? == Some(b'"') {
            self.reader.next_byte()?;
            return self.parse_quoted_param_value();
        }

        let mut bytes = Vec::new();
        while let Some(b) = self.reader.peek_byte()? {
            if !is_safe_char(b) {
                break;
            }
            self.reader.next_byte()?;
            bytes.push(b);
        }
        self.utf8(bytes, "parameter value")
    }

    /// Parses the rest of a quoted parameter value, closing quote included.
    fn parse_quoted_param_value(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            match self.reader.next_byte()? {
                Some(b'"') => return self.utf8(bytes, "parameter value"),
                Some(b) if is_quote_safe_char(b) => bytes.push(b),
                Some(b) => {
                    return Err(self.syntax(format!(
                        "unexpected byte '{}' in quoted parameter value",
                        b.escape_ascii()
                    )))
                }
                None => return Err(self.eof("unexpected end of quoted parameter value")),
            }
        }
    }

    /// Parses a property name, group or parameter name, uppercasing it.
    fn parse_name(&mut self, missing: &str) -> Result<String> {
        let mut name = String::new();
        while let Some(b) = self.reader.peek_byte()? {
            if !(b.is_ascii_alphanumeric() || b == b'-') {
                break;
            }
            self.reader.next_byte()?;
            name.push(char::from(b.to_ascii_uppercase()));
        }

        if !name.is_empty() {
            Ok(name)
        } else if self.reader.peek_byte()?.is_none() {
            Err(self.eof(missing))
        } else {
            Err(self.syntax(missing))
        }
    }

    /// Reads the next byte, treating end of input as an error.
    fn demand_byte(&mut self, missing: &str) -> Result<u8> {
        match self.reader.next_byte()? {
            Some(b) => Ok(b),
            None => Err(self.eof(missing)),
        }
    }

    fn utf8(&self, bytes: Vec<u8>, what: &str) -> Result<String> {
        String::from_utf8(bytes).map_err(|_| self.syntax(format!("invalid UTF-8 in {what}")))
    }

    fn syntax(&self, msg: impl Into<String>) -> Error {
        Error::syntax(self.property_line, msg)
    }

    fn eof(&self, msg: impl Into<String>) -> Error {
        Error::unexpected_eof(self.property_line, msg)
    }
}

impl<R: Read> Iterator for Parser<R> {
    type Item = Result<Card>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_card() {
            Ok(Some(card)) => Some(Ok(card)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Parser<R> {}

/// Parses every card in `reader` until end of input.
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the error.
pub fn parse_all<R: Read>(reader: R) -> std::result::Result<Vec<Card>, PartialParse> {
    parse_all_with_options(reader, &ParseOptions::default())
}

/// Parses every card in `reader` with custom options.
///
/// # Errors
///
/// On the first failure, returns the cards parsed so far together with the error.
pub fn parse_all_with_options<R: Read>(
    reader: R,
    options: &ParseOptions,
) -> std::result::Result<Vec<Card>, PartialParse> {
    let mut parser = Parser::with_options(reader, options.clone());
    let mut cards = Vec::new();
    loop {
        match parser.next_card() {
            Ok(Some(card)) => cards.push(card),
            Ok(None) => break,
            Err(error) => return Err(PartialParse { cards, error }),
        }
    }
    debug!(cards = cards.len(), "parsed all cards");
    Ok(cards)
}

/// `BEGIN` and `END` take no group, no parameters and exactly the value `VCARD`.
fn is_marker(prop: &Property) -> bool {
    prop.group().is_empty()
        && !prop.has_params()
        && prop.values().len() == 1
        && prop.value().eq_ignore_ascii_case(CARD_KIND)
}

fn is_value_char(b: u8) -> bool {
    b == b'\t' || (b' ' <= b && b != b',')
}

fn is_quote_safe_char(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'!' || b'"' < b
}

fn is_safe_char(b: u8) -> bool {
    // The format also lists ',' as safe, but it separates parameter values.
    b == b' ' || b == b'\t' || b == b'!' || (b'"' < b && b != b';' && b != b':' && b != b',')
}
