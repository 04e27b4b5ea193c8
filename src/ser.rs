//! vCard serialization.
//!
//! This module provides the [`Serializer`] that writes [`Card`]s as vCard text.
//!
//! ## Overview
//!
//! - **Priority property**: `VERSION` (configurable) is written right after
//!   `BEGIN:VCARD`, the remaining properties follow in card order
//! - **Escaping**: commas, backslashes and newlines in values are escaped; a
//!   backslash directly before `;` is left alone so that a parsed `\;` is
//!   written back unchanged
//! - **Quoting**: parameter values containing `;` or `:` are double-quoted
//! - **Folding**: output is folded to 77 bytes per line with `\r\n` endings
//!   unless [`WriteOptions::unfolded`] is used
//!
//! ## Usage
//!
//! ```rust
//! use vcard::{Card, Property, Serializer, WriteOptions};
//!
//! let mut card = Card::new();
//! card.add("FN", Property::new("Forrest Gump"));
//! card.add("VERSION", Property::new("3.0"));
//!
//! let mut serializer = Serializer::new(WriteOptions::unfolded());
//! serializer.write_card(&card);
//! assert_eq!(
//!     serializer.into_inner(),
//!     "BEGIN:VCARD\nVERSION:3.0\nFN:Forrest Gump\nEND:VCARD\n"
//! );
//! ```

use crate::{fold, Card, Property, WriteOptions};

/// The vCard serializer.
///
/// Accumulates any number of cards in unfolded form; folding happens in
/// [`into_inner`](Self::into_inner).
pub struct Serializer {
    output: String,
    options: WriteOptions,
}

impl Serializer {
    pub fn new(options: WriteOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    /// Returns the text written so far, folded according to the options.
    pub fn into_inner(self) -> String {
        match self.options.fold_width {
            Some(width) => fold(&self.output, width),
            None => self.output,
        }
    }

    /// Appends one card.
    pub fn write_card(&mut self, card: &Card) {
        self.output.push_str("BEGIN:VCARD\n");

        let priority = self.options.priority.as_deref();
        if let Some(name) = priority {
            for prop in card.get(name) {
                write_property(&mut self.output, &name.to_ascii_uppercase(), prop);
            }
        }
        for (name, props) in card.iter() {
            if priority.is_some_and(|p| p.eq_ignore_ascii_case(name)) {
                continue;
            }
            for prop in props {
                write_property(&mut self.output, name, prop);
            }
        }

        self.output.push_str("END:VCARD\n");
    }
}

fn write_property(output: &mut String, name: &str, prop: &Property) {
    if !prop.group().is_empty() {
        output.push_str(prop.group());
        output.push('.');
    }
    output.push_str(name);
    for (key, values) in prop.params() {
        output.push(';');
        write_param(output, key, values);
    }
    output.push(':');
    for (i, value) in prop.values().iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        write_value(output, value);
    }
    output.push('\n');
}

/// Writes `KEY=v1,v2`, double-quoting values that contain `;` or `:`.
///
/// Values are otherwise written as they are. A value containing `,` reads back
/// as two values, and one containing `"` or a control byte is rejected by the
/// parser. An empty list is written as `KEY=` and reads back as `[""]`.
fn write_param(output: &mut String, key: &str, values: &[String]) {
    output.push_str(key);
    output.push('=');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        if value.contains([';', ':']) {
            output.push('"');
            output.push_str(value);
            output.push('"');
        } else {
            output.push_str(value);
        }
    }
}

/// Writes a property value, escaping `,`, `\` and newlines.
///
/// A backslash followed by `;` is not escaped: the parser keeps `\;` as two
/// characters, so writing it back verbatim preserves it.
fn write_value(output: &mut String, value: &str) {
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&';') => output.push('\\'),
            '\\' => output.push_str("\\\\"),
            ',' => output.push_str("\\,"),
            '\n' => output.push_str("\\n"),
            _ => output.push(ch),
        }
    }
}
