//! In-memory vCard model.
//!
//! A [`Card`] is an ordered multimap from property name to every occurrence of
//! that property, kept in the order the occurrences were added. Each occurrence
//! is a [`Property`]: an optional group, a set of parameters and one or more values.
//!
//! Property names, groups and parameter names are case-insensitive and are stored
//! uppercase. Values and parameter values keep their case.
//!
//! ## Why IndexMap?
//!
//! Occurrences of one name must come back in insertion order. Backing the card
//! with an [`IndexMap`] also keeps distinct names in first-seen order, which makes
//! serialized output deterministic.
//!
//! ## Examples
//!
//! ```rust
//! use vcard::{Card, Property};
//!
//! let mut card = Card::new();
//! card.add("tel", Property::new("(111) 555-1212"));
//! card.add("TEL", Property::new("(404) 555-1212"));
//!
//! let numbers: Vec<_> = card.get("Tel").iter().map(|p| p.value()).collect();
//! assert_eq!(numbers, ["(111) 555-1212", "(404) 555-1212"]);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One parsed vCard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card(IndexMap<String, Vec<Property>>);

impl Card {
    /// Creates an empty card.
    #[must_use]
    pub fn new() -> Self {
        Card(IndexMap::new())
    }

    /// Returns every occurrence of the property, in insertion order.
    ///
    /// The lookup is case-insensitive. A missing property yields an empty slice.
    #[must_use]
    pub fn get(&self, name: &str) -> &[Property] {
        self.0
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first occurrence of the property, if any.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&Property> {
        self.get(name).first()
    }

    /// Returns mutable access to the occurrences of the property.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [Property]> {
        self.0
            .get_mut(&name.to_ascii_uppercase())
            .map(Vec::as_mut_slice)
    }

    /// Appends an occurrence of the property.
    pub fn add(&mut self, name: &str, property: Property) {
        self.0
            .entry(name.to_ascii_uppercase())
            .or_default()
            .push(property);
    }

    /// Removes the property and returns its occurrences.
    ///
    /// Remaining names keep their relative order.
    pub fn remove(&mut self, name: &str) -> Vec<Property> {
        self.0
            .shift_remove(&name.to_ascii_uppercase())
            .unwrap_or_default()
    }

    /// Returns `true` if the card has at least one occurrence of the property.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_uppercase())
    }

    /// Returns the number of distinct property names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the card has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the property names, in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns each property name with its occurrences.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Property])> {
        self.0.iter().map(|(name, props)| (name.as_str(), props.as_slice()))
    }
}

impl fmt::Display for Card {
    /// Writes the card as folded, wire-ready text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_string(self))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Vec<Property>>::deserialize(deserializer)?;
        let mut card = Card::new();
        for (name, props) in raw {
            for prop in props {
                card.add(&name, prop);
            }
        }
        Ok(card)
    }
}

impl<'a> IntoIterator for &'a Card {
    type Item = (&'a String, &'a Vec<Property>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<Property>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Property)> for Card {
    fn from_iter<T: IntoIterator<Item = (String, Property)>>(iter: T) -> Self {
        let mut card = Card::new();
        for (name, prop) in iter {
            card.add(&name, prop);
        }
        card
    }
}

/// One occurrence of a property within a card, without its name.
///
/// A property always holds at least one value; the value may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PropertyRepr")]
pub struct Property {
    group: String,
    params: IndexMap<String, Vec<String>>,
    values: Vec<String>,
}

#[derive(Deserialize)]
struct PropertyRepr {
    #[serde(default)]
    group: String,
    #[serde(default)]
    params: IndexMap<String, Vec<String>>,
    #[serde(default)]
    values: Vec<String>,
}

impl From<PropertyRepr> for Property {
    fn from(repr: PropertyRepr) -> Self {
        let mut prop = Property::with_values(repr.values);
        prop.set_group(&repr.group);
        for (key, values) in repr.params {
            prop.params
                .entry(key.to_ascii_uppercase())
                .or_default()
                .extend(values);
        }
        prop
    }
}

impl Property {
    /// Creates a property with a single value and no group or parameters.
    pub fn new(value: impl Into<String>) -> Self {
        Property {
            group: String::new(),
            params: IndexMap::new(),
            values: vec![value.into()],
        }
    }

    /// Creates a property with several values. An empty list becomes one empty value.
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut prop = Property::new("");
        prop.set_values(values);
        prop
    }

    /// Returns the group, or an empty string when the property is ungrouped.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Sets the group; it is stored uppercase.
    pub fn set_group(&mut self, group: &str) {
        self.group = group.to_ascii_uppercase();
    }

    /// Returns the values of a parameter (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&[String]> {
        self.params
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Sets the values of a parameter, replacing any previous values.
    pub fn set_param<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.insert(
            name.to_ascii_uppercase(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    /// Removes a parameter and returns its values.
    pub fn remove_param(&mut self, name: &str) -> Option<Vec<String>> {
        self.params.shift_remove(&name.to_ascii_uppercase())
    }

    /// Returns each parameter name with its values, in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns `true` if the property has any parameters.
    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Returns the values; never empty.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the first value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.values.first().map_or("", String::as_str)
    }

    /// Replaces the values. An empty list becomes one empty value.
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        if self.values.is_empty() {
            self.values.push(String::new());
        }
    }

    pub(crate) fn params_mut(&mut self) -> &mut IndexMap<String, Vec<String>> {
        &mut self.params
    }
}
