//! Property values keyed by type URI.
//!
//! XRD allows the same `<Property type="...">` element to repeat, while JRD
//! stores properties in a JSON object with unique keys. [`PropertyValue`]
//! captures both shapes so neither format has to guess: a key missing from
//! [`Properties`] is absent, [`PropertyValue::Single`] holds one value, and
//! [`PropertyValue::Multiple`] holds an ordered run of values sharing a type.
//! `None` inside either variant is a nil value.

use indexmap::IndexMap;

/// The value stored under one property type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    /// One value; `None` is nil.
    Single(Option<String>),
    /// Repeated values of the same type, in document order.
    Multiple(Vec<Option<String>>),
}

impl PropertyValue {
    /// Creates a single non-nil value.
    pub fn value(value: impl Into<String>) -> Self {
        Self::Single(Some(value.into()))
    }

    /// Creates a single nil value.
    pub fn nil() -> Self {
        Self::Single(None)
    }

    /// Builds a value from a sequence; one element stays `Single`.
    pub fn from_values(mut values: Vec<Option<String>>) -> Self {
        if values.len() == 1 {
            Self::Single(values.pop().flatten())
        } else {
            Self::Multiple(values)
        }
    }

    /// The value JRD keeps when several values share a type: the last one.
    ///
    /// Root and link properties both go through here when rendering JSON.
    /// An empty `Multiple` has no value to keep; the writers skip it.
    pub fn collapsed(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            Self::Multiple(values) => values.last().and_then(|value| value.as_deref()),
        }
    }

    /// Iterates every stored value in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        let values: &[Option<String>] = match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        };
        values.iter().map(|value| value.as_deref())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(values) => values.len(),
        }
    }

    /// True for an empty `Multiple`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when more than one value shares the type.
    pub fn is_multiple(&self) -> bool {
        self.len() > 1
    }

    /// True if any stored value renders as nil.
    pub fn has_nil(&self) -> bool {
        self.iter().any(is_nil)
    }

    /// Appends a value, promoting `Single` to `Multiple`.
    pub fn push(&mut self, value: Option<String>) {
        match self {
            Self::Single(existing) => {
                let first = existing.take();
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::value(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Single(Some(value))
    }
}

impl From<Option<String>> for PropertyValue {
    fn from(value: Option<String>) -> Self {
        Self::Single(value)
    }
}

/// Empty strings have no text content in XML, so they render as nil there.
pub(crate) fn is_nil(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Properties keyed by type URI, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    entries: IndexMap<String, PropertyValue>,
}

impl Properties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for `type_uri`, replacing any previous value.
    pub fn insert(&mut self, type_uri: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(type_uri.into(), value.into());
    }

    /// Adds one more value for `type_uri`.
    ///
    /// A type seen for the first time becomes `Single`; a repeated type is
    /// promoted to `Multiple` with the new value appended.
    pub fn append(&mut self, type_uri: impl Into<String>, value: Option<String>) {
        match self.entries.entry(type_uri.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(PropertyValue::Single(value));
            }
        }
    }

    /// Returns the value for `type_uri`, or `None` when absent.
    pub fn get(&self, type_uri: &str) -> Option<&PropertyValue> {
        self.entries.get(type_uri)
    }

    /// Returns a mutable value for `type_uri`.
    pub fn get_mut(&mut self, type_uri: &str) -> Option<&mut PropertyValue> {
        self.entries.get_mut(type_uri)
    }

    /// Removes `type_uri`, keeping the order of the remaining entries.
    pub fn remove(&mut self, type_uri: &str) -> Option<PropertyValue> {
        self.entries.shift_remove(type_uri)
    }

    pub fn contains(&self, type_uri: &str) -> bool {
        self.entries.contains_key(type_uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(type_uri, value)| (type_uri.as_str(), value))
    }

    /// True if any entry holds a nil value.
    pub fn has_nil(&self) -> bool {
        self.entries.values().any(PropertyValue::has_nil)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (type_uri, value) in iter {
            properties.insert(type_uri, value);
        }
        properties
    }
}
