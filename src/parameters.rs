//! Parameter container shared by render states, actions, and the hub store.
//!
//! A [`Parameters`] value maps a parameter name to an ordered sequence of
//! nullable string values. An absent name, a name bound to an empty
//! sequence, and a name bound to `[None]` are three different things:
//!
//! | stored        | `get_value`        | `get_values`         |
//! |---------------|--------------------|----------------------|
//! | (absent)      | `None`             | `None`               |
//! | `[]`          | `None`             | `Some(&[])`          |
//! | `[None]`      | `Some(None)`       | `Some(&[None])`      |
//! | `["a", "b"]`  | `Some(Some("a"))`  | `Some(&["a", "b"])`  |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// The stored form of a parameter: an ordered sequence of nullable values.
pub type Values = Vec<Option<String>>;

/// A value accepted by [`Parameters::set_value`]: either one nullable value
/// or a sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Single(Option<String>),
    Multiple(Values),
}

impl ParameterValue {
    /// Normalize to the stored sequence form.
    pub fn into_values(self) -> Values {
        match self {
            ParameterValue::Single(value) => vec![value],
            ParameterValue::Multiple(values) => values,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Single(Some(value.to_string()))
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Single(Some(value))
    }
}

impl From<Option<&str>> for ParameterValue {
    fn from(value: Option<&str>) -> Self {
        ParameterValue::Single(value.map(str::to_string))
    }
}

impl From<Option<String>> for ParameterValue {
    fn from(value: Option<String>) -> Self {
        ParameterValue::Single(value)
    }
}

impl From<Values> for ParameterValue {
    fn from(values: Values) -> Self {
        ParameterValue::Multiple(values)
    }
}

impl From<Vec<String>> for ParameterValue {
    fn from(values: Vec<String>) -> Self {
        ParameterValue::Multiple(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for ParameterValue {
    fn from(values: Vec<&str>) -> Self {
        ParameterValue::Multiple(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParameterValue {
    fn from(values: [&str; N]) -> Self {
        ParameterValue::Multiple(values.iter().map(|v| Some(v.to_string())).collect())
    }
}

impl<const N: usize> From<[Option<&str>; N]> for ParameterValue {
    fn from(values: [Option<&str>; N]) -> Self {
        ParameterValue::Multiple(values.iter().map(|v| v.map(str::to_string)).collect())
    }
}

impl From<&[Option<String>]> for ParameterValue {
    fn from(values: &[Option<String>]) -> Self {
        ParameterValue::Multiple(values.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Ordered mapping from parameter name to [`Values`].
///
/// Iteration follows insertion order; equality does not depend on it.
/// `Clone` is a deep copy, so a clone and its source never share values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    entries: IndexMap<String, Values>,
}

impl Parameters {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container from `(name, value)` pairs. Later pairs replace
    /// earlier pairs with the same name.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        let mut params = Self::new();
        for (name, value) in entries {
            params.set_value(name, value);
        }
        params
    }

    /// Store `value` under `name`, replacing any previous entry entirely.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) {
        self.entries.insert(name.into(), value.into().into_values());
    }

    /// Store a sequence of values under `name`, replacing any previous entry.
    pub fn set_values<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        self.entries.insert(name.into(), values);
    }

    /// Single-value view of `name`: the first stored element.
    ///
    /// Returns `None` when the name is absent (or bound to an empty
    /// sequence), `Some(None)` when the first element is null.
    pub fn get_value(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(|first| first.as_deref())
    }

    /// Like [`get_value`](Self::get_value) but falls back to `default` when
    /// there is no first element. A stored null is returned as `None`, not
    /// replaced by the default.
    pub fn get_value_or<'a>(&'a self, name: &str, default: Option<&'a str>) -> Option<&'a str> {
        match self.get_value(name) {
            Some(value) => value,
            None => default,
        }
    }

    /// Full stored sequence for `name`, in order, nulls included.
    pub fn get_values(&self, name: &str) -> Option<&[Option<String>]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Like [`get_values`](Self::get_values) but returns `default` when the
    /// name is absent.
    pub fn get_values_or<'a>(
        &'a self,
        name: &str,
        default: &'a [Option<String>],
    ) -> &'a [Option<String>] {
        self.get_values(name).unwrap_or(default)
    }

    /// Delete `name`. Absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Values> {
        self.entries.shift_remove(name)
    }

    /// Whether `name` is currently set.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names currently set, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of names currently set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no name is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names whose values differ between `self` and `other`: names set in
    /// `self` with different (or no) values in `other`, followed by names
    /// only set in `other`.
    pub fn changed_names(&self, other: &Parameters) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(name, values)| other.entries.get(*name) != Some(*values))
            .map(|(name, _)| name.clone())
            .collect();
        names.extend(
            other
                .entries
                .keys()
                .filter(|name| !self.entries.contains_key(*name))
                .cloned(),
        );
        names
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a Values);
    type IntoIter = indexmap::map::Iter<'a, String, Values>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
