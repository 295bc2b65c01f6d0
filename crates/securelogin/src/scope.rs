//! Token scope: a query-string shaped, multi-valued mapping.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use thiserror::Error;

/// Characters escaped when writing a scope back out as a query string.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

/// Failure to parse a query string into a [`Scope`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `;` is not accepted as a pair separator.
    #[error("invalid semicolon separator in query")]
    Semicolon,

    /// `%` not followed by two hex digits.
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    /// Decoded bytes are not UTF-8.
    #[error("invalid UTF-8 in query component")]
    InvalidUtf8,
}

/// What a token allows its bearer to do.
///
/// Keys are unique; each key holds an ordered list of values. Two scopes are
/// equal when they have the same keys and, per key, the same values in the
/// same order. Login tokens carry an empty scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(BTreeMap<String, Vec<String>>);

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    pub fn parse_query(query: &str) -> Result<Self, ScopeError> {
        let mut scope = Scope::new();

        for pair in query.split('&') {
            if pair.contains(';') {
                return Err(ScopeError::Semicolon);
            }
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            scope.append(unescape(key)?, unescape(value)?);
        }

        Ok(scope)
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values for `key`, in order.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether `value` is among the values stored under `key`.
    pub fn contains_value(&self, key: &str, value: &str) -> bool {
        self.0
            .get(key)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    /// Replace all values under `key`.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(key.into(), values)
    }

    /// Add a value to the end of the list under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Merge `other` into `self`, key by key. Keys present in both take the
    /// values from `other`.
    pub fn merge(&mut self, other: Scope) {
        self.0.extend(other.0);
    }
}

fn unescape(component: &str) -> Result<String, ScopeError> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(ScopeError::InvalidEscape(
                    String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| ScopeError::InvalidUtf8)
}

fn escape(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT)
        .to_string()
        .replace(' ', "+")
}

/// Writes the scope as a query string, keys in sorted order.
impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, values) in &self.0 {
            for value in values {
                if !first {
                    f.write_str("&")?;
                }
                first = false;
                write!(f, "{}={}", escape(key), escape(value))?;
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Scope
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Scope(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Vec<String>>> for Scope {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Scope(map)
    }
}

impl<'a> IntoIterator for &'a Scope {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
