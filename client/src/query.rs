//! Query-parameter sink shared by every filter type.
//!
//! Filters never build URLs themselves. They append `(name, value)` pairs to a
//! [`QueryValues`] and the HTTP layer flattens it once the request is complete.

use anyhow::Result;

/// Ordered multi-map of query-parameter name to values.
///
/// `add` appends and never overwrites, so the same name may appear more than
/// once (e.g. two `created_ats[gt]` predicates).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    pairs: Vec<(String, String)>,
}

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw, unencoded pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Append every pair of `other` after the existing ones.
    pub fn extend(&mut self, other: QueryValues) {
        self.pairs.extend(other.pairs);
    }

    /// Flatten into a query string (without the leading `?`).
    ///
    /// Names and values are percent-encoded per RFC 3986, so a space becomes
    /// `%20` rather than `+`. This is the exact string [`crate::Client`] sends.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Anything that can write itself into a [`QueryValues`] under a parameter tag.
///
/// Serialization is currently infallible; the `Result` is kept so that tag or
/// value validation can be added without changing every call site.
pub trait QuerySerialize {
    fn serialize(&self, values: &mut QueryValues, tag: &str) -> Result<()>;
}
