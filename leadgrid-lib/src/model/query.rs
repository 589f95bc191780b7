//! Applied query and query patch types.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::QueryValue;

static NULL: QueryValue = QueryValue::Null;

/// The host's canonical flat query.
///
/// Holds pagination, sort and filter keys side by side. Keys are kept in
/// sorted order so serializing the same query always yields the same output.
///
/// # Example
///
/// ```
/// use leadgrid_lib::model::Query;
///
/// let query = Query::new()
///     .with("page", 1i64)
///     .with("page_size", 20i64)
///     .with("q", "jane");
///
/// assert_eq!(query.get("q").and_then(|v| v.as_text()), Some("jane"));
/// assert_eq!(query.to_query_string(), "page=1&page_size=20&q=jane");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    fields: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key and returns the query (builder form).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under a key, if any.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.fields.get(key)
    }

    /// Returns the value stored under a key, treating a missing key as null.
    pub fn get_or_null(&self, key: &str) -> &QueryValue {
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// Sets a key, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.fields.remove(key)
    }

    /// Returns `true` if the key is present (even when null).
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Writes every key of the patch into this query.
    pub fn merge(&mut self, patch: &QueryPatch) {
        for (key, value) in patch.iter() {
            self.fields.insert(key.to_string(), value.clone());
        }
    }

    /// Iterates over the keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the query has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes the query as a URL query string.
    ///
    /// Unset values (null, empty string, empty list) are omitted; lists are
    /// comma-joined. Keys and values are percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.fields
            .iter()
            .filter(|(_, value)| match value {
                QueryValue::Null => false,
                QueryValue::Text(s) => !s.is_empty(),
                QueryValue::List(items) => !items.is_empty(),
                _ => true,
            })
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.to_scalar())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FromIterator<(String, QueryValue)> for Query {
    fn from_iter<I: IntoIterator<Item = (String, QueryValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A set of key updates to merge into a [`Query`].
///
/// Produced by the filter staging controller on apply/reset and by the grid
/// for sort and page intents. Ordered by key, so two patches built from the
/// same input compare and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryPatch {
    fields: BTreeMap<String, QueryValue>,
}

impl QueryPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key in the patch.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Sets a key and returns the patch (builder form).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value the patch writes for a key.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.fields.get(key)
    }

    /// Iterates over the patch entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys the patch writes.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of keys in the patch.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the patch writes nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
