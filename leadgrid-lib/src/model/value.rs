//! QueryValue enum for flat query values

use serde::Deserialize;
use serde::Serialize;

/// A dynamic value stored under a single key of a flat query.
///
/// # Example
///
/// ```
/// use leadgrid_lib::model::QueryValue;
///
/// let status = QueryValue::from("new");
/// let page = QueryValue::from(3i64);
/// let empty = QueryValue::Null;
/// assert!(status.is_truthy());
/// assert!(!empty.is_truthy());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Null/absent value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer (page numbers, sizes, ids).
    Int(i64),
    /// String value.
    Text(String),
    /// List of strings.
    List(Vec<String>),
}

impl QueryValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::Null => "null",
            QueryValue::Bool(_) => "bool",
            QueryValue::Int(_) => "int",
            QueryValue::Text(_) => "text",
            QueryValue::List(_) => "list",
        }
    }

    /// Returns `true` if the value counts as set.
    ///
    /// Null, `false`, `0`, the empty string and the empty list are all unset.
    pub fn is_truthy(&self) -> bool {
        match self {
            QueryValue::Null => false,
            QueryValue::Bool(b) => *b,
            QueryValue::Int(i) => *i != 0,
            QueryValue::Text(s) => !s.is_empty(),
            QueryValue::List(items) => !items.is_empty(),
        }
    }

    /// Returns the string if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, parsing text values if needed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            QueryValue::Int(i) => Some(*i),
            QueryValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Renders the value as a single scalar string.
    ///
    /// Null renders as the empty string and lists are comma-joined.
    pub fn to_scalar(&self) -> String {
        match self {
            QueryValue::Null => String::new(),
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::Int(i) => i.to_string(),
            QueryValue::Text(s) => s.clone(),
            QueryValue::List(items) => items.join(","),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(v.into())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<usize> for QueryValue {
    fn from(v: usize) -> Self {
        QueryValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::List(v)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!QueryValue::Null.is_truthy());
        assert!(!QueryValue::from("").is_truthy());
        assert!(!QueryValue::List(vec![]).is_truthy());
        assert!(!QueryValue::from(false).is_truthy());
        assert!(!QueryValue::from(0i64).is_truthy());
        assert!(QueryValue::from("yes").is_truthy());
        assert!(QueryValue::from(2i64).is_truthy());
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<QueryValue> = serde_json::from_str(r#"[null, true, 3, "jane", ["a", "b"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                QueryValue::Null,
                QueryValue::Bool(true),
                QueryValue::Int(3),
                QueryValue::from("jane"),
                QueryValue::List(vec!["a".into(), "b".into()]),
            ]
        );
    }

    #[test]
    fn test_as_int_parses_text() {
        assert_eq!(QueryValue::from("42").as_int(), Some(42));
        assert_eq!(QueryValue::from("x").as_int(), None);
        assert_eq!(QueryValue::Null.as_int(), None);
    }
}
