//! Filter kinds and their draft values.
//!
//! A [`FilterKind`] fixes three things for a field: the shape of its draft
//! ([`FilterValue`]), its default, and how the draft maps to and from the flat
//! query keys.

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FilterError;
use crate::model::Query;
use crate::model::QueryPatch;
use crate::model::QueryValue;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The declarative type of a filter field.
///
/// Single-key kinds read and write the query key named after the field.
///
/// # Example
///
/// ```
/// use leadgrid_lib::filter::FilterKind;
///
/// let kind: FilterKind = serde_json::from_str(
///     r#"{ "kind": "date_range", "from_key": "created_from", "to_key": "created_to" }"#,
/// ).unwrap();
/// assert_eq!(kind.keys("created"), vec!["created_from", "created_to"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    /// Free text, passed through as-is. Default: `""`
    Input,
    /// A single choice, passed through as-is. Default: none
    SingleSelect,
    /// Several choices stored as one comma-separated key. Default: empty
    MultiCsv,
    /// A value and its display label stored under two keys. Default: none
    Pair { value_key: String, label_key: String },
    /// An inclusive date range stored under two keys. Default: open range
    DateRange { from_key: String, to_key: String },
    /// A single choice restricted to a declared option set. Default: none
    OneOf { options: Vec<String> },
}

impl FilterKind {
    /// Returns the snake_case name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Input => "input",
            FilterKind::SingleSelect => "single_select",
            FilterKind::MultiCsv => "multi_csv",
            FilterKind::Pair { .. } => "pair",
            FilterKind::DateRange { .. } => "date_range",
            FilterKind::OneOf { .. } => "one_of",
        }
    }

    /// Returns the flat query keys this field reads and writes.
    pub fn keys<'a>(&'a self, field: &'a str) -> Vec<&'a str> {
        match self {
            FilterKind::Pair {
                value_key,
                label_key,
            } => vec![value_key.as_str(), label_key.as_str()],
            FilterKind::DateRange { from_key, to_key } => vec![from_key.as_str(), to_key.as_str()],
            _ => vec![field],
        }
    }

    /// Returns the draft value this kind resets to.
    pub fn default_value(&self) -> FilterValue {
        match self {
            FilterKind::Input => FilterValue::Text(String::new()),
            FilterKind::SingleSelect | FilterKind::OneOf { .. } => FilterValue::Choice(None),
            FilterKind::MultiCsv => FilterValue::List(Vec::new()),
            FilterKind::Pair { .. } => FilterValue::Pair(None),
            FilterKind::DateRange { .. } => FilterValue::Range(DateRange::default()),
        }
    }

    /// Reads the field's draft from the applied query.
    ///
    /// Missing keys and values that do not fit the kind decode to the default.
    pub fn decode(&self, field: &str, query: &Query) -> FilterValue {
        match self {
            FilterKind::Input => FilterValue::Text(query.get_or_null(field).to_scalar()),
            FilterKind::SingleSelect => FilterValue::Choice(non_empty(query.get_or_null(field).to_scalar())),
            FilterKind::OneOf { options } => {
                let raw = query.get_or_null(field).to_scalar();
                if raw.is_empty() || options.contains(&raw) {
                    FilterValue::Choice(non_empty(raw))
                } else {
                    log::debug!("[filter] '{}' holds '{}' outside its options, decoding as empty", field, raw);
                    FilterValue::Choice(None)
                }
            }
            FilterKind::MultiCsv => FilterValue::List(match query.get_or_null(field) {
                QueryValue::List(items) => items.iter().filter(|s| !s.is_empty()).cloned().collect(),
                other => split_csv(&other.to_scalar()),
            }),
            FilterKind::Pair {
                value_key,
                label_key,
            } => {
                let value = query.get_or_null(value_key).to_scalar();
                if value.is_empty() {
                    return FilterValue::Pair(None);
                }
                let label = non_empty(query.get_or_null(label_key).to_scalar()).unwrap_or_else(|| value.clone());
                FilterValue::Pair(Some(PairValue { value, label }))
            }
            FilterKind::DateRange { from_key, to_key } => FilterValue::Range(DateRange {
                from: parse_date(query.get_or_null(from_key)),
                to: parse_date(query.get_or_null(to_key)),
            }),
        }
    }

    /// Writes the draft into the patch under this field's keys.
    ///
    /// The value must already have passed [`FilterKind::check`]; a value of
    /// the wrong shape encodes as the kind's default.
    pub fn encode(&self, field: &str, value: &FilterValue, patch: &mut QueryPatch) {
        match (self, value) {
            (FilterKind::Input, FilterValue::Text(text)) => patch.set(field, text.as_str()),
            (FilterKind::SingleSelect | FilterKind::OneOf { .. }, FilterValue::Choice(choice)) => {
                patch.set(field, choice.clone())
            }
            (FilterKind::MultiCsv, FilterValue::List(items)) => {
                let joined = join_csv(items);
                patch.set(field, non_empty(joined))
            }
            (
                FilterKind::Pair {
                    value_key,
                    label_key,
                },
                FilterValue::Pair(pair),
            ) => {
                patch.set(value_key, pair.as_ref().map(|p| p.value.clone()));
                patch.set(label_key, pair.as_ref().map(|p| p.label.clone()));
            }
            (FilterKind::DateRange { from_key, to_key }, FilterValue::Range(range)) => {
                patch.set(from_key, range.from.map(format_date));
                patch.set(to_key, range.to.map(format_date));
            }
            _ => {
                log::warn!(
                    "[filter] '{}' holds a {} draft for a {} field, encoding the default",
                    field,
                    value.type_name(),
                    self.name()
                );
                self.encode(field, &self.default_value(), patch);
            }
        }
    }

    /// Validates a new draft for this field, normalizing it where the shape allows.
    ///
    /// Text is accepted for choice kinds (empty text clears the choice).
    /// List entries are split on commas and stripped of empty segments, so
    /// the draft matches what decoding the applied key gives back.
    pub fn check(&self, field: &str, value: FilterValue) -> Result<FilterValue, FilterError> {
        let value = match (self, value) {
            (FilterKind::SingleSelect | FilterKind::OneOf { .. }, FilterValue::Text(text)) => {
                FilterValue::Choice(non_empty(text))
            }
            (FilterKind::MultiCsv, FilterValue::List(items)) => {
                FilterValue::List(items.iter().flat_map(|item| split_csv(item)).collect())
            }
            (_, value) => value,
        };

        if let (FilterKind::OneOf { options }, FilterValue::Choice(Some(choice))) = (self, &value)
            && !options.contains(choice)
        {
            return Err(FilterError::InvalidOption {
                field: field.to_string(),
                value: choice.clone(),
            });
        }

        let expected = self.default_value();
        if std::mem::discriminant(&expected) != std::mem::discriminant(&value) {
            return Err(FilterError::type_mismatch(field, expected.type_name(), value.type_name()));
        }
        Ok(value)
    }
}

/// The staged draft of one filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Free text (input).
    Text(String),
    /// An optional single choice (single select, one-of).
    Choice(Option<String>),
    /// Zero or more choices (multi CSV).
    List(Vec<String>),
    /// An optional value/label pair.
    Pair(Option<PairValue>),
    /// A date range with optional bounds.
    Range(DateRange),
}

impl FilterValue {
    /// Creates a choice value.
    pub fn choice(value: impl Into<String>) -> Self {
        FilterValue::Choice(non_empty(value.into()))
    }

    /// Creates a list value.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a value/label pair.
    pub fn pair(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterValue::Pair(Some(PairValue {
            value: value.into(),
            label: label.into(),
        }))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::Choice(_) => "choice",
            FilterValue::List(_) => "list",
            FilterValue::Pair(_) => "pair",
            FilterValue::Range(_) => "date_range",
        }
    }

    /// Returns `true` if the value is empty in its own shape.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Choice(choice) => choice.is_none(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Pair(pair) => pair.is_none(),
            FilterValue::Range(range) => range.is_open(),
        }
    }

    /// Returns the scalar text of a text or choice value (`""` when unset).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) => Some(text),
            FilterValue::Choice(choice) => Some(choice.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::List(v)
    }
}

impl From<DateRange> for FilterValue {
    fn from(v: DateRange) -> Self {
        FilterValue::Range(v)
    }
}

/// A value and the label shown for it (e.g. a company id and its name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairValue {
    pub value: String,
    pub label: String,
}

/// An inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Returns `true` if neither bound is set.
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns `true` if the date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Splits a comma-separated string, dropping empty segments.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins list entries with commas, skipping empty entries.
pub fn join_csv(items: &[String]) -> String {
    items
        .iter()
        .filter(|item| !item.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_date(value: &QueryValue) -> Option<NaiveDate> {
    let raw = value.to_scalar();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // Accept full timestamps by their date prefix.
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| raw.get(..10).and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
