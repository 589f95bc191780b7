//! Active-filter badge counter.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::config::QueryKeys;
use crate::model::Query;
use crate::model::QueryValue;

use super::FilterSchema;

/// Counts the filter keys of an applied query that are actually in effect.
///
/// A key counts when its value is truthy, it is not excluded (paging and
/// sorting keys), and it does not equal the field's declared inactive default.
///
/// # Example
///
/// ```
/// use leadgrid_lib::filter::ActiveFilterCounter;
/// use leadgrid_lib::model::Query;
///
/// let counter = ActiveFilterCounter::new()
///     .excluding(["page", "page_size"])
///     .with_inactive_default("date_field", "created_at");
///
/// let query = Query::new()
///     .with("page", 2i64)
///     .with("date_field", "created_at")
///     .with("q", "jane");
/// assert_eq!(counter.count(&query), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActiveFilterCounter {
    excluded: BTreeSet<String>,
    inactive_defaults: BTreeMap<String, QueryValue>,
    /// Flat key -> field name, for keys that count together as one filter.
    groups: BTreeMap<String, String>,
}

impl ActiveFilterCounter {
    /// Creates a counter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter that excludes the paging and sorting keys.
    pub fn for_keys(keys: &QueryKeys) -> Self {
        Self::new().excluding(keys.reserved())
    }

    /// Creates a counter for a list view: paging and sorting keys are
    /// excluded and each multi-key field (pair, date range) counts once.
    pub fn for_schema(schema: &FilterSchema, keys: &QueryKeys) -> Self {
        schema
            .iter()
            .map(|(name, kind)| (name, kind.keys(name)))
            .filter(|(_, flat)| flat.len() > 1)
            .fold(Self::for_keys(keys), |counter, (name, flat)| counter.grouping(name, flat))
    }

    /// Makes several keys count as a single filter named `field`.
    pub fn grouping<I, S>(mut self, field: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.groups.insert(key.into(), field.to_string());
        }
        self
    }

    /// Excludes keys from the count.
    pub fn excluding<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declares a value that does not count as active for one key.
    pub fn with_inactive_default(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.inactive_defaults.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the key/value pair counts as an active filter.
    pub fn is_active(&self, key: &str, value: &QueryValue) -> bool {
        value.is_truthy()
            && !self.excluded.contains(key)
            && self.inactive_defaults.get(key) != Some(value)
    }

    /// Returns the active filter keys in key order.
    pub fn active_keys<'q>(&self, query: &'q Query) -> Vec<&'q str> {
        query
            .iter()
            .filter(|(key, value)| self.is_active(key, value))
            .map(|(key, _)| key)
            .collect()
    }

    /// Returns the number of active filters.
    ///
    /// Every active key counts once, except grouped keys, which count once
    /// per group.
    pub fn count(&self, query: &Query) -> usize {
        let filters: BTreeSet<(bool, &str)> = self
            .active_keys(query)
            .into_iter()
            .map(|key| match self.groups.get(key) {
                Some(field) => (true, field.as_str()),
                None => (false, key),
            })
            .collect();
        filters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_values() {
        let counter = ActiveFilterCounter::new();
        let query = Query::new()
            .with("a", "")
            .with("b", QueryValue::Null)
            .with("c", QueryValue::List(vec![]))
            .with("d", false);
        assert_eq!(counter.count(&query), 0);
    }

    #[test]
    fn test_inactive_default_only_applies_to_its_key() {
        let counter = ActiveFilterCounter::new().with_inactive_default("date_field", "created_at");
        let query = Query::new()
            .with("date_field", "updated_at")
            .with("sort_field", "created_at");
        assert_eq!(counter.active_keys(&query), vec!["date_field", "sort_field"]);
    }

    #[test]
    fn test_multi_key_fields_count_once() {
        use crate::filter::FilterKind;

        let schema = FilterSchema::new()
            .field("q", FilterKind::Input)
            .field(
                "company",
                FilterKind::Pair {
                    value_key: "company_id".into(),
                    label_key: "company_name".into(),
                },
            )
            .field(
                "created",
                FilterKind::DateRange {
                    from_key: "created_from".into(),
                    to_key: "created_to".into(),
                },
            );
        let query = Query::new()
            .with("page", 2i64)
            .with("q", "jane")
            .with("company_id", "c-1")
            .with("company_name", "Acme")
            .with("created_from", "2024-01-01")
            .with("created_to", "2024-02-01");

        let counter = ActiveFilterCounter::for_schema(&schema, &QueryKeys::default());
        assert_eq!(counter.count(&query), 3);
        assert_eq!(counter.active_keys(&query).len(), 5);

        // without grouping every flat key counts
        assert_eq!(ActiveFilterCounter::for_keys(&QueryKeys::default()).count(&query), 5);
    }
}
