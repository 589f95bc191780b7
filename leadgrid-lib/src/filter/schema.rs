//! Filter schema: the static map from field name to kind.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;

use super::FilterKind;

/// Declarative description of the filter fields of one list view.
///
/// # Example
///
/// ```
/// use leadgrid_lib::filter::{FilterKind, FilterSchema};
///
/// let schema = FilterSchema::new()
///     .field("q", FilterKind::Input)
///     .field("status", FilterKind::SingleSelect)
///     .field("tags", FilterKind::MultiCsv);
/// assert!(schema.validate().is_ok());
///
/// let schema = FilterSchema::from_json(r#"{
///     "status": { "kind": "one_of", "options": ["new", "contacted"] },
///     "company": { "kind": "pair", "value_key": "company_id", "label_key": "company_name" }
/// }"#).unwrap();
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSchema {
    fields: BTreeMap<String, FilterKind>,
}

impl FilterSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a schema from a JSON object of `field -> kind`.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: FilterSchema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Declares a field. A later declaration of the same name replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, kind: FilterKind) -> Self {
        let name = name.into();
        if self.fields.insert(name.clone(), kind).is_some() {
            log::warn!("[filter] schema field '{}' declared twice, keeping the last", name);
        }
        self
    }

    /// Returns the kind of a field.
    pub fn get(&self, name: &str) -> Option<&FilterKind> {
        self.fields.get(name)
    }

    /// Returns the stored name and kind of a field.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &FilterKind)> {
        self.fields.get_key_value(name).map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the field is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterKind)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns every flat query key the schema reads and writes.
    pub fn query_keys(&self) -> Vec<&str> {
        self.iter().flat_map(|(name, kind)| kind.keys(name)).collect()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that every flat key belongs to one field and every kind is usable.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, kind) in self.iter() {
            match kind {
                FilterKind::OneOf { options } if options.is_empty() => {
                    return Err(SchemaError::EmptyOptions {
                        field: name.to_string(),
                    });
                }
                FilterKind::Pair {
                    value_key,
                    label_key,
                } if value_key.is_empty() || label_key.is_empty() => {
                    return Err(SchemaError::EmptyKey {
                        field: name.to_string(),
                    });
                }
                FilterKind::DateRange { from_key, to_key } if from_key.is_empty() || to_key.is_empty() => {
                    return Err(SchemaError::EmptyKey {
                        field: name.to_string(),
                    });
                }
                _ => {}
            }

            for key in kind.keys(name) {
                if let Some(first) = owners.insert(key, name) {
                    return Err(SchemaError::KeyConflict {
                        key: key.to_string(),
                        first: first.to_string(),
                        second: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keys_expand_compound_kinds() {
        let schema = FilterSchema::new()
            .field("q", FilterKind::Input)
            .field(
                "created",
                FilterKind::DateRange {
                    from_key: "created_from".into(),
                    to_key: "created_to".into(),
                },
            );
        assert_eq!(schema.query_keys(), vec!["created_from", "created_to", "q"]);
    }

    #[test]
    fn test_validate_rejects_key_conflict() {
        let schema = FilterSchema::new().field("company_id", FilterKind::Input).field(
            "company",
            FilterKind::Pair {
                value_key: "company_id".into(),
                label_key: "company_name".into(),
            },
        );
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, SchemaError::KeyConflict { key, .. } if key == "company_id"));
    }

    #[test]
    fn test_validate_rejects_empty_options() {
        let schema = FilterSchema::new().field("status", FilterKind::OneOf { options: vec![] });
        assert!(matches!(schema.validate(), Err(SchemaError::EmptyOptions { .. })));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let err = FilterSchema::from_json(r#"{ "status": { "kind": "slider" } }"#).unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }
}
