//! Filter staging controller: local drafts that only reach the applied query on apply/reset.

use std::collections::BTreeMap;

use crate::error::FilterError;
use crate::error::SchemaError;
use crate::model::Query;
use crate::model::QueryPatch;
use crate::model::QueryValue;

use super::FilterKind;
use super::FilterSchema;
use super::FilterValue;

/// The host side of the staging contract.
///
/// Implementations own the canonical query. Both callbacks must merge the
/// patch into the query and reset pagination to the first page in the same
/// update.
pub trait FilterHost {
    /// Called by [`FilterStaging::apply`] with the encoded drafts.
    fn on_apply(&mut self, patch: &QueryPatch);

    /// Called by [`FilterStaging::reset`] with the encoded kind defaults.
    fn on_reset(&mut self, patch: &QueryPatch);
}

/// Whether the drafts match what was last synced with the applied query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    /// Drafts equal the applied query.
    Clean,
    /// At least one draft was edited since the last sync.
    Dirty,
}

/// Per-field filter drafts seeded from, and written back to, the applied query.
///
/// Edits through [`set`](Self::set) stay local. [`apply`](Self::apply) and
/// [`reset`](Self::reset) hand one patch to the host. When the host changes
/// the filter keys by some other path, call [`reconcile`](Self::reconcile)
/// with the new query so stale drafts are replaced.
///
/// # Example
///
/// ```
/// use leadgrid_lib::filter::{FilterHost, FilterKind, FilterSchema, FilterStaging, FilterValue};
/// use leadgrid_lib::model::{Query, QueryPatch};
///
/// struct Host(Query);
///
/// impl FilterHost for Host {
///     fn on_apply(&mut self, patch: &QueryPatch) {
///         self.0.merge(patch);
///         self.0.set("page", 1i64);
///     }
///     fn on_reset(&mut self, patch: &QueryPatch) {
///         self.on_apply(patch);
///     }
/// }
///
/// let schema = FilterSchema::new().field("status", FilterKind::SingleSelect);
/// let mut host = Host(Query::new().with("page", 4i64));
/// let mut staging = FilterStaging::new(&host.0, schema).unwrap();
///
/// staging.set("status", FilterValue::choice("new")).unwrap();
/// assert!(staging.is_dirty());
///
/// staging.apply(&mut host);
/// assert_eq!(host.0.get("status").and_then(|v| v.as_text()), Some("new"));
/// assert_eq!(host.0.get("page").and_then(|v| v.as_int()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct FilterStaging {
    schema: FilterSchema,
    /// Current drafts, one per schema field.
    drafts: BTreeMap<String, FilterValue>,
    /// Drafts as of the last sync; `drafts != baseline` means dirty.
    baseline: BTreeMap<String, FilterValue>,
    /// Raw flat values as of the last sync, keyed by query key.
    synced: BTreeMap<String, QueryValue>,
}

impl FilterStaging {
    /// Creates a controller with drafts seeded from the applied query.
    pub fn new(applied: &Query, schema: FilterSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let mut staging = Self {
            schema,
            drafts: BTreeMap::new(),
            baseline: BTreeMap::new(),
            synced: BTreeMap::new(),
        };
        staging.seed(applied);
        Ok(staging)
    }

    /// Returns the schema this controller was built from.
    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    /// Returns whether any draft differs from the last sync.
    pub fn state(&self) -> StagingState {
        if self.drafts == self.baseline {
            StagingState::Clean
        } else {
            StagingState::Dirty
        }
    }

    /// Returns `true` if any draft differs from the last sync.
    pub fn is_dirty(&self) -> bool {
        self.state() == StagingState::Dirty
    }

    /// Returns the names of the fields whose draft differs from the last sync.
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.drafts
            .iter()
            .filter(|(name, value)| self.baseline.get(name.as_str()) != Some(*value))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns the draft of a field.
    pub fn value(&self, field: &str) -> Option<&FilterValue> {
        self.drafts.get(field)
    }

    /// Iterates over all drafts in field-name order.
    pub fn drafts(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.drafts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrows a `{value, set}` binding for one field.
    pub fn bind(&mut self, field: &str) -> Result<FieldBinding<'_>, FilterError> {
        let Some((name, kind)) = self.schema.get_key_value(field) else {
            log::error!("[filter] binding requested for undeclared field '{}'", field);
            return Err(FilterError::unknown_field(field));
        };
        let value = self
            .drafts
            .get_mut(name)
            .ok_or_else(|| FilterError::unknown_field(field))?;
        Ok(FieldBinding { name, kind, value })
    }

    /// Replaces the draft of one field. Never touches the applied query.
    pub fn set(&mut self, field: &str, value: impl Into<FilterValue>) -> Result<(), FilterError> {
        self.bind(field)?.set(value)
    }

    /// Puts one field's draft back to its kind default.
    pub fn clear(&mut self, field: &str) -> Result<(), FilterError> {
        let mut binding = self.bind(field)?;
        let default = binding.kind.default_value();
        binding.set(default)
    }

    /// Encodes every draft into one patch without syncing anything.
    pub fn patch(&self) -> QueryPatch {
        Self::encode(&self.schema, &self.drafts)
    }

    /// Encodes the drafts, hands the patch to the host and marks the drafts clean.
    ///
    /// Calling this twice without edits in between yields equal patches.
    pub fn apply<H: FilterHost + ?Sized>(&mut self, host: &mut H) -> QueryPatch {
        let patch = self.patch();
        log::debug!("[filter] applying {} keys ({} fields dirty)", patch.len(), self.dirty_fields().len());
        host.on_apply(&patch);
        self.mark_synced(&patch);
        patch
    }

    /// Resets every draft to its kind default and hands the default patch to the host.
    pub fn reset<H: FilterHost + ?Sized>(&mut self, host: &mut H) -> QueryPatch {
        self.drafts = self
            .schema
            .iter()
            .map(|(name, kind)| (name.to_string(), kind.default_value()))
            .collect();
        let patch = self.patch();
        log::debug!("[filter] resetting {} fields to defaults", self.drafts.len());
        host.on_reset(&patch);
        self.mark_synced(&patch);
        patch
    }

    /// Re-seeds the drafts if the query's filter keys changed since the last sync.
    ///
    /// Call this on every external query update. Returns `true` when the drafts
    /// were re-derived; pending edits are discarded in that case. Changes to
    /// keys outside the schema (paging, sorting) are ignored.
    pub fn reconcile(&mut self, applied: &Query) -> bool {
        let changed: Vec<&str> = self
            .schema
            .query_keys()
            .into_iter()
            .filter(|key| self.synced.get(*key).unwrap_or(&QueryValue::Null) != applied.get_or_null(key))
            .collect();
        if changed.is_empty() {
            return false;
        }
        log::debug!("[filter] applied query changed externally ({:?}), re-seeding drafts", changed);
        self.seed(applied);
        true
    }

    fn seed(&mut self, applied: &Query) {
        self.drafts = self
            .schema
            .iter()
            .map(|(name, kind)| (name.to_string(), kind.decode(name, applied)))
            .collect();
        self.baseline = self.drafts.clone();
        self.synced = self
            .schema
            .query_keys()
            .into_iter()
            .map(|key| (key.to_string(), applied.get_or_null(key).clone()))
            .collect();
    }

    fn mark_synced(&mut self, patch: &QueryPatch) {
        self.baseline = self.drafts.clone();
        self.synced = patch.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    }

    fn encode(schema: &FilterSchema, drafts: &BTreeMap<String, FilterValue>) -> QueryPatch {
        let mut patch = QueryPatch::new();
        for (name, kind) in schema.iter() {
            match drafts.get(name) {
                Some(value) => kind.encode(name, value, &mut patch),
                None => kind.encode(name, &kind.default_value(), &mut patch),
            }
        }
        patch
    }
}

/// A borrowed `{value, set}` handle on one field's draft.
#[derive(Debug)]
pub struct FieldBinding<'a> {
    name: &'a str,
    kind: &'a FilterKind,
    value: &'a mut FilterValue,
}

impl FieldBinding<'_> {
    /// Returns the field name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the field's kind.
    pub fn kind(&self) -> &FilterKind {
        self.kind
    }

    /// Returns the current draft.
    pub fn value(&self) -> &FilterValue {
        self.value
    }

    /// Replaces the draft after checking it against the field's kind.
    pub fn set(&mut self, value: impl Into<FilterValue>) -> Result<(), FilterError> {
        *self.value = self.kind.check(self.name, value.into()).inspect_err(|err| {
            log::error!("[filter] rejected draft: {}", err);
        })?;
        Ok(())
    }
}
