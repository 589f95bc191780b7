//! Filter draft error types

/// Errors raised when editing a staged filter draft.
///
/// These are programmer errors: the host tried to write a field the schema
/// does not declare, or a value whose shape does not fit the field's kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The field is not declared in the filter schema.
    #[error("Filter field '{field}' is not declared in the schema")]
    UnknownField { field: String },

    /// The value shape does not match the field's kind.
    #[error("Filter field '{field}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The value is not one of the field's declared options.
    #[error("Filter field '{field}' does not accept '{value}'")]
    InvalidOption { field: String, value: String },
}

impl FilterError {
    /// Creates a new unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Returns the name of the field this error is about.
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownField { field }
            | Self::TypeMismatch { field, .. }
            | Self::InvalidOption { field, .. } => field,
        }
    }
}
