//! Action dispatch error types

/// Errors that can occur when dispatching a bulk or row action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// No action with this id is registered.
    #[error("Unknown action '{id}'")]
    UnknownAction { id: String },

    /// The action is registered but currently disabled.
    #[error("Action '{id}' is disabled")]
    Disabled { id: String },

    /// A bulk action was dispatched with nothing selected.
    #[error("Bulk action '{id}' requires a non-empty selection")]
    EmptySelection { id: String },
}

impl ActionError {
    /// Returns the id of the action this error is about.
    pub fn action_id(&self) -> &str {
        match self {
            Self::UnknownAction { id } | Self::Disabled { id } | Self::EmptySelection { id } => id,
        }
    }
}
