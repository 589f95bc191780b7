//! Bulk and row action dispatch.
//!
//! Action lists are declarative: entries carry an id, a label, a disabled
//! flag and optional confirmation options, interleaved with separators.
//! Handlers are capability traits, so closures work as handlers too.

use std::fmt;

use crate::error::ActionError;

use super::Selection;

/// Informational result of running an action. The grid never acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran; `affected` is the number of rows it touched.
    Completed { affected: usize },
    /// The action ran and failed.
    Failed { message: String },
}

/// An operation over the selected row ids.
pub trait BulkAction {
    fn execute(&self, ids: &[String]) -> ActionOutcome;
}

impl<F> BulkAction for F
where
    F: Fn(&[String]) -> ActionOutcome,
{
    fn execute(&self, ids: &[String]) -> ActionOutcome {
        self(ids)
    }
}

/// An operation over a single row.
pub trait RowAction<T> {
    fn execute(&self, row: &T) -> ActionOutcome;
}

impl<T, F> RowAction<T> for F
where
    F: Fn(&T) -> ActionOutcome,
{
    fn execute(&self, row: &T) -> ActionOutcome {
        self(row)
    }
}

/// What the host's confirmation dialog should say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    /// Render the confirm button as destructive.
    pub destructive: bool,
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".into(),
            destructive: false,
        }
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// One action in a menu.
pub struct ActionEntry<H: ?Sized> {
    pub id: String,
    pub label: String,
    pub disabled: bool,
    pub confirm: Option<ConfirmOptions>,
    handler: Box<H>,
}

impl<H: ?Sized> ActionEntry<H> {
    /// Set the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Require the host to confirm before running.
    pub fn confirm(mut self, options: ConfirmOptions) -> Self {
        self.confirm = Some(options);
        self
    }
}

impl<H: ?Sized> fmt::Debug for ActionEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionEntry")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("confirm", &self.confirm)
            .finish_non_exhaustive()
    }
}

impl ActionEntry<dyn BulkAction> {
    /// Creates a bulk action entry.
    pub fn bulk(id: impl Into<String>, label: impl Into<String>, handler: impl BulkAction + 'static) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            confirm: None,
            handler: Box::new(handler),
        }
    }
}

impl<T: 'static> ActionEntry<dyn RowAction<T>> {
    /// Creates a row action entry.
    pub fn row(id: impl Into<String>, label: impl Into<String>, handler: impl RowAction<T> + 'static) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            confirm: None,
            handler: Box::new(handler),
        }
    }
}

/// An action menu item: an entry or a visual separator.
pub enum ActionItem<H: ?Sized> {
    Entry(ActionEntry<H>),
    Separator,
}

impl<H: ?Sized> fmt::Debug for ActionItem<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionItem::Entry(entry) => entry.fmt(f),
            ActionItem::Separator => f.write_str("Separator"),
        }
    }
}

/// The result of asking to run an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<P> {
    /// The action ran immediately.
    Executed(ActionOutcome),
    /// The host must ask the user, then call `resolve` with the answer.
    NeedsConfirmation(PendingDispatch<P>),
}

/// An action waiting on the host's confirmation dialog.
///
/// The payload is captured at dispatch time, so later selection changes do
/// not alter what a confirmed action runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDispatch<P> {
    pub action_id: String,
    pub options: ConfirmOptions,
    pub payload: P,
}

/// An ordered action menu.
pub struct ActionList<H: ?Sized> {
    items: Vec<ActionItem<H>>,
}

impl<H: ?Sized> ActionList<H> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an entry (builder form).
    pub fn entry(mut self, entry: ActionEntry<H>) -> Self {
        self.items.push(ActionItem::Entry(entry));
        self
    }

    /// Appends a separator (builder form).
    pub fn separator(mut self) -> Self {
        self.items.push(ActionItem::Separator);
        self
    }

    /// All items, separators included, in menu order.
    pub fn items(&self) -> &[ActionItem<H>] {
        &self.items
    }

    /// Entries only, in menu order.
    pub fn entries(&self) -> impl Iterator<Item = &ActionEntry<H>> {
        self.items.iter().filter_map(|item| match item {
            ActionItem::Entry(entry) => Some(entry),
            ActionItem::Separator => None,
        })
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&ActionEntry<H>> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Sets the disabled flag of an entry. Returns `false` if the id is unknown.
    pub fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        for item in &mut self.items {
            if let ActionItem::Entry(entry) = item
                && entry.id == id
            {
                entry.disabled = disabled;
                return true;
            }
        }
        false
    }

    fn runnable(&self, id: &str) -> Result<&ActionEntry<H>, ActionError> {
        let entry = self.get(id).ok_or_else(|| ActionError::UnknownAction { id: id.to_string() })?;
        if entry.disabled {
            return Err(ActionError::Disabled { id: id.to_string() });
        }
        Ok(entry)
    }
}

impl<H: ?Sized> Default for ActionList<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for ActionList<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// Actions over the current selection.
pub type BulkActions = ActionList<dyn BulkAction>;

/// Actions over a single row.
pub type RowActions<T> = ActionList<dyn RowAction<T>>;

impl ActionList<dyn BulkAction> {
    /// The whole bulk menu is disabled while nothing is selected.
    pub fn is_enabled(&self, selection: &Selection) -> bool {
        !selection.is_empty()
    }

    /// Whether a single bulk action can run right now.
    pub fn can_run(&self, id: &str, selection: &Selection) -> bool {
        self.is_enabled(selection) && self.get(id).is_some_and(|entry| !entry.disabled)
    }

    /// Runs a bulk action on the selected ids, or asks for confirmation first.
    ///
    /// The selection is not cleared; that is up to the host.
    pub fn dispatch(&self, id: &str, selection: &Selection) -> Result<Dispatch<Vec<String>>, ActionError> {
        let entry = self.runnable(id)?;
        if selection.is_empty() {
            return Err(ActionError::EmptySelection { id: id.to_string() });
        }
        let ids = selection.selected();
        if let Some(options) = &entry.confirm {
            log::debug!("[actions] '{}' awaiting confirmation for {} rows", id, ids.len());
            return Ok(Dispatch::NeedsConfirmation(PendingDispatch {
                action_id: entry.id.clone(),
                options: options.clone(),
                payload: ids,
            }));
        }
        log::debug!("[actions] running '{}' on {} rows", id, ids.len());
        Ok(Dispatch::Executed(entry.handler.execute(&ids)))
    }

    /// Finishes a confirmed (or declined) bulk dispatch.
    ///
    /// Returns `Ok(None)` when the user declined.
    pub fn resolve(
        &self,
        pending: PendingDispatch<Vec<String>>,
        confirmed: bool,
    ) -> Result<Option<ActionOutcome>, ActionError> {
        if !confirmed {
            log::debug!("[actions] '{}' declined", pending.action_id);
            return Ok(None);
        }
        let entry = self.runnable(&pending.action_id)?;
        log::debug!("[actions] running confirmed '{}' on {} rows", pending.action_id, pending.payload.len());
        Ok(Some(entry.handler.execute(&pending.payload)))
    }
}

impl<T: Clone> ActionList<dyn RowAction<T>> {
    /// Runs a row action, or asks for confirmation first.
    pub fn dispatch(&self, id: &str, row: &T) -> Result<Dispatch<T>, ActionError> {
        let entry = self.runnable(id)?;
        if let Some(options) = &entry.confirm {
            return Ok(Dispatch::NeedsConfirmation(PendingDispatch {
                action_id: entry.id.clone(),
                options: options.clone(),
                payload: row.clone(),
            }));
        }
        log::debug!("[actions] running row action '{}'", id);
        Ok(Dispatch::Executed(entry.handler.execute(row)))
    }

    /// Finishes a confirmed (or declined) row dispatch.
    pub fn resolve(&self, pending: PendingDispatch<T>, confirmed: bool) -> Result<Option<ActionOutcome>, ActionError> {
        if !confirmed {
            return Ok(None);
        }
        let entry = self.runnable(&pending.action_id)?;
        Ok(Some(entry.handler.execute(&pending.payload)))
    }
}
