//! Errors surfaced by the console session layer.

use folio_client::StoreError;
use folio_core::CoreError;

/// Errors from the editor session and batch browser.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// No task is assigned to the session user.
    #[error("No task is currently assigned")]
    NoTask,

    /// The browser has no selected task to act on.
    #[error("No task is selected")]
    NoSelection,

    /// The assigned task's phase is not editable by the session user.
    #[error("The assigned task is not editable by this user")]
    NotEditable,

    /// Another mutation is still in flight.
    #[error("Another action is still in progress")]
    Busy,

    /// `confirm_trash` was called without a preceding `request_trash`.
    #[error("No trash request is awaiting confirmation")]
    NoTrashRequested,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
