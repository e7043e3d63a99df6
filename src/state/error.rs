//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No inbox account selected
    #[error("No inbox account selected")]
    NoAccountSelected,

    /// No dialog selected
    #[error("No dialog selected")]
    NoDialogSelected,

    /// Entity not found in state
    #[error("Not found in state: {0}")]
    NotFound(String),

    /// Generic state error
    #[error("State error: {0}")]
    Other(String),
}
