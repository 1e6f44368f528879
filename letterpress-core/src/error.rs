//! Error types for canvas editor operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas editor operations.
///
/// Unknown ids on `update`/`remove` are not errors; those are reported through
/// `bool`/`Option` returns instead.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found in the store.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A command needs a selected element but nothing is selected.
    #[error("No element is selected")]
    NoSelection,

    /// Inline text editing was requested for an element that cannot be edited.
    #[error("Element {0} is not a text element")]
    NotTextElement(String),

    /// A text edit command arrived while no text edit session is open.
    #[error("No text edit session is open")]
    NoTextEdit,

    /// A scripted command referenced an element index that does not exist.
    #[error("No element at insertion index {0}")]
    IndexOutOfRange(usize),

    /// Command script serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Image upload failed.
    #[error(transparent)]
    Upload(#[from] crate::upload::UploadError),
}
