//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while producing or syncing HTML.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The canvas has no elements; the document was left untouched.
    #[error("Nothing to sync: the canvas is empty")]
    NothingToSync,
}
