//! # Letterpress Core
//!
//! Editing logic for the Letterpress newsletter canvas: a free-form surface of
//! images, shapes, text blocks and links that is later rendered to HTML.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CanvasEditor                 │
//! ├─────────────────────────────────────────────┤
//! │  Element Store   │  Interaction Controller  │
//! │  - Typed kinds   │  - Resize handles        │
//! │  - Typed patches │  - Nudge / layering      │
//! │  - Z-order query │  - Hit testing           │
//! ├─────────────────────────────────────────────┤
//! │  Selection       │  Text Edit Session       │
//! │  - By id only    │  - Buffered text         │
//! │                  │  - Toolbar actions       │
//! ├─────────────────────────────────────────────┤
//! │  Upload scope: validate, send, cancel       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod patch;
pub mod selection;
pub mod store;
pub mod text_edit;
pub mod upload;

pub use command::{parse_script, EditorCommand, ElementRef};
pub use editor::{CanvasEditor, EditorConfig, SessionId};
pub use element::{
    Element, ElementId, ElementKind, ElementType, FontStyle, FontWeight, LinkStyle, LinkTarget,
    ShapeKind, TextAlign, Transform, MIN_ELEMENT_SIZE,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{EventOutcome, InputEvent, KeyModifiers};
pub use interaction::{
    handle_at, InteractionController, InteractionState, LayerOrder, NudgeDirection,
    ResizeCapture, ResizeHandle, HANDLE_HIT_RADIUS, NUDGE_STEP,
};
pub use patch::{ContentPatch, ElementPatch, PatchOutcome};
pub use selection::Selection;
pub use store::ElementStore;
pub use text_edit::{TextEditSession, ToolbarAction, FONT_SIZE_STEP};
pub use upload::{
    CompletedUpload, PendingUpload, UploadError, UploadFile, UploadResponse, UploadResult,
    UploadService, DEFAULT_MAX_UPLOAD_BYTES,
};

/// Letterpress core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
