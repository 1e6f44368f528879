//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, Transform};
use crate::interaction::ResizeHandle;

/// All input events the canvas editor can receive.
///
/// Coordinates are canvas pixels relative to the canvas top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Pointer moved.
    PointerMove {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Primary button released.
    PointerUp {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Two clicks in quick succession.
    DoubleClick {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Keyboard event.
    Key {
        /// Key name as reported by the browser (`Enter`, `ArrowUp`, ...).
        key: String,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// The inline text field's value changed.
    TextInput {
        /// Full new value of the field.
        value: String,
    },

    /// The inline text field lost focus.
    Blur,
}

impl InputEvent {
    /// Key press without modifiers.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Key press with Shift held.
    #[must_use]
    pub fn shift_key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            modifiers: KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
        }
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    #[serde(default)]
    pub shift: bool,
    /// Control key pressed.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt/Option key pressed.
    #[serde(default)]
    pub alt: bool,
    /// Meta/Command key pressed.
    #[serde(default)]
    pub meta: bool,
}

/// What the editor did in response to an [`InputEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Nothing changed.
    Ignored,
    /// An element became selected.
    Selected(ElementId),
    /// A resize gesture started.
    ResizeStarted(ResizeHandle),
    /// A resize step was committed.
    Resized(Transform),
    /// The resize gesture ended.
    ResizeEnded,
    /// An inline text edit opened.
    TextEditStarted(ElementId),
    /// The text buffer changed.
    TextBufferChanged,
    /// The text buffer was written to the element.
    TextEditCommitted(ElementId),
    /// The text buffer was discarded.
    TextEditCancelled(ElementId),
    /// The selected element moved by one nudge.
    Nudged(Transform),
    /// The selected element got a new z-index.
    Reordered(i64),
    /// The selected element was deleted.
    Deleted(ElementId),
}
