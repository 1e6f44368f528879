//! Scripted editor commands.
//!
//! A command is one step a host (or a test) can replay against a
//! [`CanvasEditor`]. Commands are plain serde data so a whole editing session
//! can be written down as a JSON array.

use serde::{Deserialize, Serialize};

use crate::editor::CanvasEditor;
use crate::element::{ElementId, ElementKind, ElementType};
use crate::error::{CanvasError, CanvasResult};
use crate::event::InputEvent;
use crate::interaction::{NudgeDirection, ResizeHandle};
use crate::patch::ElementPatch;
use crate::text_edit::ToolbarAction;

/// How a command names the element it acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRef {
    /// The currently selected element.
    #[default]
    Selected,
    /// The element inserted at this position (0 = first insertion still alive).
    Index(usize),
}

impl ElementRef {
    /// Resolve against the editor's current state.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] or [`CanvasError::IndexOutOfRange`].
    pub fn resolve(self, editor: &CanvasEditor) -> CanvasResult<ElementId> {
        match self {
            Self::Selected => editor.selected_id().ok_or(CanvasError::NoSelection),
            Self::Index(i) => editor
                .store()
                .nth_inserted(i)
                .map(|e| e.id)
                .ok_or(CanvasError::IndexOutOfRange(i)),
        }
    }
}

/// One replayable editor operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Insert an element with its type's default payload.
    Insert {
        /// Element type.
        element_type: ElementType,
        /// Left offset.
        x: f32,
        /// Top offset.
        y: f32,
    },

    /// Insert an image element referencing an existing URL.
    InsertImage {
        /// Image URL.
        src: String,
        /// Left offset.
        x: f32,
        /// Top offset.
        y: f32,
    },

    /// Patch an element.
    Update {
        /// Element to patch.
        #[serde(default)]
        target: ElementRef,
        /// Fields to change.
        patch: ElementPatch,
    },

    /// Select an element.
    Select {
        /// Element to select.
        target: ElementRef,
    },

    /// Remove an element.
    Remove {
        /// Element to remove.
        #[serde(default)]
        target: ElementRef,
    },

    /// Feed a raw input event.
    Event {
        /// The event.
        event: InputEvent,
    },

    /// Nudge the selection.
    Nudge {
        /// Direction of travel.
        direction: NudgeDirection,
    },

    /// Bring the selection to the front.
    BringToFront,

    /// Send the selection to the back.
    SendToBack,

    /// Delete the selection.
    DeleteSelected,

    /// Drag one handle of the selection to `(x, y)` and release.
    Resize {
        /// Handle to drag.
        handle: ResizeHandle,
        /// Final cursor X.
        x: f32,
        /// Final cursor Y.
        y: f32,
    },

    /// Open an inline edit on the selected text element.
    BeginTextEdit,

    /// Replace the text edit buffer.
    SetText {
        /// New buffer contents.
        text: String,
    },

    /// Commit the text edit.
    CommitText,

    /// Cancel the text edit.
    CancelText,

    /// Open, fill and commit a text edit on the selection in one step.
    EditText {
        /// Text to write.
        text: String,
    },

    /// Apply a toolbar style action.
    Toolbar {
        /// The action.
        action: ToolbarAction,
    },
}

impl CanvasEditor {
    /// Execute one scripted command.
    ///
    /// Returns the id of the element the command inserted, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the command needs a selection, element or text
    /// edit that does not exist.
    pub fn apply(&mut self, command: &EditorCommand) -> CanvasResult<Option<ElementId>> {
        tracing::trace!(?command, "Applying command");
        match command {
            EditorCommand::Insert { element_type, x, y } => {
                return Ok(Some(self.insert(*element_type, *x, *y)));
            }
            EditorCommand::InsertImage { src, x, y } => {
                let kind = ElementKind::Image { src: src.clone() };
                return Ok(Some(self.insert_kind(kind, *x, *y)));
            }
            EditorCommand::Update { target, patch } => {
                let id = target.resolve(self)?;
                self.update(id, patch);
            }
            EditorCommand::Select { target } => {
                let id = target.resolve(self)?;
                self.select(id)?;
            }
            EditorCommand::Remove { target } => {
                let id = target.resolve(self)?;
                self.remove(id);
            }
            EditorCommand::Event { event } => {
                let outcome = self.handle_event(event);
                tracing::trace!(?outcome, "Event handled");
            }
            EditorCommand::Nudge { direction } => {
                self.nudge(*direction)?;
            }
            EditorCommand::BringToFront => {
                self.bring_to_front()?;
            }
            EditorCommand::SendToBack => {
                self.send_to_back()?;
            }
            EditorCommand::DeleteSelected => {
                self.delete_selected()?;
            }
            EditorCommand::Resize { handle, x, y } => {
                self.begin_resize(*handle)?;
                self.pointer_move(*x, *y);
                self.pointer_up();
            }
            EditorCommand::BeginTextEdit => {
                self.begin_text_edit()?;
            }
            EditorCommand::SetText { text } => self.set_text_buffer(text.clone())?,
            EditorCommand::CommitText => {
                self.commit_text_edit()?;
            }
            EditorCommand::CancelText => {
                self.cancel_text_edit()?;
            }
            EditorCommand::EditText { text } => {
                self.begin_text_edit()?;
                self.set_text_buffer(text.clone())?;
                self.commit_text_edit()?;
            }
            EditorCommand::Toolbar { action } => self.apply_toolbar(*action)?,
        }
        Ok(None)
    }

    /// Execute commands in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first command error.
    pub fn apply_all<'a, I>(&mut self, commands: I) -> CanvasResult<()>
    where
        I: IntoIterator<Item = &'a EditorCommand>,
    {
        for command in commands {
            self.apply(command)?;
        }
        Ok(())
    }
}

/// Parse a JSON array of commands.
///
/// # Errors
///
/// Returns [`CanvasError::Serialization`] for malformed input.
pub fn parse_script(json: &str) -> CanvasResult<Vec<EditorCommand>> {
    Ok(serde_json::from_str(json)?)
}
