//! The canvas editor aggregate.
//!
//! [`CanvasEditor`] owns the element store, the selection, the resize
//! controller and the text edit session of one editing session. Every change
//! goes through its command methods or [`CanvasEditor::handle_event`].

use std::fmt;

use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::element::{Element, ElementId, ElementKind, ElementType, Transform};
use crate::error::{CanvasError, CanvasResult};
use crate::event::{EventOutcome, InputEvent, KeyModifiers};
use crate::interaction::{
    handle_at, InteractionController, InteractionState, LayerOrder, NudgeDirection, ResizeHandle,
};
use crate::patch::{ContentPatch, ElementPatch, PatchOutcome};
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::text_edit::{TextEditSession, ToolbarAction};
use crate::upload::{
    CompletedUpload, PendingUpload, UploadError, UploadFile, DEFAULT_MAX_UPLOAD_BYTES,
};

/// Identifier of one editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editor settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Largest image payload accepted for upload.
    pub max_upload_bytes: usize,
    /// Base used to resolve relative upload locations.
    pub asset_base_url: Option<Url>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            asset_base_url: None,
        }
    }
}

/// One editing session over a canvas.
///
/// # Example
///
/// ```
/// use letterpress_core::{CanvasEditor, ElementType, InputEvent, EventOutcome};
///
/// let mut editor = CanvasEditor::default();
/// let id = editor.insert(ElementType::Shape, 50.0, 50.0);
///
/// let outcome = editor.handle_event(&InputEvent::PointerDown { x: 60.0, y: 60.0 });
/// assert_eq!(outcome, EventOutcome::Selected(id));
///
/// editor.handle_event(&InputEvent::key("ArrowRight"));
/// assert_eq!(editor.store().get(id).map(|e| e.transform.x), Some(60.0));
/// ```
#[derive(Debug)]
pub struct CanvasEditor {
    session: SessionId,
    store: ElementStore,
    selection: Selection,
    interaction: InteractionController,
    text_edit: Option<TextEditSession>,
    config: EditorConfig,
    cancel: CancellationToken,
}

impl Default for CanvasEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CanvasEditor {
    /// Open a session over an empty canvas.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let session = SessionId::new();
        tracing::debug!(%session, "Editor session opened");
        Self {
            session,
            store: ElementStore::new(),
            selection: Selection::default(),
            interaction: InteractionController::default(),
            text_edit: None,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// This session's identifier.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Read access to the elements.
    #[must_use]
    pub const fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Id of the selected element, if it still exists.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selection.id(&self.store)
    }

    /// The selected element, looked up now.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selection.resolve(&self.store)
    }

    /// The open text edit session, if any.
    #[must_use]
    pub const fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    /// State of the resize controller.
    #[must_use]
    pub const fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ---- element commands ----

    /// Add an element of `element_type` with its default payload.
    pub fn insert(&mut self, element_type: ElementType, x: f32, y: f32) -> ElementId {
        self.store.insert_default(element_type, x, y).id
    }

    /// Add an element with an explicit payload.
    pub fn insert_kind(&mut self, kind: ElementKind, x: f32, y: f32) -> ElementId {
        self.store.insert(kind, x, y).id
    }

    /// Patch an element. `None` if `id` is unknown.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> Option<PatchOutcome> {
        self.store.update(id, patch)
    }

    /// Remove an element and every piece of session state pointing at it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.store.remove(id)?;
        self.selection.clear_if(id);
        self.interaction.release_if(id);
        if self.text_edit.as_ref().is_some_and(|s| s.element() == id) {
            tracing::debug!(element = %id, "Discarding text edit of removed element");
            self.text_edit = None;
        }
        Some(removed)
    }

    // ---- selection ----

    /// Select `id`, replacing any previous selection.
    ///
    /// An open text edit on another element is committed first.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] if `id` is not in the store.
    pub fn select(&mut self, id: ElementId) -> CanvasResult<()> {
        if !self.store.contains(id) {
            return Err(CanvasError::ElementNotFound(id.to_string()));
        }
        if self.text_edit.as_ref().is_some_and(|s| s.element() != id) {
            self.commit_text_edit()?;
        }
        self.selection.select(id);
        tracing::debug!(element = %id, "Selected");
        Ok(())
    }

    fn require_selected(&self) -> CanvasResult<&Element> {
        self.selected().ok_or(CanvasError::NoSelection)
    }

    // ---- discrete commands on the selection ----

    /// Move the selected element one step, clamped at the canvas origin.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn nudge(&mut self, direction: NudgeDirection) -> CanvasResult<Transform> {
        let element = self.require_selected()?;
        let id = element.id;
        let (x, y) = direction.apply(&element.transform);
        self.store.update(id, &ElementPatch::position(x, y));
        self.transform_of(id)
    }

    /// Move the selected element to the front or back of the stack.
    ///
    /// Returns the new z-index.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn reorder(&mut self, order: LayerOrder) -> CanvasResult<i64> {
        let id = self.require_selected()?.id;
        let range = self.store.z_range().ok_or(CanvasError::NoSelection)?;
        let z_index = order.target_z(range);
        self.store.update(id, &ElementPatch::z_index(z_index));
        tracing::debug!(element = %id, ?order, z_index, "Reordered");
        Ok(z_index)
    }

    /// Put the selected element above every other one.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn bring_to_front(&mut self) -> CanvasResult<i64> {
        self.reorder(LayerOrder::BringToFront)
    }

    /// Put the selected element below every other one.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn send_to_back(&mut self) -> CanvasResult<i64> {
        self.reorder(LayerOrder::SendToBack)
    }

    /// Remove the selected element and clear the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn delete_selected(&mut self) -> CanvasResult<ElementId> {
        let id = self.require_selected()?.id;
        self.remove(id);
        tracing::debug!(element = %id, "Deleted selected element");
        Ok(id)
    }

    fn transform_of(&self, id: ElementId) -> CanvasResult<Transform> {
        self.store
            .get(id)
            .map(|e| e.transform)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))
    }

    // ---- resize gesture ----

    /// Start dragging `handle` of the selected element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected.
    pub fn begin_resize(&mut self, handle: ResizeHandle) -> CanvasResult<()> {
        let id = self.require_selected()?.id;
        self.interaction.begin_resize(id, handle);
        Ok(())
    }

    /// Forward a pointer move to the resize controller.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<Transform> {
        self.interaction.pointer_move(&mut self.store, x, y)
    }

    /// End the resize gesture. Returns whether one was in progress.
    pub fn pointer_up(&mut self) -> bool {
        self.interaction.pointer_up().is_some()
    }

    // ---- inline text editing ----

    /// Open an inline edit on the selected text element, seeded with its text.
    ///
    /// Re-opening the element already being edited keeps the current buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if nothing is selected, or
    /// [`CanvasError::NotTextElement`] if the selection is not a text element.
    pub fn begin_text_edit(&mut self) -> CanvasResult<ElementId> {
        let element = self.require_selected()?;
        let id = element.id;
        if !element.is_text() {
            return Err(CanvasError::NotTextElement(id.to_string()));
        }
        if self.text_edit.as_ref().is_some_and(|s| s.element() == id) {
            return Ok(id);
        }
        let seed = element.text().unwrap_or_default().to_string();
        if self.text_edit.is_some() {
            self.commit_text_edit()?;
        }
        tracing::debug!(element = %id, "Text edit opened");
        self.text_edit = Some(TextEditSession::new(id, seed));
        Ok(id)
    }

    fn session_mut(&mut self) -> CanvasResult<&mut TextEditSession> {
        self.text_edit.as_mut().ok_or(CanvasError::NoTextEdit)
    }

    /// Replace the buffer of the open text edit.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoTextEdit`] if no edit is open.
    pub fn set_text_buffer(&mut self, text: impl Into<String>) -> CanvasResult<()> {
        self.session_mut()?.set_buffer(text);
        Ok(())
    }

    /// Append a line break to the open text edit.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoTextEdit`] if no edit is open.
    pub fn insert_line_break(&mut self) -> CanvasResult<()> {
        self.session_mut()?.insert_line_break();
        Ok(())
    }

    /// Write the buffer to the element and close the edit.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoTextEdit`] if no edit is open.
    pub fn commit_text_edit(&mut self) -> CanvasResult<ElementId> {
        let session = self.text_edit.take().ok_or(CanvasError::NoTextEdit)?;
        let (id, text) = session.into_parts();
        if self
            .store
            .update(id, &ElementPatch::content(ContentPatch::text(text)))
            .is_none()
        {
            tracing::debug!(element = %id, "Text edit target vanished before commit");
        } else {
            tracing::debug!(element = %id, "Text edit committed");
        }
        Ok(id)
    }

    /// Close the edit without writing the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoTextEdit`] if no edit is open.
    pub fn cancel_text_edit(&mut self) -> CanvasResult<ElementId> {
        let session = self.text_edit.take().ok_or(CanvasError::NoTextEdit)?;
        tracing::debug!(element = %session.element(), "Text edit cancelled");
        Ok(session.element())
    }

    /// Apply a toolbar style action straight to the store.
    ///
    /// Targets the element under edit, or the selection when no edit is open.
    /// The text buffer is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NoSelection`] if there is no target, or
    /// [`CanvasError::NotTextElement`] if the target is not a text element.
    pub fn apply_toolbar(&mut self, action: ToolbarAction) -> CanvasResult<()> {
        let target = match &self.text_edit {
            Some(session) => self
                .store
                .get(session.element())
                .ok_or(CanvasError::NoSelection)?,
            None => self.require_selected()?,
        };
        let id = target.id;
        let content = action
            .to_patch(&target.kind)
            .ok_or_else(|| CanvasError::NotTextElement(id.to_string()))?;
        self.store.update(id, &ElementPatch::content(content));
        tracing::debug!(element = %id, ?action, "Toolbar action applied");
        Ok(())
    }

    // ---- pointer and keyboard protocol ----

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown { x, y } => self.on_pointer_down(*x, *y),
            InputEvent::PointerMove { x, y } => self
                .pointer_move(*x, *y)
                .map_or(EventOutcome::Ignored, EventOutcome::Resized),
            InputEvent::PointerUp { .. } => {
                if self.pointer_up() {
                    EventOutcome::ResizeEnded
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::DoubleClick { x, y } => self.on_double_click(*x, *y),
            InputEvent::Key { key, modifiers } => self.on_key(key, *modifiers),
            InputEvent::TextInput { value } => match self.set_text_buffer(value.clone()) {
                Ok(()) => EventOutcome::TextBufferChanged,
                Err(_) => EventOutcome::Ignored,
            },
            InputEvent::Blur => self
                .commit_text_edit()
                .map_or(EventOutcome::Ignored, EventOutcome::TextEditCommitted),
        }
    }

    fn on_pointer_down(&mut self, x: f32, y: f32) -> EventOutcome {
        if let Some(handle) = self
            .selected()
            .and_then(|e| handle_at(&e.transform, x, y))
        {
            if self.text_edit.is_some() {
                // the text field loses focus before the handle takes the pointer
                let _ = self.commit_text_edit();
            }
            return match self.begin_resize(handle) {
                Ok(()) => EventOutcome::ResizeStarted(handle),
                Err(_) => EventOutcome::Ignored,
            };
        }

        let Some(id) = self.store.element_at(x, y) else {
            // empty canvas keeps the selection, only the text field blurs
            return self
                .commit_text_edit()
                .map_or(EventOutcome::Ignored, EventOutcome::TextEditCommitted);
        };

        if self.selection.is(id) && self.store.get(id).is_some_and(Element::is_text) {
            return self.open_text_edit(id);
        }
        match self.select(id) {
            Ok(()) => EventOutcome::Selected(id),
            Err(_) => EventOutcome::Ignored,
        }
    }

    fn on_double_click(&mut self, x: f32, y: f32) -> EventOutcome {
        let Some(id) = self.store.element_at(x, y) else {
            return EventOutcome::Ignored;
        };
        if self.select(id).is_err() {
            return EventOutcome::Ignored;
        }
        if self.store.get(id).is_some_and(Element::is_text) {
            self.open_text_edit(id)
        } else {
            EventOutcome::Selected(id)
        }
    }

    fn open_text_edit(&mut self, id: ElementId) -> EventOutcome {
        if self.text_edit.as_ref().is_some_and(|s| s.element() == id) {
            return EventOutcome::Ignored;
        }
        self.begin_text_edit()
            .map_or(EventOutcome::Ignored, EventOutcome::TextEditStarted)
    }

    fn on_key(&mut self, key: &str, modifiers: KeyModifiers) -> EventOutcome {
        if self.text_edit.is_some() {
            return match key {
                "Enter" if modifiers.shift => self
                    .insert_line_break()
                    .map_or(EventOutcome::Ignored, |()| EventOutcome::TextBufferChanged),
                "Enter" => self
                    .commit_text_edit()
                    .map_or(EventOutcome::Ignored, EventOutcome::TextEditCommitted),
                "Escape" => self
                    .cancel_text_edit()
                    .map_or(EventOutcome::Ignored, EventOutcome::TextEditCancelled),
                _ => EventOutcome::Ignored,
            };
        }

        let outcome = if let Some(direction) = NudgeDirection::from_key(key) {
            self.nudge(direction).map(EventOutcome::Nudged)
        } else {
            match key {
                "Delete" | "Backspace" => self.delete_selected().map(EventOutcome::Deleted),
                "]" => self.bring_to_front().map(EventOutcome::Reordered),
                "[" => self.send_to_back().map(EventOutcome::Reordered),
                _ => Ok(EventOutcome::Ignored),
            }
        };
        outcome.unwrap_or(EventOutcome::Ignored)
    }

    // ---- image upload ----

    /// Validate `file` and bind it to this session for sending.
    ///
    /// No request is made here; nothing is sent for a rejected file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Cancelled`] after teardown, or the validation
    /// error from [`UploadFile::validate`].
    pub fn begin_upload(&self, file: UploadFile, x: f32, y: f32) -> CanvasResult<PendingUpload> {
        if self.is_closed() {
            return Err(UploadError::Cancelled.into());
        }
        match file.validate(self.config.max_upload_bytes) {
            Ok(mime) => {
                tracing::info!(
                    filename = %file.filename,
                    size = file.bytes.len(),
                    mime,
                    "Upload accepted"
                );
            }
            Err(e) => {
                tracing::warn!(filename = %file.filename, error = %e, "Upload refused before sending");
                return Err(e.into());
            }
        }
        Ok(PendingUpload {
            session: self.session,
            token: self.cancel.child_token(),
            file,
            x,
            y,
        })
    }

    /// Insert an image element for a finished upload.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::StaleSession`] if the upload was started by
    /// another session, [`UploadError::Cancelled`] after teardown, or the
    /// error from resolving the returned location.
    pub fn finish_upload(&mut self, completed: CompletedUpload) -> CanvasResult<ElementId> {
        if completed.session != self.session {
            tracing::warn!(
                upload_session = %completed.session,
                session = %self.session,
                "Discarding upload from another session"
            );
            return Err(UploadError::StaleSession.into());
        }
        if self.is_closed() {
            tracing::warn!(session = %self.session, "Discarding upload after teardown");
            return Err(UploadError::Cancelled.into());
        }
        let src = completed
            .response
            .resolve_url(self.config.asset_base_url.as_ref())?;
        let id = self.insert_kind(
            ElementKind::Image {
                src: src.to_string(),
            },
            completed.x,
            completed.y,
        );
        tracing::info!(element = %id, %src, "Inserted uploaded image");
        Ok(id)
    }

    // ---- teardown ----

    /// End the session: cancel in-flight uploads, release the pointer and
    /// drop any open text edit without writing it.
    pub fn teardown(&mut self) {
        if self.is_closed() {
            return;
        }
        self.cancel.cancel();
        self.interaction.release();
        self.text_edit = None;
        tracing::debug!(session = %self.session, "Editor session closed");
    }
}

impl Drop for CanvasEditor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{FontWeight, TextAlign};
    use crate::upload::{UploadResponse, UploadResult, UploadService};
    use async_trait::async_trait;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn text_at(editor: &mut CanvasEditor, text: &str) -> ElementId {
        let id = editor.insert(ElementType::Text, 0.0, 0.0);
        editor.update(id, &ElementPatch::content(ContentPatch::text(text)));
        id
    }

    fn text_of(editor: &CanvasEditor, id: ElementId) -> String {
        editor
            .store()
            .get(id)
            .and_then(Element::text)
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_layering_from_contiguous_stack() {
        let mut editor = CanvasEditor::default();
        let _a = editor.insert(ElementType::Shape, 0.0, 0.0);
        let b = editor.insert(ElementType::Shape, 0.0, 0.0);
        let _c = editor.insert(ElementType::Shape, 0.0, 0.0);
        editor.select(b).expect("b exists");

        assert_eq!(editor.bring_to_front().expect("selected"), 3);
        assert_eq!(editor.send_to_back().expect("selected"), -1);
        assert_eq!(editor.selected().map(|e| e.transform.z_index), Some(-1));
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Image, 0.0, 0.0);
        editor.select(id).expect("exists");

        assert_eq!(editor.delete_selected().expect("selected"), id);
        assert!(editor.selected_id().is_none());
        assert!(editor.store().is_empty());
        assert!(matches!(editor.delete_selected(), Err(CanvasError::NoSelection)));
    }

    #[test]
    fn test_remove_releases_resize_capture() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Shape, 0.0, 0.0);
        editor.select(id).expect("exists");
        editor.begin_resize(ResizeHandle::SouthEast).expect("selected");

        editor.remove(id);

        assert_eq!(editor.interaction_state(), InteractionState::Idle);
        assert!(editor.pointer_move(300.0, 300.0).is_none());
    }

    #[test]
    fn test_text_cancel_keeps_original() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.select(id).expect("exists");
        editor.begin_text_edit().expect("text element");
        editor.set_text_buffer("B").expect("open");

        assert_eq!(editor.cancel_text_edit().expect("open"), id);
        assert_eq!(text_of(&editor, id), "A");
        assert!(editor.text_edit().is_none());
    }

    #[test]
    fn test_text_commit_writes_buffer() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.select(id).expect("exists");
        editor.begin_text_edit().expect("text element");
        editor.set_text_buffer("B").expect("open");

        editor.commit_text_edit().expect("open");
        assert_eq!(text_of(&editor, id), "B");
    }

    #[test]
    fn test_text_edit_requires_text_element() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Link, 0.0, 0.0);
        editor.select(id).expect("exists");
        assert!(matches!(
            editor.begin_text_edit(),
            Err(CanvasError::NotTextElement(_))
        ));
    }

    #[test]
    fn test_toolbar_survives_cancel() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.select(id).expect("exists");
        editor.begin_text_edit().expect("text element");
        editor.apply_toolbar(ToolbarAction::ToggleBold).expect("text");
        editor
            .apply_toolbar(ToolbarAction::Align(TextAlign::Right))
            .expect("text");
        editor.cancel_text_edit().expect("open");

        match editor.store().get(id).map(|e| &e.kind) {
            Some(ElementKind::Text {
                font_weight,
                text_align,
                text,
                ..
            }) => {
                assert_eq!(*font_weight, FontWeight::Bold);
                assert_eq!(*text_align, TextAlign::Right);
                assert_eq!(text, "A");
            }
            other => panic!("unexpected element: {other:?}"),
        }
    }

    #[test]
    fn test_selecting_other_element_commits_edit() {
        let mut editor = CanvasEditor::default();
        let text = text_at(&mut editor, "A");
        let shape = editor.insert(ElementType::Shape, 500.0, 500.0);
        editor.select(text).expect("exists");
        editor.begin_text_edit().expect("text element");
        editor.set_text_buffer("typed").expect("open");

        editor.select(shape).expect("exists");

        assert_eq!(text_of(&editor, text), "typed");
        assert!(editor.text_edit().is_none());
    }

    #[test]
    fn test_click_selects_then_opens_text_edit() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "Hello");

        let first = editor.handle_event(&InputEvent::PointerDown { x: 50.0, y: 20.0 });
        assert_eq!(first, EventOutcome::Selected(id));
        editor.handle_event(&InputEvent::PointerUp { x: 50.0, y: 20.0 });

        let second = editor.handle_event(&InputEvent::PointerDown { x: 50.0, y: 20.0 });
        assert_eq!(second, EventOutcome::TextEditStarted(id));
        assert_eq!(editor.text_edit().map(TextEditSession::buffer), Some("Hello"));
    }

    #[test]
    fn test_enter_commits_shift_enter_breaks_line() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.handle_event(&InputEvent::DoubleClick { x: 10.0, y: 10.0 });
        editor.handle_event(&InputEvent::TextInput {
            value: "line one".to_string(),
        });

        assert_eq!(
            editor.handle_event(&InputEvent::shift_key("Enter")),
            EventOutcome::TextBufferChanged
        );
        assert_eq!(
            editor.handle_event(&InputEvent::key("Enter")),
            EventOutcome::TextEditCommitted(id)
        );
        assert_eq!(text_of(&editor, id), "line one\n");
    }

    #[test]
    fn test_escape_cancels_via_event() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.handle_event(&InputEvent::DoubleClick { x: 10.0, y: 10.0 });
        editor.handle_event(&InputEvent::TextInput {
            value: "B".to_string(),
        });

        assert_eq!(
            editor.handle_event(&InputEvent::key("Escape")),
            EventOutcome::TextEditCancelled(id)
        );
        assert_eq!(text_of(&editor, id), "A");
    }

    #[test]
    fn test_empty_canvas_click_keeps_selection() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Shape, 0.0, 0.0);
        editor.handle_event(&InputEvent::PointerDown { x: 10.0, y: 10.0 });

        let outcome = editor.handle_event(&InputEvent::PointerDown { x: 900.0, y: 900.0 });

        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(editor.selected_id(), Some(id));
    }

    #[test]
    fn test_keys_ignored_while_editing_text() {
        let mut editor = CanvasEditor::default();
        let id = text_at(&mut editor, "A");
        editor.handle_event(&InputEvent::DoubleClick { x: 10.0, y: 10.0 });

        assert_eq!(
            editor.handle_event(&InputEvent::key("Backspace")),
            EventOutcome::Ignored
        );
        assert!(editor.store().contains(id));
    }

    #[test]
    fn test_resize_via_events() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Shape, 100.0, 100.0);
        editor.select(id).expect("exists");

        // south-east corner of a 150x100 shape at (100, 100)
        let started = editor.handle_event(&InputEvent::PointerDown { x: 250.0, y: 200.0 });
        assert_eq!(started, EventOutcome::ResizeStarted(ResizeHandle::SouthEast));

        let moved = editor.handle_event(&InputEvent::PointerMove { x: 280.0, y: 160.0 });
        match moved {
            EventOutcome::Resized(t) => {
                assert_eq!((t.x, t.y, t.width, t.height), (100.0, 100.0, 180.0, 60.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(
            editor.handle_event(&InputEvent::PointerUp { x: 280.0, y: 160.0 }),
            EventOutcome::ResizeEnded
        );
        assert_eq!(
            editor.handle_event(&InputEvent::PointerMove { x: 400.0, y: 400.0 }),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn test_nudge_key_clamps_at_origin() {
        let mut editor = CanvasEditor::default();
        let id = editor.insert(ElementType::Shape, 5.0, 30.0);
        editor.select(id).expect("exists");

        match editor.handle_event(&InputEvent::key("ArrowLeft")) {
            EventOutcome::Nudged(t) => assert_eq!((t.x, t.y), (0.0, 30.0)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_bracket_keys_reorder() {
        let mut editor = CanvasEditor::default();
        let a = editor.insert(ElementType::Shape, 0.0, 0.0);
        editor.insert(ElementType::Shape, 0.0, 0.0);
        editor.select(a).expect("exists");

        assert_eq!(
            editor.handle_event(&InputEvent::key("]")),
            EventOutcome::Reordered(2)
        );
        assert_eq!(
            editor.handle_event(&InputEvent::key("[")),
            EventOutcome::Reordered(0)
        );
    }

    struct FixedService(UploadResponse);

    #[async_trait]
    impl UploadService for FixedService {
        async fn upload(&self, _file: UploadFile) -> UploadResult<UploadResponse> {
            Ok(self.0.clone())
        }
    }

    struct NeverAnswers;

    #[async_trait]
    impl UploadService for NeverAnswers {
        async fn upload(&self, _file: UploadFile) -> UploadResult<UploadResponse> {
            std::future::pending().await
        }
    }

    fn editor_with_base() -> CanvasEditor {
        CanvasEditor::new(EditorConfig {
            max_upload_bytes: 1024,
            asset_base_url: Url::parse("https://news.example.com/").ok(),
        })
    }

    #[tokio::test]
    async fn test_upload_inserts_image() {
        let mut editor = editor_with_base();
        let service = FixedService(UploadResponse {
            success: true,
            filename: Some("hero.png".to_string()),
            ..UploadResponse::default()
        });

        let pending = editor
            .begin_upload(UploadFile::new("hero.png", PNG.to_vec()), 40.0, 60.0)
            .expect("valid upload");
        let completed = pending.send(&service).await.expect("service answers");
        let id = editor.finish_upload(completed).expect("same session");

        let element = editor.store().get(id).expect("inserted");
        assert_eq!(
            element.kind,
            ElementKind::Image {
                src: "https://news.example.com/uploads/hero.png".to_string()
            }
        );
        assert_eq!((element.transform.x, element.transform.y), (40.0, 60.0));
    }

    #[test]
    fn test_oversized_upload_rejected_before_sending() {
        let editor = editor_with_base();
        let err = editor
            .begin_upload(UploadFile::new("big.png", PNG.repeat(200)), 0.0, 0.0)
            .expect_err("too large");
        assert!(matches!(
            err,
            CanvasError::Upload(UploadError::TooLarge { .. })
        ));
        assert!(editor.store().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_inserts_nothing() {
        let editor = editor_with_base();
        let service = FixedService(UploadResponse {
            success: false,
            message: Some("disk full".to_string()),
            ..UploadResponse::default()
        });
        let pending = editor
            .begin_upload(UploadFile::new("a.png", PNG.to_vec()), 0.0, 0.0)
            .expect("valid upload");

        let err = pending.send(&service).await.expect_err("rejected");
        assert!(matches!(err, UploadError::Rejected(reason) if reason == "disk full"));
        assert!(editor.store().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_cancels_inflight_upload() {
        let mut editor = editor_with_base();
        let pending = editor
            .begin_upload(UploadFile::new("slow.png", PNG.to_vec()), 0.0, 0.0)
            .expect("valid upload");

        editor.teardown();

        let err = pending.send(&NeverAnswers).await.expect_err("cancelled");
        assert!(matches!(err, UploadError::Cancelled));
        assert!(editor.store().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_editor_cancels_upload() {
        let editor = editor_with_base();
        let pending = editor
            .begin_upload(UploadFile::new("slow.png", PNG.to_vec()), 0.0, 0.0)
            .expect("valid upload");
        drop(editor);

        assert!(matches!(
            pending.send(&NeverAnswers).await,
            Err(UploadError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_upload_from_other_session_is_discarded() {
        let first = editor_with_base();
        let mut second = editor_with_base();
        let service = FixedService(UploadResponse {
            success: true,
            full_url: Some("https://cdn.example.com/x.png".to_string()),
            ..UploadResponse::default()
        });

        let completed = first
            .begin_upload(UploadFile::new("x.png", PNG.to_vec()), 0.0, 0.0)
            .expect("valid upload")
            .send(&service)
            .await
            .expect("service answers");

        assert!(matches!(
            second.finish_upload(completed),
            Err(CanvasError::Upload(UploadError::StaleSession))
        ));
        assert!(second.store().is_empty());
    }
}
