//! Inline text editing.
//!
//! A session buffers the text of one element until it is committed (blur or
//! Enter) or cancelled (Escape). Toolbar style actions are not buffered: the
//! editor writes them straight to the store, so cancelling a session never
//! rolls them back.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementKind, FontStyle, FontWeight, TextAlign};
use crate::patch::ContentPatch;

/// Step applied by the font size grow/shrink toolbar buttons.
pub const FONT_SIZE_STEP: f32 = 2.0;

/// An open inline edit of one text element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSession {
    element: ElementId,
    buffer: String,
}

impl TextEditSession {
    /// Open a session on `element`, seeded with its current text.
    #[must_use]
    pub fn new(element: ElementId, seed: impl Into<String>) -> Self {
        Self {
            element,
            buffer: seed.into(),
        }
    }

    /// Element being edited.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Current buffer contents.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer contents.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Append a line break (Shift+Enter).
    pub fn insert_line_break(&mut self) {
        self.buffer.push('\n');
    }

    /// Consume the session, yielding the element and the text to write.
    #[must_use]
    pub fn into_parts(self) -> (ElementId, String) {
        (self.element, self.buffer)
    }
}

/// Action from the floating text toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Flip between normal and bold.
    ToggleBold,
    /// Flip between normal and italic.
    ToggleItalic,
    /// Set the alignment.
    Align(TextAlign),
    /// Set an explicit font size.
    FontSize(f32),
    /// Grow the font by [`FONT_SIZE_STEP`].
    IncreaseFontSize,
    /// Shrink the font by [`FONT_SIZE_STEP`].
    DecreaseFontSize,
}

impl ToolbarAction {
    /// Content patch realizing this action on `kind`, or `None` if `kind` is
    /// not a text element.
    #[must_use]
    pub fn to_patch(self, kind: &ElementKind) -> Option<ContentPatch> {
        let ElementKind::Text {
            font_size,
            font_weight,
            font_style,
            ..
        } = kind
        else {
            return None;
        };

        let mut weight = None;
        let mut style = None;
        let mut align = None;
        let mut size = None;
        match self {
            Self::ToggleBold => {
                weight = Some(match font_weight {
                    FontWeight::Bold => FontWeight::Normal,
                    FontWeight::Normal => FontWeight::Bold,
                });
            }
            Self::ToggleItalic => {
                style = Some(match font_style {
                    FontStyle::Italic => FontStyle::Normal,
                    FontStyle::Normal => FontStyle::Italic,
                });
            }
            Self::Align(a) => align = Some(a),
            Self::FontSize(s) => size = Some(s),
            Self::IncreaseFontSize => size = Some(font_size + FONT_SIZE_STEP),
            Self::DecreaseFontSize => size = Some(font_size - FONT_SIZE_STEP),
        }

        Some(ContentPatch::Text {
            text: None,
            font_size: size,
            font_weight: weight,
            font_style: style,
            text_align: align,
            text_color: None,
            background_color: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_session_buffers_locally() {
        let id = ElementId::new();
        let mut session = TextEditSession::new(id, "Hello");
        session.set_buffer("Hello world");
        session.insert_line_break();
        assert_eq!(session.buffer(), "Hello world\n");
        let (element, text) = session.into_parts();
        assert_eq!(element, id);
        assert_eq!(text, "Hello world\n");
    }

    #[test]
    fn test_toggle_bold_flips_weight() {
        let kind = ElementKind::defaults(ElementType::Text);
        match ToolbarAction::ToggleBold.to_patch(&kind) {
            Some(ContentPatch::Text {
                font_weight, text, ..
            }) => {
                assert_eq!(font_weight, Some(FontWeight::Bold));
                assert!(text.is_none());
            }
            other => panic!("unexpected patch: {other:?}"),
        }
    }

    #[test]
    fn test_font_size_step() {
        let kind = ElementKind::defaults(ElementType::Text);
        match ToolbarAction::IncreaseFontSize.to_patch(&kind) {
            Some(ContentPatch::Text { font_size, .. }) => assert_eq!(font_size, Some(18.0)),
            other => panic!("unexpected patch: {other:?}"),
        }
    }

    #[test]
    fn test_toolbar_ignores_non_text() {
        let kind = ElementKind::defaults(ElementType::Link);
        assert!(ToolbarAction::ToggleItalic.to_patch(&kind).is_none());
    }

    #[test]
    fn test_toolbar_action_json() {
        let action: ToolbarAction =
            serde_json::from_str(r#"{"action": "align", "value": "center"}"#).expect("valid");
        assert_eq!(action, ToolbarAction::Align(TextAlign::Center));
        let toggle: ToolbarAction =
            serde_json::from_str(r#"{"action": "toggle_bold"}"#).expect("valid");
        assert_eq!(toggle, ToolbarAction::ToggleBold);
    }
}
