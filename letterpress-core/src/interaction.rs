//! Direct manipulation: handle-drag resizing, nudging and layer reordering.
//!
//! Resizing is the only continuous interaction. It is a two-state machine:
//!
//! ```text
//!            pointer-down on handle
//!   Idle ───────────────────────────▶ Resizing(element, handle)
//!    ▲                                   │  pointer-move: recompute + commit
//!    └───────── pointer-up / teardown ───┘
//! ```
//!
//! Pointer moves are only consumed while a [`ResizeCapture`] is held.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, Transform};
use crate::patch::ElementPatch;
use crate::store::ElementStore;

/// Distance moved by one nudge, in canvas pixels.
pub const NUDGE_STEP: f32 = 10.0;

/// Half-size of the square hit area around each resize handle.
pub const HANDLE_HIT_RADIUS: f32 = 6.0;

/// One of the eight drag points on a selected element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    /// Top edge.
    #[serde(rename = "n")]
    North,
    /// Bottom edge.
    #[serde(rename = "s")]
    South,
    /// Right edge.
    #[serde(rename = "e")]
    East,
    /// Left edge.
    #[serde(rename = "w")]
    West,
    /// Top-right corner.
    #[serde(rename = "ne")]
    NorthEast,
    /// Top-left corner.
    #[serde(rename = "nw")]
    NorthWest,
    /// Bottom-right corner.
    #[serde(rename = "se")]
    SouthEast,
    /// Bottom-left corner.
    #[serde(rename = "sw")]
    SouthWest,
}

impl ResizeHandle {
    /// All handles, corners first so they win overlapping hit areas.
    pub const ALL: [Self; 8] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::North,
        Self::East,
        Self::South,
        Self::West,
    ];

    /// Position of this handle on the bounding box of `t`.
    #[must_use]
    pub fn point(self, t: &Transform) -> (f32, f32) {
        let cx = t.x + t.width / 2.0;
        let cy = t.y + t.height / 2.0;
        match self {
            Self::NorthWest => (t.x, t.y),
            Self::North => (cx, t.y),
            Self::NorthEast => (t.right(), t.y),
            Self::East => (t.right(), cy),
            Self::SouthEast => (t.right(), t.bottom()),
            Self::South => (cx, t.bottom()),
            Self::SouthWest => (t.x, t.bottom()),
            Self::West => (t.x, cy),
        }
    }

    /// Geometry after dragging this handle to `(cursor_x, cursor_y)`.
    ///
    /// Computed from the cursor offset relative to the element's top-left
    /// corner, not from an incremental delta, then floored.
    #[must_use]
    pub fn resize(self, t: &Transform, cursor_x: f32, cursor_y: f32) -> Transform {
        let mx = cursor_x - t.x;
        let my = cursor_y - t.y;
        let mut next = *t;

        // Horizontal component.
        match self {
            Self::East | Self::NorthEast | Self::SouthEast => next.width = mx,
            Self::West | Self::NorthWest | Self::SouthWest => {
                next.width = t.width - mx;
                next.x = (t.x + mx).max(0.0);
            }
            Self::North | Self::South => {}
        }

        // Vertical component.
        match self {
            Self::South | Self::SouthEast | Self::SouthWest => next.height = my,
            Self::North | Self::NorthWest | Self::NorthEast => {
                next.height = t.height - my;
                next.y = (t.y + my).max(0.0);
            }
            Self::East | Self::West => {}
        }

        next.with_size_floor()
    }

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub const fn moves_x(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub const fn moves_y(self) -> bool {
        matches!(self, Self::North | Self::NorthWest | Self::NorthEast)
    }

    /// Store patch committing `next`; only the edges this handle drags are
    /// written, so the anchored corner keeps its position.
    #[must_use]
    pub fn patch(self, next: &Transform) -> ElementPatch {
        ElementPatch {
            x: self.moves_x().then_some(next.x),
            y: self.moves_y().then_some(next.y),
            width: Some(next.width),
            height: Some(next.height),
            ..ElementPatch::default()
        }
    }
}

/// Find the handle of `t` under `(x, y)`, if any.
#[must_use]
pub fn handle_at(t: &Transform, x: f32, y: f32) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let (hx, hy) = handle.point(t);
        (x - hx).abs() <= HANDLE_HIT_RADIUS && (y - hy).abs() <= HANDLE_HIT_RADIUS
    })
}

/// Direction of a nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    /// Towards the top edge.
    Up,
    /// Towards the bottom edge.
    Down,
    /// Towards the left edge.
    Left,
    /// Towards the right edge.
    Right,
}

impl NudgeDirection {
    /// Map a keyboard key name (`ArrowUp`, ...) to a direction.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Position of `t` after one nudge, clamped to the canvas origin.
    #[must_use]
    pub fn apply(self, t: &Transform) -> (f32, f32) {
        let (dx, dy) = match self {
            Self::Up => (0.0, -NUDGE_STEP),
            Self::Down => (0.0, NUDGE_STEP),
            Self::Left => (-NUDGE_STEP, 0.0),
            Self::Right => (NUDGE_STEP, 0.0),
        };
        ((t.x + dx).max(0.0), (t.y + dy).max(0.0))
    }
}

/// Layer reorder command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrder {
    /// Place above every other element.
    BringToFront,
    /// Place below every other element.
    SendToBack,
}

impl LayerOrder {
    /// New `z_index` given the store's current `(min, max)` range.
    ///
    /// The range only grows; it is never renormalized.
    #[must_use]
    pub fn target_z(self, (min, max): (i64, i64)) -> i64 {
        match self {
            Self::BringToFront => max.saturating_add(1),
            Self::SendToBack => min.saturating_sub(1),
        }
    }
}

/// Pointer capture held for the duration of one resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeCapture {
    /// Element being resized.
    pub element: ElementId,
    /// Handle being dragged.
    pub handle: ResizeHandle,
}

/// State of the interaction controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// No gesture in progress; pointer moves are ignored.
    #[default]
    Idle,
    /// A handle is being dragged.
    Resizing(ResizeCapture),
}

/// Translates resize pointer events into store mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Whether a resize gesture is in progress.
    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        matches!(self.state, InteractionState::Resizing(_))
    }

    /// `Idle -> Resizing`: acquire the pointer for `element`'s `handle`.
    ///
    /// Starting a new gesture while one is active replaces it.
    pub fn begin_resize(&mut self, element: ElementId, handle: ResizeHandle) {
        tracing::debug!(%element, ?handle, "Resize started");
        self.state = InteractionState::Resizing(ResizeCapture { element, handle });
    }

    /// Handle a pointer move at `(x, y)`.
    ///
    /// While resizing, recomputes geometry from the live store entry and
    /// commits it immediately; returns the committed transform. Returns
    /// `None` while idle. If the element has disappeared the capture is
    /// released.
    pub fn pointer_move(&mut self, store: &mut ElementStore, x: f32, y: f32) -> Option<Transform> {
        let InteractionState::Resizing(capture) = self.state else {
            return None;
        };
        let Some(current) = store.get(capture.element).map(|e| e.transform) else {
            tracing::debug!(element = %capture.element, "Resize target vanished; releasing pointer");
            self.release();
            return None;
        };

        let next = capture.handle.resize(&current, x, y);
        store.update(capture.element, &capture.handle.patch(&next));
        store.get(capture.element).map(|e| e.transform)
    }

    /// `Resizing -> Idle` on pointer-up. The last committed geometry stays.
    pub fn pointer_up(&mut self) -> Option<ResizeCapture> {
        let InteractionState::Resizing(capture) = self.state else {
            return None;
        };
        tracing::debug!(element = %capture.element, "Resize finished");
        self.release();
        Some(capture)
    }

    /// Drop any pointer capture without touching the store.
    pub fn release(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Release the capture if it belongs to `element`.
    pub fn release_if(&mut self, element: ElementId) {
        if matches!(self.state, InteractionState::Resizing(c) if c.element == element) {
            self.release();
        }
    }
}
