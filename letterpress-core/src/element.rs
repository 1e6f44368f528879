//! Canvas elements - the building blocks of a newsletter canvas.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest width or height an element may have after any mutation.
pub const MIN_ELEMENT_SIZE: f32 = 20.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Variant tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Uploaded or linked picture.
    Image,
    /// Rectangle, circle or triangle.
    Shape,
    /// Free text block.
    Text,
    /// Anchor rendered as a button or underlined text.
    Link,
}

impl ElementType {
    /// Default `(width, height)` for a freshly inserted element of this type.
    #[must_use]
    pub const fn default_size(self) -> (f32, f32) {
        match self {
            Self::Image => (200.0, 150.0),
            Self::Shape => (150.0, 100.0),
            Self::Text => (200.0, 50.0),
            Self::Link => (150.0, 40.0),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Text => "text",
            Self::Link => "link",
        };
        f.write_str(name)
    }
}

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Filled box.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the bounding box.
    Circle,
    /// Upward-pointing isosceles triangle.
    Triangle,
}

/// Font weight of text and link elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// CSS keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// Font style of text elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

impl FontStyle {
    /// CSS keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Horizontal alignment of text elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

impl TextAlign {
    /// CSS keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Browsing context a link opens in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// New tab (`_blank`).
    #[default]
    #[serde(rename = "_blank")]
    Blank,
    /// Same tab (`_self`).
    #[serde(rename = "_self")]
    SameTab,
}

impl LinkTarget {
    /// HTML `target` attribute value.
    #[must_use]
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Blank => "_blank",
            Self::SameTab => "_self",
        }
    }
}

/// Presentation of a link element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Padded box with a background colour.
    #[default]
    Button,
    /// Underlined inline text.
    Text,
}

/// Variant-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// A picture referenced by URL.
    Image {
        /// Absolute image URL.
        src: String,
    },

    /// A filled geometric shape.
    Shape {
        /// Which primitive to draw.
        shape: ShapeKind,
        /// Fill colour.
        color: String,
        /// Border width in pixels.
        stroke_width: f32,
        /// Shape-local opacity, independent of the element opacity.
        opacity: f32,
    },

    /// A block of text.
    Text {
        /// Text content.
        text: String,
        /// Font size in pixels.
        font_size: f32,
        /// Font weight.
        font_weight: FontWeight,
        /// Font style.
        font_style: FontStyle,
        /// Horizontal alignment.
        text_align: TextAlign,
        /// Text colour.
        text_color: String,
        /// Background colour.
        background_color: String,
    },

    /// A hyperlink.
    Link {
        /// Anchor text.
        text: String,
        /// Link destination.
        url: String,
        /// Tab the link opens in.
        target: LinkTarget,
        /// Button or inline text presentation.
        style: LinkStyle,
        /// Background colour (button style).
        background_color: String,
        /// Text colour.
        text_color: String,
        /// Font size in pixels.
        font_size: f32,
    },
}

impl ElementKind {
    /// Payload a freshly inserted element of `element_type` starts with.
    #[must_use]
    pub fn defaults(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Image => Self::Image { src: String::new() },
            ElementType::Shape => Self::Shape {
                shape: ShapeKind::Rectangle,
                color: "#3b82f6".to_string(),
                stroke_width: 0.0,
                opacity: 1.0,
            },
            ElementType::Text => Self::Text {
                text: "Double-click to edit".to_string(),
                font_size: 16.0,
                font_weight: FontWeight::Normal,
                font_style: FontStyle::Normal,
                text_align: TextAlign::Left,
                text_color: "#000000".to_string(),
                background_color: "transparent".to_string(),
            },
            ElementType::Link => Self::Link {
                text: "Click here".to_string(),
                url: "https://example.com".to_string(),
                target: LinkTarget::Blank,
                style: LinkStyle::Button,
                background_color: "#3b82f6".to_string(),
                text_color: "#ffffff".to_string(),
                font_size: 16.0,
            },
        }
    }

    /// Variant tag of this payload.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Image { .. } => ElementType::Image,
            Self::Shape { .. } => ElementType::Shape,
            Self::Text { .. } => ElementType::Text,
            Self::Link { .. } => ElementType::Link,
        }
    }
}

/// Position, size and stacking of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// X position (pixels from the canvas left edge).
    pub x: f32,
    /// Y position (pixels from the canvas top edge).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Stacking key; not contiguous, may be negative.
    pub z_index: i64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            z_index: 0,
        }
    }
}

impl Transform {
    /// Clamp size to [`MIN_ELEMENT_SIZE`].
    #[must_use]
    pub fn with_size_floor(mut self) -> Self {
        self.width = self.width.max(MIN_ELEMENT_SIZE);
        self.height = self.height.max(MIN_ELEMENT_SIZE);
        self
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A canvas element with content, placement and opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Variant payload.
    pub kind: ElementKind,
    /// Position, size, rotation and stacking.
    pub transform: Transform,
    /// Element-level opacity (0.0 to 1.0).
    pub opacity: f32,
}

impl Element {
    /// Create a new element with the given payload and its type's default size.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let (width, height) = kind.element_type().default_size();
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform {
                width,
                height,
                ..Transform::default()
            },
            opacity: 1.0,
        }
    }

    /// Place the top-left corner at `(x, y)`.
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    /// Variant tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this is a text element (the only kind with inline editing).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    /// Current text content for text and link elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { text, .. } | ElementKind::Link { text, .. } => Some(text),
            ElementKind::Image { .. } | ElementKind::Shape { .. } => None,
        }
    }

    /// Check if a point (in canvas coordinates) is within this element.
    ///
    /// Rotation is not taken into account; the hit region is the unrotated
    /// bounding box.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let t = &self.transform;
        x >= t.x && x <= t.right() && y >= t.y && y <= t.bottom()
    }
}
