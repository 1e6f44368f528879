//! Partial updates applied to elements.
//!
//! A patch carries optional common fields plus at most one variant-specific
//! [`ContentPatch`]. Content patches for a different variant than the target
//! element are dropped at the store boundary instead of being attached to it.

use serde::{Deserialize, Serialize};

use crate::element::{
    Element, ElementKind, ElementType, FontStyle, FontWeight, LinkStyle, LinkTarget, ShapeKind,
    TextAlign,
};

/// Partial update of an element. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    /// New left offset.
    pub x: Option<f32>,
    /// New top offset.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New rotation in degrees.
    pub rotation: Option<f32>,
    /// New element opacity.
    pub opacity: Option<f32>,
    /// New stacking key.
    pub z_index: Option<i64>,
    /// Variant-specific fields.
    pub content: Option<ContentPatch>,
}

/// Variant-specific partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
#[allow(missing_docs)]
pub enum ContentPatch {
    /// Image fields.
    Image { src: Option<String> },
    /// Shape fields.
    Shape {
        shape: Option<ShapeKind>,
        color: Option<String>,
        stroke_width: Option<f32>,
        opacity: Option<f32>,
    },
    /// Text fields.
    Text {
        text: Option<String>,
        font_size: Option<f32>,
        font_weight: Option<FontWeight>,
        font_style: Option<FontStyle>,
        text_align: Option<TextAlign>,
        text_color: Option<String>,
        background_color: Option<String>,
    },
    /// Link fields.
    Link {
        text: Option<String>,
        url: Option<String>,
        target: Option<LinkTarget>,
        style: Option<LinkStyle>,
        background_color: Option<String>,
        text_color: Option<String>,
        font_size: Option<f32>,
    },
}

/// How a patch landed on its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Every field was applied.
    Applied,
    /// Common fields were applied; the content patch targeted another variant
    /// and was dropped.
    ForeignContentIgnored {
        /// Variant the content patch was written for.
        patch: ElementType,
        /// Variant of the element.
        element: ElementType,
    },
}

impl ContentPatch {
    /// Variant this patch targets.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Image { .. } => ElementType::Image,
            Self::Shape { .. } => ElementType::Shape,
            Self::Text { .. } => ElementType::Text,
            Self::Link { .. } => ElementType::Link,
        }
    }

    /// A text patch that only replaces the content string.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: Some(text.into()),
            font_size: None,
            font_weight: None,
            font_style: None,
            text_align: None,
            text_color: None,
            background_color: None,
        }
    }

    /// Merge onto `kind`. Returns `false` without touching `kind` on a variant
    /// mismatch.
    fn apply(&self, kind: &mut ElementKind) -> bool {
        match (self, kind) {
            (Self::Image { src: new_src }, ElementKind::Image { src }) => {
                set(src, new_src.as_ref());
            }
            (
                Self::Shape {
                    shape: new_shape,
                    color: new_color,
                    stroke_width: new_stroke,
                    opacity: new_opacity,
                },
                ElementKind::Shape {
                    shape,
                    color,
                    stroke_width,
                    opacity,
                },
            ) => {
                set(shape, new_shape.as_ref());
                set(color, new_color.as_ref());
                if let Some(w) = new_stroke {
                    *stroke_width = w.max(0.0);
                }
                if let Some(o) = new_opacity {
                    *opacity = clamp_unit(*o);
                }
            }
            (
                Self::Text {
                    text: new_text,
                    font_size: new_size,
                    font_weight: new_weight,
                    font_style: new_style,
                    text_align: new_align,
                    text_color: new_color,
                    background_color: new_background,
                },
                ElementKind::Text {
                    text,
                    font_size,
                    font_weight,
                    font_style,
                    text_align,
                    text_color,
                    background_color,
                },
            ) => {
                set(text, new_text.as_ref());
                if let Some(size) = new_size {
                    *font_size = size.max(1.0);
                }
                set(font_weight, new_weight.as_ref());
                set(font_style, new_style.as_ref());
                set(text_align, new_align.as_ref());
                set(text_color, new_color.as_ref());
                set(background_color, new_background.as_ref());
            }
            (
                Self::Link {
                    text: new_text,
                    url: new_url,
                    target: new_target,
                    style: new_style,
                    background_color: new_background,
                    text_color: new_color,
                    font_size: new_size,
                },
                ElementKind::Link {
                    text,
                    url,
                    target,
                    style,
                    background_color,
                    text_color,
                    font_size,
                },
            ) => {
                set(text, new_text.as_ref());
                set(url, new_url.as_ref());
                set(target, new_target.as_ref());
                set(style, new_style.as_ref());
                set(background_color, new_background.as_ref());
                set(text_color, new_color.as_ref());
                if let Some(size) = new_size {
                    *font_size = size.max(1.0);
                }
            }
            _ => return false,
        }
        true
    }
}

impl ElementPatch {
    /// Patch that moves the element's top-left corner.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that only sets the stacking key.
    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    /// Patch that only carries variant-specific fields.
    #[must_use]
    pub fn content(content: ContentPatch) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// Shallow-merge this patch onto `element`, enforcing the size floor and,
    /// on each axis the patch positions, the position floor.
    pub fn apply(&self, element: &mut Element) -> PatchOutcome {
        let t = &mut element.transform;
        set(&mut t.x, self.x.as_ref());
        set(&mut t.y, self.y.as_ref());
        set(&mut t.width, self.width.as_ref());
        set(&mut t.height, self.height.as_ref());
        set(&mut t.rotation, self.rotation.as_ref());
        set(&mut t.z_index, self.z_index.as_ref());
        *t = t.with_size_floor();
        if self.x.is_some() {
            t.x = t.x.max(0.0);
        }
        if self.y.is_some() {
            t.y = t.y.max(0.0);
        }
        if let Some(opacity) = self.opacity {
            element.opacity = clamp_unit(opacity);
        }

        let Some(content) = &self.content else {
            return PatchOutcome::Applied;
        };
        if content.apply(&mut element.kind) {
            PatchOutcome::Applied
        } else {
            PatchOutcome::ForeignContentIgnored {
                patch: content.element_type(),
                element: element.element_type(),
            }
        }
    }
}

fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
