//! Canvas export to an HTML fragment.
//!
//! Every element becomes an absolutely positioned box inside one relative
//! container, emitted in ascending z-order so document order matches
//! stacking order.

use std::fmt::Write;

use letterpress_core::{
    Element, ElementKind, ElementStore, LinkStyle, LinkTarget, ShapeKind, Transform,
};

/// Configuration for HTML export.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlConfig {
    /// Smallest container height in pixels.
    pub min_height: f32,
    /// CSS `border` of the container.
    pub border: String,
    /// CSS class of the container.
    pub container_class: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            min_height: 400.0,
            border: "1px solid #e5e7eb".to_string(),
            container_class: "visual-editor-canvas".to_string(),
        }
    }
}

/// Renders an [`ElementStore`] to HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    config: HtmlConfig,
}

impl HtmlRenderer {
    /// Create a renderer with the given configuration.
    #[must_use]
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// Create a renderer with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Render every element of `store` into one container.
    ///
    /// Pure: the same store always produces the same string.
    #[must_use]
    pub fn render(&self, store: &ElementStore) -> String {
        let elements = store.query();
        let height = elements
            .iter()
            .map(|e| e.transform.bottom())
            .fold(self.config.min_height, f32::max);

        let mut html = String::with_capacity(256 + elements.len() * 512);
        let _ = write!(
            html,
            "<div class=\"{}\" style=\"position: relative; width: 100%; min-height: {height}px; border: {}; overflow: hidden;\">",
            escape_xml(&self.config.container_class),
            escape_xml(&self.config.border),
        );
        for element in &elements {
            html.push('\n');
            render_element(&mut html, element);
        }
        html.push_str("\n</div>");

        tracing::debug!(elements = elements.len(), bytes = html.len(), "Rendered canvas HTML");
        html
    }
}

/// Render `store` with the default configuration.
#[must_use]
pub fn render_fragment(store: &ElementStore) -> String {
    HtmlRenderer::with_defaults().render(store)
}

/// Render a single element: positioning wrapper plus variant body.
fn render_element(html: &mut String, element: &Element) {
    let tf = &element.transform;
    let _ = write!(
        html,
        "<div style=\"position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; z-index: {}; opacity: {}; transform: rotate({}deg);\">",
        tf.x, tf.y, tf.width, tf.height, tf.z_index, element.opacity, tf.rotation,
    );

    match &element.kind {
        ElementKind::Image { src } => {
            let _ = write!(
                html,
                "<img src=\"{}\" alt=\"\" style=\"width: {}px; height: {}px; object-fit: cover; display: block;\">",
                escape_xml(src),
                tf.width,
                tf.height,
            );
        }

        ElementKind::Shape {
            shape,
            color,
            stroke_width,
            opacity,
        } => render_shape(html, tf, *shape, color, *stroke_width, *opacity),

        ElementKind::Link {
            text,
            url,
            target,
            style,
            background_color,
            text_color,
            font_size,
        } => {
            let rel = match target {
                LinkTarget::Blank => " rel=\"noopener noreferrer\"",
                LinkTarget::SameTab => "",
            };
            let look = match style {
                LinkStyle::Button => format!(
                    "display: inline-block; padding: 10px 20px; background-color: {}; color: {}; font-size: {font_size}px; text-decoration: none; border-radius: 4px;",
                    escape_xml(background_color),
                    escape_xml(text_color),
                ),
                LinkStyle::Text => format!(
                    "color: {}; font-size: {font_size}px; text-decoration: underline;",
                    escape_xml(text_color),
                ),
            };
            let _ = write!(
                html,
                "<a href=\"{}\" target=\"{}\"{rel} style=\"{look}\">{}</a>",
                escape_xml(url),
                target.as_attr(),
                escape_xml(text),
            );
        }

        ElementKind::Text {
            text,
            font_size,
            font_weight,
            font_style,
            text_align,
            text_color,
            background_color,
        } => {
            let _ = write!(
                html,
                "<div style=\"width: 100%; height: 100%; font-size: {font_size}px; font-weight: {}; font-style: {}; text-align: {}; color: {}; background-color: {}; white-space: pre-wrap; word-wrap: break-word;\">{}</div>",
                font_weight.as_css(),
                font_style.as_css(),
                text_align.as_css(),
                escape_xml(text_color),
                escape_xml(background_color),
                escape_xml(text),
            );
        }
    }

    html.push_str("</div>");
}

fn render_shape(
    html: &mut String,
    tf: &Transform,
    shape: ShapeKind,
    color: &str,
    stroke_width: f32,
    opacity: f32,
) {
    let color = escape_xml(color);
    match shape {
        // zero-size box; the coloured bottom border forms the triangle
        ShapeKind::Triangle => {
            let half = tf.width / 2.0;
            let _ = write!(
                html,
                "<div style=\"width: 0; height: 0; border-left: {half}px solid transparent; border-right: {half}px solid transparent; border-bottom: {}px solid {color}; opacity: {opacity};\"></div>",
                tf.height,
            );
        }
        ShapeKind::Rectangle | ShapeKind::Circle => {
            let radius = if shape == ShapeKind::Circle {
                " border-radius: 50%;"
            } else {
                ""
            };
            let border = if stroke_width > 0.0 {
                format!(" border: {stroke_width}px solid rgba(0, 0, 0, 0.5);")
            } else {
                String::new()
            };
            let _ = write!(
                html,
                "<div style=\"width: 100%; height: 100%; box-sizing: border-box; background-color: {color}; opacity: {opacity};{radius}{border}\"></div>",
            );
        }
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
