//! Scene element model.
//!
//! Each drawable primitive carries a typed attribute record for its kind
//! plus a free-form string map for everything else, so documents loaded
//! from outside round-trip without losing unknown attributes.

use crate::transform::fmt_number;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Layer id every element starts on.
pub const DEFAULT_LAYER_ID: &str = "default";

/// Default text styling applied to new labels.
pub const DEFAULT_TEXT_FILL: &str = "#000000";
pub const DEFAULT_FONT_SIZE: f64 = 18.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_FONT_WEIGHT: &str = "normal";
pub const DEFAULT_TEXT_ANCHOR: &str = "start";

/// Placeholder content for freshly created text labels.
pub const DEFAULT_LABEL_TEXT: &str = "New Label";

/// Default dimensions for image labels and uploaded images.
pub const DEFAULT_IMAGE_SIZE: f64 = 50.0;
pub const DEFAULT_UPLOADED_IMAGE_SIZE: f64 = 100.0;

/// Generate a fresh unique element id.
pub fn generate_element_id() -> String {
    format!("element-{}", Uuid::new_v4())
}

/// The primitive kinds the scene understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
    Image,
    Group,
    Defs,
    ClipPath,
    Mask,
    Gradient,
    Pattern,
}

impl ElementKind {
    /// Map a document tag name onto a kind. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        match tag.to_ascii_lowercase().as_str() {
            "rect" => Some(ElementKind::Rect),
            "circle" => Some(ElementKind::Circle),
            "ellipse" => Some(ElementKind::Ellipse),
            "line" => Some(ElementKind::Line),
            "polyline" => Some(ElementKind::Polyline),
            "polygon" => Some(ElementKind::Polygon),
            "path" => Some(ElementKind::Path),
            "text" => Some(ElementKind::Text),
            "image" => Some(ElementKind::Image),
            "g" => Some(ElementKind::Group),
            "defs" => Some(ElementKind::Defs),
            "clippath" => Some(ElementKind::ClipPath),
            "mask" => Some(ElementKind::Mask),
            "lineargradient" | "radialgradient" | "gradient" => Some(ElementKind::Gradient),
            "pattern" => Some(ElementKind::Pattern),
            _ => None,
        }
    }

    /// The document tag name for this kind.
    pub fn tag_name(&self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Polyline => "polyline",
            ElementKind::Polygon => "polygon",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Group => "g",
            ElementKind::Defs => "defs",
            ElementKind::ClipPath => "clipPath",
            ElementKind::Mask => "mask",
            ElementKind::Gradient => "linearGradient",
            ElementKind::Pattern => "pattern",
        }
    }

    /// Human-readable label for panels and summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Rect => "Rectangle",
            ElementKind::Circle => "Circle",
            ElementKind::Ellipse => "Ellipse",
            ElementKind::Line => "Line",
            ElementKind::Polyline => "Polyline",
            ElementKind::Polygon => "Polygon",
            ElementKind::Path => "Path",
            ElementKind::Text => "Text",
            ElementKind::Image => "Image",
            ElementKind::Group => "Group",
            ElementKind::Defs => "Defs",
            ElementKind::ClipPath => "Clip Path",
            ElementKind::Mask => "Mask",
            ElementKind::Gradient => "Gradient",
            ElementKind::Pattern => "Pattern",
        }
    }
}

/// Typed per-kind attribute records.
///
/// Geometry lives here; presentational attributes live in [`ElementStyle`];
/// anything unrecognized is preserved verbatim in the element's `extra` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        ry: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: String,
    },
    Polygon {
        points: String,
    },
    Path {
        d: String,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
        font_family: String,
        font_weight: String,
        text_anchor: String,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
    },
    /// Structural kinds carry no typed geometry of their own.
    Container {
        kind: ElementKind,
    },
}

impl ElementShape {
    /// Empty shape record for a kind.
    pub fn for_kind(kind: ElementKind) -> ElementShape {
        match kind {
            ElementKind::Rect => ElementShape::Rect {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
                rx: 0.0,
                ry: 0.0,
            },
            ElementKind::Circle => ElementShape::Circle {
                cx: 0.0,
                cy: 0.0,
                r: 0.0,
            },
            ElementKind::Ellipse => ElementShape::Ellipse {
                cx: 0.0,
                cy: 0.0,
                rx: 0.0,
                ry: 0.0,
            },
            ElementKind::Line => ElementShape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 0.0,
                y2: 0.0,
            },
            ElementKind::Polyline => ElementShape::Polyline {
                points: String::new(),
            },
            ElementKind::Polygon => ElementShape::Polygon {
                points: String::new(),
            },
            ElementKind::Path => ElementShape::Path { d: String::new() },
            ElementKind::Text => ElementShape::Text {
                x: 0.0,
                y: 0.0,
                content: String::new(),
                font_size: DEFAULT_FONT_SIZE,
                font_family: DEFAULT_FONT_FAMILY.to_string(),
                font_weight: DEFAULT_FONT_WEIGHT.to_string(),
                text_anchor: DEFAULT_TEXT_ANCHOR.to_string(),
            },
            ElementKind::Image => ElementShape::Image {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
                href: String::new(),
            },
            other => ElementShape::Container { kind: other },
        }
    }

    /// The kind this record belongs to.
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementShape::Rect { .. } => ElementKind::Rect,
            ElementShape::Circle { .. } => ElementKind::Circle,
            ElementShape::Ellipse { .. } => ElementKind::Ellipse,
            ElementShape::Line { .. } => ElementKind::Line,
            ElementShape::Polyline { .. } => ElementKind::Polyline,
            ElementShape::Polygon { .. } => ElementKind::Polygon,
            ElementShape::Path { .. } => ElementKind::Path,
            ElementShape::Text { .. } => ElementKind::Text,
            ElementShape::Image { .. } => ElementKind::Image,
            ElementShape::Container { kind } => *kind,
        }
    }
}

/// Presentational attributes shared by every kind, kept as source strings
/// so externally loaded notation survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<String>,
    pub opacity: Option<String>,
    pub transform: Option<String>,
    pub visibility: Option<String>,
}

/// One drawable primitive in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    /// Unique id, stable for the element's lifetime.
    pub id: String,
    pub shape: ElementShape,
    pub style: ElementStyle,
    /// Unrecognized attributes, preserved for round-trip fidelity.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    pub layer_id: String,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
    /// Axis-aligned bounds, recomputed on create when derivable.
    #[serde(default)]
    pub bounds: Option<Rect>,
}

impl SceneElement {
    /// Create an element of the given kind with empty attributes.
    ///
    /// The id is left blank; the scene store assigns one on insertion.
    pub fn new(kind: ElementKind) -> SceneElement {
        SceneElement {
            id: String::new(),
            shape: ElementShape::for_kind(kind),
            style: ElementStyle::default(),
            extra: BTreeMap::new(),
            layer_id: DEFAULT_LAYER_ID.to_string(),
            visible: true,
            locked: false,
            selected: false,
            bounds: None,
        }
    }

    /// Build an element from a document node's attributes.
    ///
    /// Recognized names land on the typed record; numeric fields whose
    /// values fail to parse are preserved verbatim in `extra` instead of
    /// being coerced, so anomalous input survives export unchanged.
    pub fn from_attributes(
        kind: ElementKind,
        attributes: &[(String, String)],
        text: Option<&str>,
    ) -> SceneElement {
        let mut element = SceneElement::new(kind);
        for (name, value) in attributes {
            if name == "id" {
                continue;
            }
            element.set_attribute(name, value);
        }
        if let (ElementShape::Text { content, .. }, Some(t)) = (&mut element.shape, text) {
            *content = t.to_string();
        }
        element
    }

    /// Create a text label at the given scene position with default styling.
    pub fn text_label(x: f64, y: f64) -> SceneElement {
        let mut element = SceneElement::new(ElementKind::Text);
        element.shape = ElementShape::Text {
            x,
            y,
            content: DEFAULT_LABEL_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: DEFAULT_FONT_WEIGHT.to_string(),
            text_anchor: DEFAULT_TEXT_ANCHOR.to_string(),
        };
        element.style.fill = Some(DEFAULT_TEXT_FILL.to_string());
        element.style.stroke = Some("none".to_string());
        element.style.stroke_width = Some("0".to_string());
        element
            .extra
            .insert("data-label-type".to_string(), "text".to_string());
        element
    }

    /// Create an empty image label at the given scene position.
    pub fn image_label(x: f64, y: f64) -> SceneElement {
        let mut element = SceneElement::new(ElementKind::Image);
        element.shape = ElementShape::Image {
            x,
            y,
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
            href: String::new(),
        };
        element
    }

    /// Create an uploaded-image element referencing a data URL.
    pub fn uploaded_image(x: f64, y: f64, href: &str) -> SceneElement {
        let mut element = SceneElement::new(ElementKind::Image);
        element.shape = ElementShape::Image {
            x,
            y,
            width: DEFAULT_UPLOADED_IMAGE_SIZE,
            height: DEFAULT_UPLOADED_IMAGE_SIZE,
            href: href.to_string(),
        };
        element.extra.insert(
            "data-label-type".to_string(),
            "uploaded-image".to_string(),
        );
        element
    }

    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    /// Read an attribute by its document name.
    ///
    /// Typed fields, style fields and the passthrough map are all reachable
    /// through the one surface so animation and property derivation can stay
    /// name-based.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match (&self.shape, name) {
            (ElementShape::Rect { x, .. }, "x") => return Some(fmt_number(*x)),
            (ElementShape::Rect { y, .. }, "y") => return Some(fmt_number(*y)),
            (ElementShape::Rect { width, .. }, "width") => return Some(fmt_number(*width)),
            (ElementShape::Rect { height, .. }, "height") => return Some(fmt_number(*height)),
            (ElementShape::Rect { rx, .. }, "rx") => return Some(fmt_number(*rx)),
            (ElementShape::Rect { ry, .. }, "ry") => return Some(fmt_number(*ry)),
            (ElementShape::Circle { cx, .. }, "cx") => return Some(fmt_number(*cx)),
            (ElementShape::Circle { cy, .. }, "cy") => return Some(fmt_number(*cy)),
            (ElementShape::Circle { r, .. }, "r") => return Some(fmt_number(*r)),
            (ElementShape::Ellipse { cx, .. }, "cx") => return Some(fmt_number(*cx)),
            (ElementShape::Ellipse { cy, .. }, "cy") => return Some(fmt_number(*cy)),
            (ElementShape::Ellipse { rx, .. }, "rx") => return Some(fmt_number(*rx)),
            (ElementShape::Ellipse { ry, .. }, "ry") => return Some(fmt_number(*ry)),
            (ElementShape::Line { x1, .. }, "x1") => return Some(fmt_number(*x1)),
            (ElementShape::Line { y1, .. }, "y1") => return Some(fmt_number(*y1)),
            (ElementShape::Line { x2, .. }, "x2") => return Some(fmt_number(*x2)),
            (ElementShape::Line { y2, .. }, "y2") => return Some(fmt_number(*y2)),
            (ElementShape::Polyline { points }, "points") => return Some(points.clone()),
            (ElementShape::Polygon { points }, "points") => return Some(points.clone()),
            (ElementShape::Path { d }, "d") => return Some(d.clone()),
            (ElementShape::Text { x, .. }, "x") => return Some(fmt_number(*x)),
            (ElementShape::Text { y, .. }, "y") => return Some(fmt_number(*y)),
            (ElementShape::Text { content, .. }, "textContent") => return Some(content.clone()),
            (ElementShape::Text { font_size, .. }, "font-size") => {
                return Some(fmt_number(*font_size));
            }
            (ElementShape::Text { font_family, .. }, "font-family") => {
                return Some(font_family.clone());
            }
            (ElementShape::Text { font_weight, .. }, "font-weight") => {
                return Some(font_weight.clone());
            }
            (ElementShape::Text { text_anchor, .. }, "text-anchor") => {
                return Some(text_anchor.clone());
            }
            (ElementShape::Image { x, .. }, "x") => return Some(fmt_number(*x)),
            (ElementShape::Image { y, .. }, "y") => return Some(fmt_number(*y)),
            (ElementShape::Image { width, .. }, "width") => return Some(fmt_number(*width)),
            (ElementShape::Image { height, .. }, "height") => return Some(fmt_number(*height)),
            (ElementShape::Image { href, .. }, "href") => return Some(href.clone()),
            _ => {}
        }

        match name {
            "fill" => self.style.fill.clone(),
            "stroke" => self.style.stroke.clone(),
            "stroke-width" => self.style.stroke_width.clone(),
            "opacity" => self.style.opacity.clone(),
            "transform" => self.style.transform.clone(),
            "visibility" => self.style.visibility.clone(),
            _ => self.extra.get(name).cloned(),
        }
    }

    /// Write an attribute by its document name.
    ///
    /// An empty value clears style/passthrough entries. A numeric typed
    /// field keeps its current value and records the raw string in `extra`
    /// when the new value does not parse.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if self.set_typed_attribute(name, value) {
            return;
        }

        let slot = match name {
            "fill" => Some(&mut self.style.fill),
            "stroke" => Some(&mut self.style.stroke),
            "stroke-width" => Some(&mut self.style.stroke_width),
            "opacity" => Some(&mut self.style.opacity),
            "transform" => Some(&mut self.style.transform),
            "visibility" => Some(&mut self.style.visibility),
            _ => None,
        };

        if let Some(slot) = slot {
            *slot = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
            return;
        }

        if value.is_empty() {
            self.extra.remove(name);
        } else {
            self.extra.insert(name.to_string(), value.to_string());
        }
    }

    /// Try to apply the attribute to the typed record. Returns false when
    /// the name does not belong to this shape.
    fn set_typed_attribute(&mut self, name: &str, value: &str) -> bool {
        fn assign(field: &mut f64, extra: &mut BTreeMap<String, String>, name: &str, value: &str) {
            match value.parse::<f64>() {
                Ok(v) => *field = v,
                Err(_) => {
                    extra.insert(name.to_string(), value.to_string());
                }
            }
        }

        let extra = &mut self.extra;
        match (&mut self.shape, name) {
            (ElementShape::Rect { x, .. }, "x") => assign(x, extra, name, value),
            (ElementShape::Rect { y, .. }, "y") => assign(y, extra, name, value),
            (ElementShape::Rect { width, .. }, "width") => assign(width, extra, name, value),
            (ElementShape::Rect { height, .. }, "height") => assign(height, extra, name, value),
            (ElementShape::Rect { rx, .. }, "rx") => assign(rx, extra, name, value),
            (ElementShape::Rect { ry, .. }, "ry") => assign(ry, extra, name, value),
            (ElementShape::Circle { cx, .. }, "cx") => assign(cx, extra, name, value),
            (ElementShape::Circle { cy, .. }, "cy") => assign(cy, extra, name, value),
            (ElementShape::Circle { r, .. }, "r") => assign(r, extra, name, value),
            (ElementShape::Ellipse { cx, .. }, "cx") => assign(cx, extra, name, value),
            (ElementShape::Ellipse { cy, .. }, "cy") => assign(cy, extra, name, value),
            (ElementShape::Ellipse { rx, .. }, "rx") => assign(rx, extra, name, value),
            (ElementShape::Ellipse { ry, .. }, "ry") => assign(ry, extra, name, value),
            (ElementShape::Line { x1, .. }, "x1") => assign(x1, extra, name, value),
            (ElementShape::Line { y1, .. }, "y1") => assign(y1, extra, name, value),
            (ElementShape::Line { x2, .. }, "x2") => assign(x2, extra, name, value),
            (ElementShape::Line { y2, .. }, "y2") => assign(y2, extra, name, value),
            (ElementShape::Polyline { points }, "points") => *points = value.to_string(),
            (ElementShape::Polygon { points }, "points") => *points = value.to_string(),
            (ElementShape::Path { d }, "d") => *d = value.to_string(),
            (ElementShape::Text { x, .. }, "x") => assign(x, extra, name, value),
            (ElementShape::Text { y, .. }, "y") => assign(y, extra, name, value),
            (ElementShape::Text { content, .. }, "textContent") => *content = value.to_string(),
            (ElementShape::Text { font_size, .. }, "font-size") => {
                assign(font_size, extra, name, value)
            }
            (ElementShape::Text { font_family, .. }, "font-family") => {
                *font_family = value.to_string()
            }
            (ElementShape::Text { font_weight, .. }, "font-weight") => {
                *font_weight = value.to_string()
            }
            (ElementShape::Text { text_anchor, .. }, "text-anchor") => {
                *text_anchor = value.to_string()
            }
            (ElementShape::Image { x, .. }, "x") => assign(x, extra, name, value),
            (ElementShape::Image { y, .. }, "y") => assign(y, extra, name, value),
            (ElementShape::Image { width, .. }, "width") => assign(width, extra, name, value),
            (ElementShape::Image { height, .. }, "height") => assign(height, extra, name, value),
            (ElementShape::Image { href, .. }, "href") => *href = value.to_string(),
            _ => return false,
        }
        true
    }

    /// Flatten the element into document attribute pairs, typed fields
    /// first, then style, then passthrough. Text content is excluded (it is
    /// node text, not an attribute); the id is added by the renderer.
    pub fn to_attribute_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |name: &str, value: String| pairs.push((name.to_string(), value));

        match &self.shape {
            ElementShape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                push("x", fmt_number(*x));
                push("y", fmt_number(*y));
                push("width", fmt_number(*width));
                push("height", fmt_number(*height));
                if *rx != 0.0 {
                    push("rx", fmt_number(*rx));
                }
                if *ry != 0.0 {
                    push("ry", fmt_number(*ry));
                }
            }
            ElementShape::Circle { cx, cy, r } => {
                push("cx", fmt_number(*cx));
                push("cy", fmt_number(*cy));
                push("r", fmt_number(*r));
            }
            ElementShape::Ellipse { cx, cy, rx, ry } => {
                push("cx", fmt_number(*cx));
                push("cy", fmt_number(*cy));
                push("rx", fmt_number(*rx));
                push("ry", fmt_number(*ry));
            }
            ElementShape::Line { x1, y1, x2, y2 } => {
                push("x1", fmt_number(*x1));
                push("y1", fmt_number(*y1));
                push("x2", fmt_number(*x2));
                push("y2", fmt_number(*y2));
            }
            ElementShape::Polyline { points } | ElementShape::Polygon { points } => {
                push("points", points.clone());
            }
            ElementShape::Path { d } => push("d", d.clone()),
            ElementShape::Text {
                x,
                y,
                font_size,
                font_family,
                font_weight,
                text_anchor,
                ..
            } => {
                push("x", fmt_number(*x));
                push("y", fmt_number(*y));
                push("font-size", fmt_number(*font_size));
                push("font-family", font_family.clone());
                push("font-weight", font_weight.clone());
                push("text-anchor", text_anchor.clone());
            }
            ElementShape::Image {
                x,
                y,
                width,
                height,
                href,
            } => {
                push("x", fmt_number(*x));
                push("y", fmt_number(*y));
                push("width", fmt_number(*width));
                push("height", fmt_number(*height));
                push("href", href.clone());
            }
            ElementShape::Container { .. } => {}
        }

        for (name, value) in [
            ("fill", &self.style.fill),
            ("stroke", &self.style.stroke),
            ("stroke-width", &self.style.stroke_width),
            ("opacity", &self.style.opacity),
            ("transform", &self.style.transform),
            ("visibility", &self.style.visibility),
        ] {
            if let Some(value) = value {
                push(name, value.clone());
            }
        }

        for (name, value) in &self.extra {
            push(name, value.clone());
        }

        pairs
    }

    /// Text content for text elements, `None` otherwise.
    pub fn text_content(&self) -> Option<&str> {
        match &self.shape {
            ElementShape::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(ElementKind::from_tag("rect"), Some(ElementKind::Rect));
        assert_eq!(ElementKind::from_tag("g"), Some(ElementKind::Group));
        assert_eq!(
            ElementKind::from_tag("linearGradient"),
            Some(ElementKind::Gradient)
        );
        assert_eq!(ElementKind::from_tag("marquee"), None);
    }

    #[test]
    fn test_attribute_round_trip() {
        let mut element = SceneElement::new(ElementKind::Rect);
        element.set_attribute("x", "10");
        element.set_attribute("width", "120.5");
        element.set_attribute("fill", "#ff0000");
        element.set_attribute("data-custom", "hello");

        assert_eq!(element.attribute("x").as_deref(), Some("10"));
        assert_eq!(element.attribute("width").as_deref(), Some("120.5"));
        assert_eq!(element.attribute("fill").as_deref(), Some("#ff0000"));
        assert_eq!(element.attribute("data-custom").as_deref(), Some("hello"));
        assert_eq!(element.attribute("stroke"), None);
    }

    #[test]
    fn test_unparseable_numeric_lands_in_extra() {
        let mut element = SceneElement::new(ElementKind::Circle);
        element.set_attribute("r", "oops");
        // Typed field keeps its value, raw string is preserved.
        assert_eq!(element.extra.get("r").map(String::as_str), Some("oops"));
    }

    #[test]
    fn test_empty_value_clears_style() {
        let mut element = SceneElement::new(ElementKind::Rect);
        element.set_attribute("transform", "scale(2)");
        assert!(element.style.transform.is_some());
        element.set_attribute("transform", "");
        assert!(element.style.transform.is_none());
    }

    #[test]
    fn test_from_attributes() {
        let attrs = vec![
            ("cx".to_string(), "50".to_string()),
            ("cy".to_string(), "60".to_string()),
            ("r".to_string(), "25".to_string()),
            ("fill".to_string(), "blue".to_string()),
        ];
        let element = SceneElement::from_attributes(ElementKind::Circle, &attrs, None);
        assert_eq!(element.attribute("cx").as_deref(), Some("50"));
        assert_eq!(element.attribute("fill").as_deref(), Some("blue"));
    }

    #[test]
    fn test_text_label_defaults() {
        let label = SceneElement::text_label(100.0, 200.0);
        assert_eq!(label.attribute("textContent").as_deref(), Some("New Label"));
        assert_eq!(label.attribute("font-size").as_deref(), Some("18"));
        assert_eq!(label.attribute("fill").as_deref(), Some("#000000"));
        assert_eq!(label.attribute("data-label-type").as_deref(), Some("text"));
    }

    #[test]
    fn test_to_attribute_pairs_skips_zero_corner_radius() {
        let mut element = SceneElement::new(ElementKind::Rect);
        element.set_attribute("width", "10");
        let pairs = element.to_attribute_pairs();
        let names: Vec<&str> = pairs.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"width"));
        assert!(!names.contains(&"rx"));
    }
}
