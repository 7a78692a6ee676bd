//! Property derivation: editable descriptors for the selected element.
//!
//! Produces an ordered set of property groups (Basic / Appearance /
//! Transform / Element Properties / Animation) from an element's live
//! attributes. Colors are normalized to hex; the transform string is
//! decomposed into scale/rotate values for round-trip editing.

use crate::animation::{
    AnimationConfig, AnimationKind, DEFAULT_ANIMATION_COLOR, DEFAULT_ANIMATION_DURATION_MS,
    DEFAULT_ANIMATION_INTERVAL_MS,
};
use crate::color::{convert_to_hex, DEFAULT_FILL_COLOR};
use crate::element::{ElementKind, ElementShape, SceneElement};
use crate::transform::parse_transform;

/// Input widget a property maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Text,
    Number,
    Color,
    Select,
    Boolean,
    Range,
}

/// A property's current value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

/// One option of a select property.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One editable property descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: PropertyKind,
    pub value: PropertyValue,
    pub options: Vec<SelectOption>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl Property {
    fn number(key: &'static str, label: &'static str, value: f64) -> Property {
        Property {
            key,
            label,
            kind: PropertyKind::Number,
            value: PropertyValue::Number(value),
            options: Vec::new(),
            min: None,
            max: None,
            step: Some(1.0),
        }
    }

    fn ranged(mut self, min: f64, max: f64, step: f64) -> Property {
        self.min = Some(min);
        self.max = Some(max);
        self.step = Some(step);
        self
    }
}

/// An ordered property group.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyGroup {
    pub name: &'static str,
    pub title: &'static str,
    pub properties: Vec<Property>,
    pub expanded: bool,
}

pub const FONT_FAMILIES: &[SelectOption] = &[
    SelectOption { value: "Arial", label: "Arial" },
    SelectOption { value: "Helvetica", label: "Helvetica" },
    SelectOption { value: "Times New Roman", label: "Times New Roman" },
    SelectOption { value: "Courier New", label: "Courier New" },
    SelectOption { value: "Verdana", label: "Verdana" },
    SelectOption { value: "Georgia", label: "Georgia" },
];

pub const TEXT_ANCHORS: &[SelectOption] = &[
    SelectOption { value: "start", label: "Start" },
    SelectOption { value: "middle", label: "Middle" },
    SelectOption { value: "end", label: "End" },
];

pub const ANIMATION_TYPES: &[SelectOption] = &[
    SelectOption { value: "color-change", label: "Color Change" },
    SelectOption { value: "scale", label: "Scale" },
    SelectOption { value: "rotate", label: "Rotate" },
    SelectOption { value: "opacity", label: "Opacity" },
];

fn number_attr(element: &SceneElement, name: &str, fallback: f64) -> f64 {
    element
        .attribute(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

/// All property groups for an element, in display order.
pub fn property_groups(
    element: &SceneElement,
    animation: Option<&AnimationConfig>,
) -> Vec<PropertyGroup> {
    vec![
        PropertyGroup {
            name: "basic",
            title: "Basic",
            properties: basic_properties(element),
            expanded: true,
        },
        PropertyGroup {
            name: "appearance",
            title: "Appearance",
            properties: appearance_properties(element),
            expanded: true,
        },
        PropertyGroup {
            name: "transform",
            title: "Transform",
            properties: transform_properties(element),
            expanded: true,
        },
        PropertyGroup {
            name: "type-specific",
            title: "Element Properties",
            properties: type_specific_properties(element),
            expanded: false,
        },
        PropertyGroup {
            name: "animation",
            title: "Animation",
            properties: animation_properties(animation),
            expanded: false,
        },
    ]
}

pub fn basic_properties(element: &SceneElement) -> Vec<Property> {
    vec![
        Property {
            key: "id",
            label: "ID",
            kind: PropertyKind::Text,
            value: PropertyValue::Text(element.id.clone()),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
        Property {
            key: "visible",
            label: "Visible",
            kind: PropertyKind::Boolean,
            value: PropertyValue::Bool(element.attribute("visibility").as_deref() != Some("hidden")),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
        Property {
            key: "opacity",
            label: "Opacity",
            kind: PropertyKind::Range,
            value: PropertyValue::Number(number_attr(element, "opacity", 1.0)),
            options: Vec::new(),
            min: Some(0.0),
            max: Some(1.0),
            step: Some(0.1),
        },
    ]
}

pub fn appearance_properties(element: &SceneElement) -> Vec<Property> {
    let fill = element
        .attribute("fill")
        .map(|v| convert_to_hex(&v))
        .unwrap_or_else(|| DEFAULT_FILL_COLOR.to_string());
    let stroke = element
        .attribute("stroke")
        .map(|v| convert_to_hex(&v))
        .unwrap_or_else(|| DEFAULT_FILL_COLOR.to_string());

    vec![
        Property {
            key: "fill",
            label: "Fill",
            kind: PropertyKind::Color,
            value: PropertyValue::Text(fill),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
        Property {
            key: "stroke",
            label: "Stroke",
            kind: PropertyKind::Color,
            value: PropertyValue::Text(stroke),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
        Property::number("stroke-width", "Stroke Width", number_attr(element, "stroke-width", 1.0))
            .ranged(0.0, 50.0, 0.5),
        Property {
            key: "stroke-opacity",
            label: "Stroke Opacity",
            kind: PropertyKind::Range,
            value: PropertyValue::Number(number_attr(element, "stroke-opacity", 1.0)),
            options: Vec::new(),
            min: Some(0.0),
            max: Some(1.0),
            step: Some(0.1),
        },
        Property {
            key: "fill-opacity",
            label: "Fill Opacity",
            kind: PropertyKind::Range,
            value: PropertyValue::Number(number_attr(element, "fill-opacity", 1.0)),
            options: Vec::new(),
            min: Some(0.0),
            max: Some(1.0),
            step: Some(0.1),
        },
    ]
}

pub fn transform_properties(element: &SceneElement) -> Vec<Property> {
    let x = element
        .attribute("x")
        .or_else(|| element.attribute("cx"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let y = element
        .attribute("y")
        .or_else(|| element.attribute("cy"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let decomposed = parse_transform(&element.attribute("transform").unwrap_or_default());

    vec![
        Property::number("translateX", "X Position", x),
        Property::number("translateY", "Y Position", y),
        Property::number("scaleX", "Scale X", decomposed.scale_x).ranged(0.1, 10.0, 0.1),
        Property::number("scaleY", "Scale Y", decomposed.scale_y).ranged(0.1, 10.0, 0.1),
        Property::number("rotate", "Rotation", decomposed.rotate).ranged(-360.0, 360.0, 1.0),
    ]
}

pub fn type_specific_properties(element: &SceneElement) -> Vec<Property> {
    match element.kind() {
        ElementKind::Rect => vec![
            Property::number("x", "X", number_attr(element, "x", 0.0)),
            Property::number("y", "Y", number_attr(element, "y", 0.0)),
            Property::number("width", "Width", number_attr(element, "width", 100.0)),
            Property::number("height", "Height", number_attr(element, "height", 100.0)),
            Property::number("rx", "Corner Radius X", number_attr(element, "rx", 0.0)),
            Property::number("ry", "Corner Radius Y", number_attr(element, "ry", 0.0)),
        ],
        ElementKind::Circle => vec![
            Property::number("cx", "Center X", number_attr(element, "cx", 0.0)),
            Property::number("cy", "Center Y", number_attr(element, "cy", 0.0)),
            Property::number("r", "Radius", number_attr(element, "r", 50.0)),
        ],
        ElementKind::Ellipse => vec![
            Property::number("cx", "Center X", number_attr(element, "cx", 0.0)),
            Property::number("cy", "Center Y", number_attr(element, "cy", 0.0)),
            Property::number("rx", "Radius X", number_attr(element, "rx", 50.0)),
            Property::number("ry", "Radius Y", number_attr(element, "ry", 30.0)),
        ],
        ElementKind::Line => vec![
            Property::number("x1", "Start X", number_attr(element, "x1", 0.0)),
            Property::number("y1", "Start Y", number_attr(element, "y1", 0.0)),
            Property::number("x2", "End X", number_attr(element, "x2", 100.0)),
            Property::number("y2", "End Y", number_attr(element, "y2", 100.0)),
        ],
        ElementKind::Text => vec![
            Property::number("x", "X", number_attr(element, "x", 0.0)),
            Property::number("y", "Y", number_attr(element, "y", 0.0)),
            Property::number("font-size", "Font Size", number_attr(element, "font-size", 16.0))
                .ranged(1.0, 200.0, 1.0),
            Property {
                key: "font-family",
                label: "Font Family",
                kind: PropertyKind::Select,
                value: PropertyValue::Text(
                    element
                        .attribute("font-family")
                        .unwrap_or_else(|| "Arial".to_string()),
                ),
                options: FONT_FAMILIES.to_vec(),
                min: None,
                max: None,
                step: None,
            },
            Property {
                key: "text-anchor",
                label: "Text Anchor",
                kind: PropertyKind::Select,
                value: PropertyValue::Text(
                    element
                        .attribute("text-anchor")
                        .unwrap_or_else(|| "start".to_string()),
                ),
                options: TEXT_ANCHORS.to_vec(),
                min: None,
                max: None,
                step: None,
            },
        ],
        _ => Vec::new(),
    }
}

pub fn animation_properties(config: Option<&AnimationConfig>) -> Vec<Property> {
    let enabled = config.map(|c| c.enabled).unwrap_or(false);
    let kind = config.map(|c| c.kind).unwrap_or_default();
    let duration = config
        .map(|c| c.duration_ms)
        .unwrap_or(DEFAULT_ANIMATION_DURATION_MS) as f64;
    let interval = config
        .map(|c| c.interval_ms)
        .unwrap_or(DEFAULT_ANIMATION_INTERVAL_MS) as f64;
    let color = config
        .map(|c| c.color.clone())
        .unwrap_or_else(|| DEFAULT_ANIMATION_COLOR.to_string());

    let kind_value = match kind {
        AnimationKind::ColorChange => "color-change",
        AnimationKind::Scale => "scale",
        AnimationKind::Rotate => "rotate",
        AnimationKind::Opacity => "opacity",
    };

    vec![
        Property {
            key: "animation-enabled",
            label: "Enable Animation",
            kind: PropertyKind::Boolean,
            value: PropertyValue::Bool(enabled),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
        Property {
            key: "animation-type",
            label: "Animation Type",
            kind: PropertyKind::Select,
            value: PropertyValue::Text(kind_value.to_string()),
            options: ANIMATION_TYPES.to_vec(),
            min: None,
            max: None,
            step: None,
        },
        Property::number("animation-duration", "Duration (ms)", duration)
            .ranged(100.0, 10000.0, 100.0),
        Property::number("animation-interval", "Interval (ms)", interval)
            .ranged(1000.0, 60000.0, 1000.0),
        Property {
            key: "animation-color",
            label: "Animation Color",
            kind: PropertyKind::Color,
            value: PropertyValue::Text(color),
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
        },
    ]
}

/// Short human-readable summary of an element for list views.
pub fn element_summary(element: &SceneElement) -> String {
    match &element.shape {
        ElementShape::Rect { width, height, .. } => format!("{} × {}", width, height),
        ElementShape::Circle { r, .. } => format!("r: {}", r),
        ElementShape::Ellipse { rx, ry, .. } => format!("{} × {}", rx, ry),
        ElementShape::Text { content, .. } => {
            if content.is_empty() {
                "Text".to_string()
            } else {
                content.clone()
            }
        }
        ElementShape::Image { width, height, .. } => format!("{} × {}", width, height),
        ElementShape::Line { x1, y1, x2, y2 } => {
            format!("{},{} → {},{}", x1, y1, x2, y2)
        }
        _ => element.kind().display_name().to_string(),
    }
}
