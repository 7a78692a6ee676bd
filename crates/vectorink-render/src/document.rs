//! Mutable SVG document tree.
//!
//! Parsing goes through roxmltree; the tree itself and the writer are our
//! own so nodes can be created, patched and removed freely between loads.

use kurbo::{Point, Rect};
use thiserror::Error;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Classes marking transient markup that must not survive export.
pub const TEMP_CLASSES: &[&str] = &["temp", "preview", "selection-rectangle"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid SVG document: {0}")]
    Parse(String),
    #[error("document root is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// One element node.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<SvgNode>,
}

impl SvgNode {
    pub fn new(tag: &str) -> SvgNode {
        SvgNode {
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value. An empty value
    /// removes the attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.attributes.retain(|(attr, _)| attr != name);
            return;
        }
        if let Some(slot) = self.attributes.iter_mut().find(|(attr, _)| attr == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Whether the node's class list contains the given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn is_transient(&self) -> bool {
        TEMP_CLASSES.iter().any(|class| self.has_class(class))
    }

    fn numeric_attr(&self, name: &str) -> Option<f64> {
        self.attr(name).and_then(|value| value.parse().ok())
    }
}

/// Geometric bounds derived from a node's attributes.
///
/// Mirrors the scene-side estimation so hit testing works on loaded
/// documents before any reconciliation has run.
pub fn node_bounds(node: &SvgNode) -> Option<Rect> {
    match node.tag.as_str() {
        "rect" | "image" => {
            let x = node.numeric_attr("x").unwrap_or(0.0);
            let y = node.numeric_attr("y").unwrap_or(0.0);
            let width = node.numeric_attr("width")?;
            let height = node.numeric_attr("height")?;
            Some(Rect::new(x, y, x + width, y + height))
        }
        "circle" => {
            let cx = node.numeric_attr("cx").unwrap_or(0.0);
            let cy = node.numeric_attr("cy").unwrap_or(0.0);
            let r = node.numeric_attr("r")?;
            Some(Rect::new(cx - r, cy - r, cx + r, cy + r))
        }
        "ellipse" => {
            let cx = node.numeric_attr("cx").unwrap_or(0.0);
            let cy = node.numeric_attr("cy").unwrap_or(0.0);
            let rx = node.numeric_attr("rx")?;
            let ry = node.numeric_attr("ry")?;
            Some(Rect::new(cx - rx, cy - ry, cx + rx, cy + ry))
        }
        "line" => {
            let x1 = node.numeric_attr("x1").unwrap_or(0.0);
            let y1 = node.numeric_attr("y1").unwrap_or(0.0);
            let x2 = node.numeric_attr("x2").unwrap_or(0.0);
            let y2 = node.numeric_attr("y2").unwrap_or(0.0);
            Some(Rect::from_points(Point::new(x1, y1), Point::new(x2, y2)))
        }
        "text" => {
            let x = node.numeric_attr("x").unwrap_or(0.0);
            let y = node.numeric_attr("y").unwrap_or(0.0);
            let font_size = node.numeric_attr("font-size").unwrap_or(18.0);
            let length = node.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
            let width = length as f64 * font_size * 0.6;
            Some(Rect::new(x, y - font_size, x + width, y))
        }
        _ => None,
    }
}

/// A whole document: an `<svg>` root and its element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: SvgNode,
}

impl SvgDocument {
    /// Empty document with the given canvas size and viewBox.
    pub fn new(width: f64, height: f64, view_box: &str) -> SvgDocument {
        let mut root = SvgNode::new("svg");
        root.set_attr("xmlns", SVG_NAMESPACE);
        root.set_attr("width", &format!("{}", width));
        root.set_attr("height", &format!("{}", height));
        root.set_attr("viewBox", view_box);
        SvgDocument { root }
    }

    /// Parse external SVG text.
    pub fn parse(content: &str) -> Result<SvgDocument, DocumentError> {
        let parsed = roxmltree::Document::parse(content)
            .map_err(|error| DocumentError::Parse(error.to_string()))?;
        let root_element = parsed.root_element();
        let tag = root_element.tag_name().name().to_string();
        if tag != "svg" {
            return Err(DocumentError::NotSvg(tag));
        }
        Ok(SvgDocument {
            root: convert_node(root_element),
        })
    }

    pub fn append(&mut self, node: SvgNode) {
        self.root.children.push(node);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SvgNode> {
        find_in(&self.root, id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut SvgNode> {
        find_in_mut(&mut self.root, id)
    }

    /// Remove the node with the given id anywhere in the tree.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        remove_from(&mut self.root, id)
    }

    /// All descendants of the root in document (pre-order) order.
    pub fn descendants(&self) -> Vec<&SvgNode> {
        let mut nodes = Vec::new();
        collect(&self.root, &mut nodes);
        nodes
    }

    /// Descendant at a document-order index, mutable.
    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut SvgNode> {
        let mut counter = 0;
        walk_mut(&mut self.root, index, &mut counter)
    }

    /// Serialize the full document.
    pub fn serialize(&self) -> String {
        self.serialize_filtered(&[])
    }

    /// Serialize, skipping any node carrying one of the given classes.
    pub fn serialize_filtered(&self, skip_classes: &[&str]) -> String {
        let mut out = String::new();
        write_node(&self.root, skip_classes, true, &mut out);
        out
    }
}

fn convert_node(source: roxmltree::Node<'_, '_>) -> SvgNode {
    let mut node = SvgNode::new(source.tag_name().name());
    for attribute in source.attributes() {
        node.attributes
            .push((attribute.name().to_string(), attribute.value().to_string()));
    }

    for child in source.children() {
        if child.is_element() {
            node.children.push(convert_node(child));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !text.trim().is_empty() {
                node.text = Some(text.trim().to_string());
            }
        }
    }
    node
}

fn collect<'a>(node: &'a SvgNode, out: &mut Vec<&'a SvgNode>) {
    for child in &node.children {
        out.push(child);
        collect(child, out);
    }
}

fn walk_mut<'a>(node: &'a mut SvgNode, index: usize, counter: &mut usize) -> Option<&'a mut SvgNode> {
    for child in &mut node.children {
        let current = *counter;
        *counter += 1;
        if current == index {
            return Some(child);
        }
        if let Some(found) = walk_mut(child, index, counter) {
            return Some(found);
        }
    }
    None
}

fn find_in<'a>(node: &'a SvgNode, id: &str) -> Option<&'a SvgNode> {
    for child in &node.children {
        if child.id() == Some(id) {
            return Some(child);
        }
        if let Some(found) = find_in(child, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(node: &'a mut SvgNode, id: &str) -> Option<&'a mut SvgNode> {
    for child in &mut node.children {
        if child.id() == Some(id) {
            return Some(child);
        }
        if let Some(found) = find_in_mut(child, id) {
            return Some(found);
        }
    }
    None
}

fn remove_from(node: &mut SvgNode, id: &str) -> bool {
    let before = node.children.len();
    node.children.retain(|child| child.id() != Some(id));
    if node.children.len() != before {
        return true;
    }
    node.children.iter_mut().any(|child| remove_from(child, id))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_node(node: &SvgNode, skip_classes: &[&str], is_root: bool, out: &mut String) {
    if skip_classes.iter().any(|class| node.has_class(class)) {
        return;
    }

    out.push('<');
    out.push_str(&node.tag);
    if is_root && node.attr("xmlns").is_none() {
        out.push_str(&format!(" xmlns=\"{}\"", SVG_NAMESPACE));
    }
    for (name, value) in &node.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }

    if node.children.is_empty() && node.text.is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = &node.text {
        out.push_str(&escape_text(text));
    }
    for child in &node.children {
        write_node(child, skip_classes, false, out);
    }
    out.push_str(&format!("</{}>", node.tag));
}
