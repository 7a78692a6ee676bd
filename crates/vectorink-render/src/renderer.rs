//! Document-backed implementation of the core renderer abstraction.

use crate::document::{node_bounds, DocumentError, SvgDocument, SvgNode, TEMP_CLASSES};
use kurbo::{Point, Rect};
use log::debug;
use vectorink_core::element::generate_element_id;
use vectorink_core::render::{NodeSnapshot, RenderError, Renderer};
use vectorink_core::storage::{Thumbnailer, THUMBNAIL_SIZE};
use vectorink_core::SceneElement;

/// Tags that never participate in hit testing.
const NON_HITTABLE_TAGS: &[&str] = &[
    "defs", "clipPath", "mask", "pattern", "linearGradient", "radialGradient", "stop", "style",
    "script", "title", "desc", "metadata",
];

/// Renders the scene into a mutable in-memory SVG document.
pub struct SvgRenderer {
    document: SvgDocument,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self {
            document: SvgDocument::new(1200.0, 800.0, "0 0 1200 800"),
        }
    }

    pub fn document(&self) -> &SvgDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut SvgDocument {
        &mut self.document
    }

    fn node_from_element(element: &SceneElement) -> SvgNode {
        let mut node = SvgNode::new(element.kind().tag_name());
        node.set_attr("id", &element.id);
        for (name, value) in element.to_attribute_pairs() {
            node.set_attr(&name, &value);
        }
        if let Some(text) = element.text_content() {
            node.text = Some(text.to_string());
        }
        node
    }
}

impl Renderer for SvgRenderer {
    fn render_create(&mut self, element: &SceneElement) {
        self.document.append(Self::node_from_element(element));
    }

    fn render_update(&mut self, id: &str, patch: &[(String, String)]) {
        let Some(node) = self.document.find_by_id_mut(id) else {
            debug!("render_update: no node {id}");
            return;
        };
        for (name, value) in patch {
            if name == "textContent" {
                node.text = if value.is_empty() {
                    None
                } else {
                    Some(value.clone())
                };
            } else {
                node.set_attr(name, value);
            }
        }
    }

    fn render_remove(&mut self, id: &str) {
        self.document.remove_by_id(id);
    }

    fn hit_test(&mut self, point: Point) -> Option<String> {
        let total = self.document.descendants().len();
        // Front to back: later nodes paint on top.
        for index in (0..total).rev() {
            let Some(node) = self.document.node_at_mut(index) else {
                continue;
            };
            if NON_HITTABLE_TAGS.contains(&node.tag.as_str()) {
                continue;
            }
            if TEMP_CLASSES.iter().any(|class| node.has_class(class)) {
                continue;
            }
            let Some(bounds) = node_bounds(node) else {
                continue;
            };
            if bounds.contains(point) {
                if node.id().is_none() {
                    node.set_attr("id", &generate_element_id());
                }
                return node.id().map(str::to_string);
            }
        }
        None
    }

    fn bounds_of(&self, id: &str) -> Option<Rect> {
        self.document.find_by_id(id).and_then(node_bounds)
    }

    fn load_document(&mut self, content: &str) -> Result<(), RenderError> {
        self.document =
            SvgDocument::parse(content).map_err(|error| RenderError::Parse(error.to_string()))?;
        Ok(())
    }

    fn serialize_document(&self) -> String {
        self.document.serialize_filtered(TEMP_CLASSES)
    }

    fn document_nodes(&self) -> Vec<NodeSnapshot> {
        self.document
            .descendants()
            .iter()
            .enumerate()
            .map(|(index, node)| NodeSnapshot {
                index,
                tag: node.tag.to_ascii_lowercase(),
                id: node.id().map(str::to_string),
                attributes: node.attributes.clone(),
                text: node.text.clone(),
            })
            .collect()
    }

    fn set_node_id(&mut self, index: usize, id: &str) {
        if let Some(node) = self.document.node_at_mut(index) {
            node.set_attr("id", id);
        }
    }
}

/// Produce a size-bounded serialized preview: the content with its root
/// forced to the thumbnail dimensions.
pub fn generate_thumbnail(content: &str, width: u32, height: u32) -> Result<String, DocumentError> {
    let mut document = SvgDocument::parse(content)?;
    document.root.set_attr("width", &width.to_string());
    document.root.set_attr("height", &height.to_string());
    if document.root.attr("viewBox").is_none() {
        document
            .root
            .set_attr("viewBox", &format!("0 0 {} {}", width, height));
    }
    Ok(document.serialize())
}

/// [`Thumbnailer`] backed by the document parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgThumbnailer;

impl Thumbnailer for SvgThumbnailer {
    fn thumbnail(&self, content: &str) -> String {
        generate_thumbnail(content, THUMBNAIL_SIZE, THUMBNAIL_SIZE).unwrap_or_default()
    }
}
