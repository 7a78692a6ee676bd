//! Rendering collaborator interface.
//!
//! The core never assumes a rendering technology; it only requires these
//! capabilities. `vectorink-render` provides a document-backed reference
//! implementation.

use crate::element::SceneElement;
use kurbo::{Point, Rect};
use thiserror::Error;

/// Errors surfaced by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// A flattened view of one rendered document node, used to reconcile the
/// structured scene model after an opaque document load.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    /// Stable document-order index, valid until the next document mutation.
    pub index: usize,
    /// Lower-cased tag name.
    pub tag: String,
    /// The node's id attribute, if present and non-empty.
    pub id: Option<String>,
    pub attributes: Vec<(String, String)>,
    /// Direct text content, for text nodes.
    pub text: Option<String>,
}

/// Capabilities the core requires from the rendering surface.
///
/// In attribute patches an empty value means "remove the attribute".
pub trait Renderer {
    /// Produce a visual representation for a newly added element.
    fn render_create(&mut self, element: &SceneElement);

    /// Apply an attribute patch to a rendered node. Unknown ids are a no-op.
    fn render_update(&mut self, id: &str, patch: &[(String, String)]);

    /// Remove a rendered node. Unknown ids are a no-op.
    fn render_remove(&mut self, id: &str);

    /// Topmost element at a scene point, if any. Implementations may assign
    /// a generated id to an id-less hit node so the caller can address it.
    fn hit_test(&mut self, point: Point) -> Option<String>;

    /// Geometric bounds of a rendered node.
    fn bounds_of(&self, id: &str) -> Option<Rect>;

    /// Replace the current document with parsed external content.
    fn load_document(&mut self, content: &str) -> Result<(), RenderError>;

    /// Serialize the current document, stripped of transient markup
    /// (anything tagged temp/preview/selection-rectangle).
    fn serialize_document(&self) -> String;

    /// Snapshot of every node in document order, excluding the root.
    fn document_nodes(&self) -> Vec<NodeSnapshot>;

    /// Write an id onto the node at a snapshot index.
    fn set_node_id(&mut self, index: usize, id: &str);
}
