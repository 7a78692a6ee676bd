//! Recording renderer used by unit tests across the crate.

use crate::element::SceneElement;
use crate::render::{NodeSnapshot, RenderError, Renderer};
use kurbo::{Point, Rect};

/// A renderer that records calls and answers hit tests from a configured
/// region list.
#[derive(Default)]
pub(crate) struct TestRenderer {
    pub created: Vec<(String, String)>,
    pub updates: Vec<(String, Vec<(String, String)>)>,
    pub removed: Vec<String>,
    /// (bounds, id) regions answered by hit_test/bounds_of, front last.
    pub hit_regions: Vec<(Rect, String)>,
    /// Snapshot returned by document_nodes, injected by tests.
    pub nodes: Vec<NodeSnapshot>,
    pub assigned_ids: Vec<(usize, String)>,
    pub document: String,
}

impl TestRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, id: &str, bounds: Rect) -> Self {
        self.hit_regions.push((bounds, id.to_string()));
        self
    }
}

impl Renderer for TestRenderer {
    fn render_create(&mut self, element: &SceneElement) {
        self.created
            .push((element.id.clone(), element.kind().tag_name().to_string()));
    }

    fn render_update(&mut self, id: &str, patch: &[(String, String)]) {
        self.updates.push((id.to_string(), patch.to_vec()));
    }

    fn render_remove(&mut self, id: &str) {
        self.removed.push(id.to_string());
    }

    fn hit_test(&mut self, point: Point) -> Option<String> {
        self.hit_regions
            .iter()
            .rev()
            .find(|(bounds, _)| bounds.contains(point))
            .map(|(_, id)| id.clone())
    }

    fn bounds_of(&self, id: &str) -> Option<Rect> {
        self.hit_regions
            .iter()
            .find(|(_, region_id)| region_id == id)
            .map(|(bounds, _)| *bounds)
    }

    fn load_document(&mut self, content: &str) -> Result<(), RenderError> {
        if !content.contains("<svg") {
            return Err(RenderError::Parse("missing svg root".to_string()));
        }
        self.document = content.to_string();
        Ok(())
    }

    fn serialize_document(&self) -> String {
        self.document.clone()
    }

    fn document_nodes(&self) -> Vec<NodeSnapshot> {
        self.nodes.clone()
    }

    fn set_node_id(&mut self, index: usize, id: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.index == index) {
            node.id = Some(id.to_string());
        }
        self.assigned_ids.push((index, id.to_string()));
    }
}
