//! Scene store: the canonical model of the drawing.
//!
//! Owns elements, layers, selection, the active tool and the viewport, and
//! is the single writer of scene structure. Every mutation pushes through
//! to the renderer so the structured model and the rendered document never
//! silently drift.

use crate::element::{generate_element_id, ElementKind, ElementShape, SceneElement, DEFAULT_LAYER_ID};
use crate::events::{EditorEvent, EventBus};
use crate::geometry::{element_bounds, element_center};
use crate::render::{RenderError, Renderer};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags never materialized into scene elements during reconciliation.
const STRUCTURAL_TAGS: &[&str] = &[
    "defs",
    "clippath",
    "mask",
    "pattern",
    "lineargradient",
    "radialgradient",
    "stop",
    "style",
    "script",
    "title",
    "desc",
    "metadata",
];

/// The editing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Select,
    Text,
    Image,
    Zoom,
    Pan,
}

/// A drawing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
    pub order: u32,
}

impl Layer {
    /// The always-present default layer.
    pub fn default_layer() -> Layer {
        Layer {
            id: DEFAULT_LAYER_ID.to_string(),
            name: "Default".to_string(),
            visible: true,
            locked: false,
            opacity: 1.0,
            order: 0,
        }
    }
}

/// The authoritative in-memory scene.
pub struct SceneStore<R: Renderer> {
    elements: HashMap<String, SceneElement>,
    /// Insertion order, back to front.
    order: Vec<String>,
    layers: Vec<Layer>,
    selection: Vec<String>,
    active_tool: Tool,
    viewport: Viewport,
    renderer: R,
    events: EventBus,
}

impl<R: Renderer> SceneStore<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            layers: vec![Layer::default_layer()],
            selection: Vec::new(),
            active_tool: Tool::default(),
            viewport: Viewport::new(),
            renderer,
            events: EventBus::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
    }

    /// Set the viewport zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.viewport.set_pan(pan_x, pan_y);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&SceneElement> {
        self.elements.get(id)
    }

    /// Elements in insertion order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &SceneElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selection
    }

    pub fn selected_elements(&self) -> Vec<&SceneElement> {
        self.selection
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect()
    }

    /// Add an element, assigning a fresh unique id when none (or a taken
    /// one) is present, and computing initial bounds when derivable.
    /// Never fails; anomalous kinds or attributes are accepted as-is.
    pub fn add_element(&mut self, mut element: SceneElement) -> String {
        if element.id.is_empty() || self.elements.contains_key(&element.id) {
            element.id = generate_element_id();
        }
        if element.layer_id.is_empty() {
            element.layer_id = DEFAULT_LAYER_ID.to_string();
        }
        if let Some(bounds) = element_bounds(&element) {
            element.bounds = Some(bounds);
        }

        let id = element.id.clone();
        self.renderer.render_create(&element);

        let was_selected = element.selected;
        self.elements.insert(id.clone(), element);
        self.order.push(id.clone());

        if was_selected && !self.selection.contains(&id) {
            self.selection.push(id.clone());
            self.selection_changed();
        }

        id
    }

    /// Merge an attribute patch into an element and the rendered node.
    /// Bounds are not recomputed here. Unknown ids are a no-op.
    pub fn update_element(&mut self, id: &str, patch: &[(String, String)]) {
        let Some(element) = self.elements.get_mut(id) else {
            debug!("update_element: unknown id {id}");
            return;
        };
        for (name, value) in patch {
            element.set_attribute(name, value);
        }
        self.renderer.render_update(id, patch);
    }

    /// Label-customization save path for text elements: applies the patch,
    /// then re-anchors the text to the center of the nearest non-text
    /// element, when one exists.
    pub fn update_text_element(&mut self, id: &str, patch: &[(String, String)]) {
        self.update_element(id, patch);

        let is_text = self
            .elements
            .get(id)
            .is_some_and(|e| e.kind() == ElementKind::Text);
        if !is_text {
            return;
        }

        if let Some(center) = self.nearest_non_text_center(id) {
            let reposition = vec![
                ("x".to_string(), crate::transform::fmt_number(center.x)),
                ("y".to_string(), crate::transform::fmt_number(center.y)),
            ];
            if let Some(element) = self.elements.get_mut(id) {
                for (name, value) in &reposition {
                    element.set_attribute(name, value);
                }
                element.bounds = element_bounds(element);
            }
            self.renderer.render_update(id, &reposition);
        }
    }

    /// Center of the non-text element nearest to a text element, by
    /// Euclidean distance from the text's anchor point.
    fn nearest_non_text_center(&self, text_id: &str) -> Option<Point> {
        let anchor = match self.elements.get(text_id)?.shape {
            ElementShape::Text { x, y, .. } => Point::new(x, y),
            _ => return None,
        };

        let mut nearest: Option<(f64, Point)> = None;
        for element in self.elements_ordered() {
            if element.id == text_id || element.kind() == ElementKind::Text {
                continue;
            }
            let Some(center) = element_center(element) else {
                continue;
            };
            let distance = ((center.x - anchor.x).powi(2) + (center.y - anchor.y).powi(2)).sqrt();
            match nearest {
                Some((best, _)) if best <= distance => {}
                _ => nearest = Some((distance, center)),
            }
        }
        nearest.map(|(_, center)| center)
    }

    /// Remove an element, pruning it from the selection in the same update.
    /// Unknown ids are a no-op.
    pub fn remove_element(&mut self, id: &str) {
        if self.elements.remove(id).is_none() {
            debug!("remove_element: unknown id {id}");
            return;
        }
        self.order.retain(|existing| existing != id);
        self.renderer.render_remove(id);

        if self.selection.iter().any(|selected| selected == id) {
            self.selection.retain(|selected| selected != id);
            self.selection_changed();
        }
    }

    /// Select an element. With `multi`, toggles membership; otherwise the
    /// selection is replaced. Ids not present in the scene are ignored.
    pub fn select_element(&mut self, id: &str, multi: bool) {
        if !self.elements.contains_key(id) {
            debug!("select_element: unknown id {id}");
            return;
        }

        if multi {
            if let Some(position) = self.selection.iter().position(|s| s == id) {
                self.selection.remove(position);
            } else {
                self.selection.push(id.to_string());
            }
        } else {
            self.selection.clear();
            self.selection.push(id.to_string());
        }
        self.selection_changed();
    }

    /// Replace the selection wholesale (drag-select result). Ids not
    /// present in the scene are dropped.
    pub fn set_selection(&mut self, ids: Vec<String>) {
        let mut next: Vec<String> = Vec::new();
        for id in ids {
            if self.elements.contains_key(&id) && !next.contains(&id) {
                next.push(id);
            }
        }
        self.selection = next;
        self.selection_changed();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.selection_changed();
    }

    /// Reconcile per-element `selected` flags with the selection set and
    /// notify observers. Runs after every selection mutation so the two
    /// never drift.
    fn selection_changed(&mut self) {
        for (id, element) in &mut self.elements {
            element.selected = self.selection.contains(id);
        }
        self.events.emit(&EditorEvent::SelectionChanged {
            selected_ids: self.selection.clone(),
        });
    }

    /// Move an element by a scene-space delta, shifting its stored bounds
    /// along. Returns false for kinds with no positional attributes.
    pub fn translate_element(&mut self, id: &str, delta: Vec2) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };

        let patch: Vec<(String, String)> = match &mut element.shape {
            ElementShape::Rect { x, y, .. }
            | ElementShape::Text { x, y, .. }
            | ElementShape::Image { x, y, .. } => {
                *x += delta.x;
                *y += delta.y;
                vec![
                    ("x".to_string(), crate::transform::fmt_number(*x)),
                    ("y".to_string(), crate::transform::fmt_number(*y)),
                ]
            }
            ElementShape::Circle { cx, cy, .. } | ElementShape::Ellipse { cx, cy, .. } => {
                *cx += delta.x;
                *cy += delta.y;
                vec![
                    ("cx".to_string(), crate::transform::fmt_number(*cx)),
                    ("cy".to_string(), crate::transform::fmt_number(*cy)),
                ]
            }
            ElementShape::Line { x1, y1, x2, y2 } => {
                *x1 += delta.x;
                *y1 += delta.y;
                *x2 += delta.x;
                *y2 += delta.y;
                vec![
                    ("x1".to_string(), crate::transform::fmt_number(*x1)),
                    ("y1".to_string(), crate::transform::fmt_number(*y1)),
                    ("x2".to_string(), crate::transform::fmt_number(*x2)),
                    ("y2".to_string(), crate::transform::fmt_number(*y2)),
                ]
            }
            _ => return false,
        };

        if let Some(bounds) = element.bounds {
            element.bounds = Some(bounds + delta);
        }

        self.renderer.render_update(id, &patch);
        self.events.emit(&EditorEvent::ElementDragged {
            element_id: id.to_string(),
            dx: delta.x,
            dy: delta.y,
        });
        true
    }

    /// Drop every element and the selection. The rendered document is left
    /// alone; loading new content replaces it wholesale.
    pub fn clear_all_elements(&mut self) {
        self.elements.clear();
        self.order.clear();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.emit(&EditorEvent::SelectionChanged {
                selected_ids: Vec::new(),
            });
        }
    }

    /// Load external document content and reconcile the structured model
    /// from the rendered result.
    pub fn load_svg_content(&mut self, content: &str) -> Result<usize, RenderError> {
        self.renderer.load_document(content)?;
        let added = self.reconcile_from_document();
        self.events.emit(&EditorEvent::ContentLoaded {
            element_count: added,
        });
        Ok(added)
    }

    /// Load a template: clears the current model first, then loads.
    pub fn load_template(&mut self, content: &str) -> Result<usize, RenderError> {
        self.clear_all_elements();
        self.load_svg_content(content)
    }

    /// Materialize a scene element for every eligible rendered node,
    /// assigning ids to nodes that lack one. Returns how many elements were
    /// added. The store never parses markup itself; it only reconciles the
    /// renderer's post-load snapshot.
    pub fn reconcile_from_document(&mut self) -> usize {
        let nodes = self.renderer.document_nodes();
        let mut added = 0;

        for node in nodes {
            if STRUCTURAL_TAGS.contains(&node.tag.as_str()) {
                continue;
            }
            let Some(kind) = ElementKind::from_tag(&node.tag) else {
                continue;
            };

            let id = match &node.id {
                Some(id) if !id.is_empty() => id.clone(),
                _ => {
                    let generated = generate_element_id();
                    self.renderer.set_node_id(node.index, &generated);
                    generated
                }
            };
            if self.elements.contains_key(&id) {
                continue;
            }

            let mut element =
                SceneElement::from_attributes(kind, &node.attributes, node.text.as_deref());
            element.id = id.clone();
            if let Some(bounds) = element_bounds(&element) {
                element.bounds = Some(bounds);
            }

            self.elements.insert(id.clone(), element);
            self.order.push(id);
            added += 1;
        }

        added
    }

    /// Serialize the current document through the renderer.
    pub fn export_scene(&self) -> String {
        self.renderer.serialize_document()
    }

    /// Remove a layer, reassigning its elements to the default layer so
    /// none are orphaned. The default layer itself cannot be removed.
    pub fn remove_layer(&mut self, layer_id: &str) {
        if layer_id == DEFAULT_LAYER_ID {
            return;
        }
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != layer_id);
        if self.layers.len() == before {
            return;
        }
        for element in self.elements.values_mut() {
            if element.layer_id == layer_id {
                element.layer_id = DEFAULT_LAYER_ID.to_string();
            }
        }
    }

    pub fn add_layer(&mut self, layer: Layer) {
        if self.layers.iter().any(|existing| existing.id == layer.id) {
            return;
        }
        self.layers.push(layer);
    }
}
