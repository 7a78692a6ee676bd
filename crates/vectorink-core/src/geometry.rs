//! Geometry helpers: bounds derivation, overlap tests, drag thresholds.
//!
//! Everything here is a pure function over element data; no state.

use crate::element::{ElementShape, SceneElement};
use kurbo::{Point, Rect};

/// Pointer movement below this distance resolves as a click, not a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Derive axis-aligned bounds from an element's typed attributes.
///
/// Text bounds are estimated from content length and font size; kinds with
/// no derivable geometry (paths, polylines, containers) return `None` and
/// rely on the renderer's measurement instead.
pub fn element_bounds(element: &SceneElement) -> Option<Rect> {
    match &element.shape {
        ElementShape::Rect {
            x,
            y,
            width,
            height,
            ..
        } => Some(Rect::new(*x, *y, x + width, y + height)),
        ElementShape::Circle { cx, cy, r } => Some(Rect::new(cx - r, cy - r, cx + r, cy + r)),
        ElementShape::Ellipse { cx, cy, rx, ry } => {
            Some(Rect::new(cx - rx, cy - ry, cx + rx, cy + ry))
        }
        ElementShape::Line { x1, y1, x2, y2 } => {
            Some(Rect::from_points(Point::new(*x1, *y1), Point::new(*x2, *y2)))
        }
        ElementShape::Text {
            x,
            y,
            content,
            font_size,
            ..
        } => {
            let estimated_width = content.chars().count() as f64 * font_size * 0.6;
            // Text y is the baseline; the box sits one font-size above it.
            Some(Rect::new(*x, y - font_size, x + estimated_width, *y))
        }
        ElementShape::Image {
            x,
            y,
            width,
            height,
            ..
        } => Some(Rect::new(*x, *y, x + width, y + height)),
        _ => None,
    }
}

/// Center point of an element, for label attachment and placement.
pub fn element_center(element: &SceneElement) -> Option<Point> {
    match &element.shape {
        ElementShape::Circle { cx, cy, .. } | ElementShape::Ellipse { cx, cy, .. } => {
            Some(Point::new(*cx, *cy))
        }
        ElementShape::Rect {
            x,
            y,
            width,
            height,
            ..
        }
        | ElementShape::Image {
            x,
            y,
            width,
            height,
            ..
        } => Some(Point::new(x + width / 2.0, y + height / 2.0)),
        ElementShape::Line { x1, y1, x2, y2 } => {
            Some(Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0))
        }
        ElementShape::Text { x, y, .. } => Some(Point::new(*x, *y)),
        _ => element.bounds.map(|b| b.center()),
    }
}

/// Strict axis-overlap test: rectangles intersect iff neither is fully to
/// one side of the other on either axis. Touching edges do not count.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Normalized selection rectangle between a drag's start and current point.
pub fn selection_rect(start: Point, current: Point) -> Rect {
    Rect::from_points(start, current)
}

/// Euclidean distance between two pointer positions.
pub fn drag_distance(start: Point, current: Point) -> f64 {
    ((current.x - start.x).powi(2) + (current.y - start.y).powi(2)).sqrt()
}

/// Whether pointer movement exceeds the click/drag threshold.
pub fn has_dragged(start: Point, current: Point) -> bool {
    drag_distance(start, current) > DRAG_THRESHOLD
}

/// A resize handle on a selected element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHandle {
    pub id: &'static str,
    pub position: Point,
}

/// The eight resize handles around a bounding box, corners first per side.
pub fn resize_handles(bounds: Rect) -> Vec<ResizeHandle> {
    let (x, y) = (bounds.x0, bounds.y0);
    let (w, h) = (bounds.width(), bounds.height());
    vec![
        ResizeHandle { id: "nw", position: Point::new(x, y) },
        ResizeHandle { id: "n", position: Point::new(x + w / 2.0, y) },
        ResizeHandle { id: "ne", position: Point::new(x + w, y) },
        ResizeHandle { id: "e", position: Point::new(x + w, y + h / 2.0) },
        ResizeHandle { id: "se", position: Point::new(x + w, y + h) },
        ResizeHandle { id: "s", position: Point::new(x + w / 2.0, y + h) },
        ResizeHandle { id: "sw", position: Point::new(x, y + h) },
        ResizeHandle { id: "w", position: Point::new(x, y + h / 2.0) },
    ]
}
