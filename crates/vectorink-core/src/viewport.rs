//! Viewport state: canvas size, viewBox, zoom and pan.
//!
//! Handles the screen-to-scene coordinate mapping and keeps the zoom level
//! clamped on every write, wherever the write comes from.

use crate::transform::fmt_number;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Zoom limits, enforced on every write.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Toolbar zoom step, applied about the canvas center.
pub const ZOOM_STEP_FACTOR: f64 = 1.2;

/// Wheel zoom factors (in on scroll up, out on scroll down).
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
pub const DEFAULT_VIEW_BOX: &str = "0 0 6002.83 5024.85";

/// Zoom direction for the explicit toolbar controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// The canvas viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub view_box: String,
    /// Kept private so the clamp invariant holds on every write path.
    zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            view_box: DEFAULT_VIEW_BOX.to_string(),
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to [0.1, 10].
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    /// Pan by a delta given in screen pixels.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        let vb = self.view_box_rect();
        self.pan_x += dx * vb.width() / self.width;
        self.pan_y += dy * vb.height() / self.height;
    }

    /// The viewBox as a rect; falls back to the canvas size when the
    /// attribute string is malformed.
    pub fn view_box_rect(&self) -> Rect {
        let parts: Vec<f64> = self
            .view_box
            .split_whitespace()
            .filter_map(|p| p.parse().ok())
            .collect();
        if let [x, y, w, h] = parts[..] {
            Rect::new(x, y, x + w, y + h)
        } else {
            Rect::new(0.0, 0.0, self.width, self.height)
        }
    }

    /// Convert a screen point to scene coordinates, accounting for the
    /// viewBox mapping and the current pan/zoom.
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        let vb = self.view_box_rect();
        let svg_x = vb.x0 + screen.x / self.width * vb.width();
        let svg_y = vb.y0 + screen.y / self.height * vb.height();
        Point::new(
            (svg_x - self.pan_x) / self.zoom,
            (svg_y - self.pan_y) / self.zoom,
        )
    }

    /// Convert a scene point back to screen coordinates.
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        let vb = self.view_box_rect();
        let svg_x = scene.x * self.zoom + self.pan_x;
        let svg_y = scene.y * self.zoom + self.pan_y;
        Point::new(
            (svg_x - vb.x0) / vb.width() * self.width,
            (svg_y - vb.y0) / vb.height() * self.height,
        )
    }

    /// Zoom by a factor, keeping the scene point under `anchor_screen`
    /// visually fixed.
    pub fn zoom_at(&mut self, anchor_screen: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor_scene = self.screen_to_scene(anchor_screen);
        let vb = self.view_box_rect();
        let svg_x = vb.x0 + anchor_screen.x / self.width * vb.width();
        let svg_y = vb.y0 + anchor_screen.y / self.height * vb.height();

        self.zoom = new_zoom;
        self.pan_x = svg_x - anchor_scene.x * new_zoom;
        self.pan_y = svg_y - anchor_scene.y * new_zoom;
    }

    /// Wheel zoom anchored at the pointer: scroll up zooms in by 1.1,
    /// scroll down zooms out by 0.9.
    pub fn zoom_wheel(&mut self, anchor_screen: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.zoom_at(anchor_screen, factor);
    }

    /// Toolbar zoom step: a fixed 1.2x per step about the canvas center.
    pub fn zoom_step(&mut self, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP_FACTOR,
            ZoomDirection::Out => 1.0 / ZOOM_STEP_FACTOR,
        };
        let center = Point::new(self.width / 2.0, self.height / 2.0);
        self.zoom_at(center, factor);
    }

    /// Reset pan and zoom to their defaults.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// The transform applied to the document's content group.
    pub fn transform_string(&self) -> String {
        format!(
            "translate({}, {}) scale({})",
            fmt_number(self.pan_x),
            fmt_number(self.pan_y),
            fmt_number(self.zoom)
        )
    }
}
