//! Interaction controller: a per-gesture state machine over raw pointer
//! and keyboard input.
//!
//! Consumes pointer events plus the active tool and issues scene-store
//! mutations (select, move, create) and transient UI signals (selection
//! rectangle, context menu). All handling is best-effort: events that do
//! not map onto a valid gesture are silently ignored.

use crate::context_menu::{
    adjust_menu_position, ContextMenu, MenuAction, MenuItem, MENU_HEIGHT, MENU_WIDTH,
};
use crate::element::{ElementKind, SceneElement};
use crate::geometry::{drag_distance, element_center, rects_intersect, selection_rect, DRAG_THRESHOLD};
use crate::render::Renderer;
use crate::scene::{SceneStore, Tool};
use kurbo::{Point, Rect, Vec2};
use log::debug;
use std::time::{Duration, Instant};

/// Debounce after a drag ends, absorbing the trailing click some input
/// systems dispatch immediately after the drag's pointer-up.
pub const DRAG_RELEASE_DEBOUNCE: Duration = Duration::from_millis(10);

/// Pointer buttons the controller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier key state accompanying pointer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether a click with these modifiers toggles multi-selection.
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Raw pointer input, positions in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
    Wheel { position: Point, delta_y: f64 },
}

/// The active gesture, advanced by down/move/up in arrival order.
#[derive(Debug, Clone, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Rubber-band selection started on empty canvas.
    DragSelect { start: Point, current: Point },
    /// Drag on an element; resolves as a click until movement passes the
    /// threshold.
    ElementDrag {
        element_id: String,
        start: Point,
        current: Point,
        dragged: bool,
    },
    /// Canvas pan with the pan tool.
    Pan { last: Point },
}

/// Turns pointer input into store mutations and transient UI state.
#[derive(Debug, Default)]
pub struct InteractionController {
    gesture: Gesture,
    modifiers: Modifiers,
    /// Clicks before this deadline are trailing artifacts of a drag.
    suppress_until: Option<Instant>,
    /// Rubber-band rectangle in scene coordinates, while drag-selecting.
    selection_rect: Option<Rect>,
    pub menu: ContextMenu,
    /// Element whose label-customization flow should open, set by the text
    /// tool and the customize-label action; consumed by the host.
    label_edit_request: Option<String>,
    /// Set when the upload-image action fires; consumed by the host, which
    /// owns file choosing.
    upload_image_request: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// The rubber-band rectangle while a drag-select gesture is active.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection_rect
    }

    /// Take the pending label-customization request, if any.
    pub fn take_label_edit_request(&mut self) -> Option<String> {
        self.label_edit_request.take()
    }

    /// Take the pending upload-image request.
    pub fn take_upload_image_request(&mut self) -> bool {
        std::mem::take(&mut self.upload_image_request)
    }

    /// Feed one pointer event through the state machine.
    pub fn handle_pointer<R: Renderer>(
        &mut self,
        event: PointerEvent,
        now: Instant,
        store: &mut SceneStore<R>,
    ) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.on_left_down(position, store),
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => self.on_right_down(position, store),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => self.on_move(position, store),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.on_left_up(position, now, store),
            PointerEvent::Up { .. } => {}
            PointerEvent::Wheel { position, delta_y } => {
                store.viewport_mut().zoom_wheel(position, delta_y);
            }
        }
    }

    fn on_left_down<R: Renderer>(&mut self, position: Point, store: &mut SceneStore<R>) {
        self.menu.open = false;

        match store.active_tool() {
            Tool::Select => {
                let scene_point = store.viewport().screen_to_scene(position);
                match store.renderer_mut().hit_test(scene_point) {
                    Some(element_id) => {
                        self.gesture = Gesture::ElementDrag {
                            element_id,
                            start: position,
                            current: position,
                            dragged: false,
                        };
                    }
                    None => {
                        self.gesture = Gesture::DragSelect {
                            start: position,
                            current: position,
                        };
                        self.selection_rect = Some(Rect::from_origin_size(
                            store.viewport().screen_to_scene(position),
                            (0.0, 0.0),
                        ));
                    }
                }
            }
            Tool::Text => {
                let scene_point = store.viewport().screen_to_scene(position);
                let id = store.add_element(SceneElement::text_label(scene_point.x, scene_point.y));
                store.select_element(&id, false);
                self.label_edit_request = Some(id);
            }
            Tool::Pan => {
                self.gesture = Gesture::Pan { last: position };
            }
            Tool::Zoom | Tool::Image => {}
        }
    }

    fn on_right_down<R: Renderer>(&mut self, position: Point, store: &mut SceneStore<R>) {
        let scene_point = store.viewport().screen_to_scene(position);
        let hit = store.renderer_mut().hit_test(scene_point);

        store.clear_selection();
        if let Some(id) = hit {
            store.select_element(&id, false);
        }

        self.menu.right_click_position = position;
        self.menu.position = adjust_menu_position(
            position,
            MENU_WIDTH,
            MENU_HEIGHT,
            store.viewport().width,
            store.viewport().height,
        );
        self.menu.open = true;
    }

    fn on_move<R: Renderer>(&mut self, position: Point, store: &mut SceneStore<R>) {
        match &mut self.gesture {
            // A move with no gesture in flight carries no meaning.
            Gesture::Idle => {}
            Gesture::DragSelect { start, current } => {
                *current = position;
                let a = store.viewport().screen_to_scene(*start);
                let b = store.viewport().screen_to_scene(position);
                self.selection_rect = Some(selection_rect(a, b));
            }
            Gesture::ElementDrag {
                element_id,
                start,
                current,
                dragged,
            } => {
                let previous = *current;
                *current = position;
                if !*dragged && drag_distance(*start, position) > DRAG_THRESHOLD {
                    *dragged = true;
                }
                if *dragged {
                    let from = store.viewport().screen_to_scene(previous);
                    let to = store.viewport().screen_to_scene(position);
                    let delta = Vec2::new(to.x - from.x, to.y - from.y);
                    let id = element_id.clone();
                    store.translate_element(&id, delta);
                }
            }
            Gesture::Pan { last } => {
                let delta = position - *last;
                *last = position;
                store.viewport_mut().pan_by_screen(delta.x, delta.y);
            }
        }
    }

    fn on_left_up<R: Renderer>(
        &mut self,
        position: Point,
        now: Instant,
        store: &mut SceneStore<R>,
    ) {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            // Drag-end with no drag-start recorded: ignore.
            Gesture::Idle => {}
            Gesture::DragSelect { start, .. } => {
                self.selection_rect = None;
                if drag_distance(start, position) <= DRAG_THRESHOLD {
                    // An empty-canvas click clears the selection.
                    store.clear_selection();
                    return;
                }
                let a = store.viewport().screen_to_scene(start);
                let b = store.viewport().screen_to_scene(position);
                let rect = selection_rect(a, b);
                let hits: Vec<String> = store
                    .elements_ordered()
                    .filter(|element| {
                        element
                            .bounds
                            .is_some_and(|bounds| rects_intersect(rect, bounds))
                    })
                    .map(|element| element.id.clone())
                    .collect();
                store.set_selection(hits);
            }
            Gesture::ElementDrag {
                element_id,
                dragged,
                ..
            } => {
                if dragged {
                    // Hold drag state just long enough to swallow the
                    // trailing click.
                    self.suppress_until = Some(now + DRAG_RELEASE_DEBOUNCE);
                    return;
                }
                if self.suppress_until.is_some_and(|deadline| now < deadline) {
                    debug!("suppressed trailing click on {element_id}");
                    return;
                }
                store.select_element(&element_id, self.modifiers.multi_select());
            }
            Gesture::Pan { .. } => {}
        }
    }

    /// Menu entries in fixed order; customize-label is enabled only with
    /// exactly one selected text element.
    pub fn menu_items<R: Renderer>(&self, store: &SceneStore<R>) -> Vec<MenuItem> {
        let selected = store.selected_elements();
        let single_text =
            selected.len() == 1 && selected[0].kind() == ElementKind::Text;

        MenuAction::all()
            .iter()
            .map(|&action| MenuItem {
                action,
                label: action.label(),
                enabled: match action {
                    MenuAction::CustomizeLabel => single_text,
                    _ => true,
                },
            })
            .collect()
    }

    /// Execute a context-menu action. Every action closes the menu as its
    /// final step, whatever its outcome.
    pub fn apply_menu_action<R: Renderer>(
        &mut self,
        action: MenuAction,
        store: &mut SceneStore<R>,
    ) {
        match action {
            MenuAction::AddTextLabel => {
                let position = self.label_position(store);
                let id = store.add_element(SceneElement::text_label(position.x, position.y));
                store.select_element(&id, false);
                self.label_edit_request = Some(id);
            }
            MenuAction::AddImageLabel => {
                let position = self.label_position(store);
                store.add_element(SceneElement::image_label(position.x, position.y));
            }
            MenuAction::UploadImage => {
                self.upload_image_request = true;
            }
            MenuAction::CustomizeLabel => {
                let selected = store.selected_elements();
                if selected.len() == 1 && selected[0].kind() == ElementKind::Text {
                    self.label_edit_request = Some(selected[0].id.clone());
                }
            }
            MenuAction::DeleteElement => {
                for id in store.selected_ids().to_vec() {
                    store.remove_element(&id);
                }
            }
        }
        self.menu.open = false;
    }

    /// Finish an upload-image flow with the file collaborator's data URL.
    pub fn add_uploaded_image<R: Renderer>(
        &mut self,
        href: &str,
        store: &mut SceneStore<R>,
    ) -> String {
        let position = self.label_position(store);
        store.add_element(SceneElement::uploaded_image(position.x, position.y, href))
    }

    /// Placement for labels: the center of the single selected element when
    /// one exists, otherwise the right-click position in scene coordinates.
    fn label_position<R: Renderer>(&self, store: &SceneStore<R>) -> Point {
        if let Some(first) = store.selected_ids().first() {
            if let Some(center) = store.element(first).and_then(element_center) {
                return center;
            }
        }
        store
            .viewport()
            .screen_to_scene(self.menu.right_click_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::test_support::TestRenderer;

    /// A store whose viewBox matches the canvas size, so screen and scene
    /// coordinates coincide and test positions read naturally.
    fn identity_store(renderer: TestRenderer) -> SceneStore<TestRenderer> {
        let mut store = SceneStore::new(renderer);
        store.viewport_mut().view_box = "0 0 1200 800".to_string();
        store
    }

    fn store_with_rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> SceneStore<TestRenderer> {
        let renderer = TestRenderer::new().with_region(id, Rect::new(x, y, x + w, y + h));
        let mut store = identity_store(renderer);
        let mut element = SceneElement::new(ElementKind::Rect);
        element.id = id.to_string();
        element.set_attribute("x", &x.to_string());
        element.set_attribute("y", &y.to_string());
        element.set_attribute("width", &w.to_string());
        element.set_attribute("height", &h.to_string());
        store.add_element(element);
        store
    }

    fn drive(
        controller: &mut InteractionController,
        store: &mut SceneStore<TestRenderer>,
        events: &[PointerEvent],
        start: Instant,
    ) {
        for event in events {
            controller.handle_pointer(event.clone(), start, store);
        }
    }

    #[test]
    fn test_click_selects_without_moving() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        let now = Instant::now();

        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(20.0, 20.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Move {
                    position: Point::new(21.0, 21.0),
                },
                PointerEvent::Up {
                    position: Point::new(21.0, 21.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );

        assert_eq!(store.selected_ids(), ["box".to_string()]);
        // Sub-threshold movement must not nudge the shape.
        assert_eq!(store.element("box").unwrap().attribute("x").as_deref(), Some("10"));
    }

    #[test]
    fn test_drag_moves_without_selecting() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        let now = Instant::now();

        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(20.0, 20.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Move {
                    position: Point::new(30.0, 20.0),
                },
                PointerEvent::Up {
                    position: Point::new(30.0, 20.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );

        assert!(store.selected_ids().is_empty());
        let x: f64 = store
            .element("box")
            .unwrap()
            .attribute("x")
            .unwrap()
            .parse()
            .unwrap();
        assert!(x > 10.0);
    }

    #[test]
    fn test_trailing_click_after_drag_is_suppressed() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        let now = Instant::now();

        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(20.0, 20.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Move {
                    position: Point::new(40.0, 40.0),
                },
                PointerEvent::Up {
                    position: Point::new(40.0, 40.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );

        // Trailing click lands 1ms later, inside the debounce window.
        let trailing = now + Duration::from_millis(1);
        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(40.0, 40.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Up {
                    position: Point::new(40.0, 40.0),
                    button: MouseButton::Left,
                },
            ],
            trailing,
        );
        assert!(store.selected_ids().is_empty());

        // A click after the window behaves normally.
        let later = now + Duration::from_millis(50);
        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(40.0, 40.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Up {
                    position: Point::new(40.0, 40.0),
                    button: MouseButton::Left,
                },
            ],
            later,
        );
        assert_eq!(store.selected_ids().len(), 1);
    }

    #[test]
    fn test_modifier_click_toggles_multi_selection() {
        let renderer = TestRenderer::new()
            .with_region("a", Rect::new(0.0, 0.0, 50.0, 50.0))
            .with_region("b", Rect::new(100.0, 0.0, 150.0, 50.0));
        let mut store = identity_store(renderer);
        for (id, x) in [("a", 0.0), ("b", 100.0)] {
            let mut element = SceneElement::new(ElementKind::Rect);
            element.id = id.to_string();
            element.set_attribute("x", &x.to_string());
            element.set_attribute("width", "50");
            element.set_attribute("height", "50");
            store.add_element(element);
        }

        let mut controller = InteractionController::new();
        let now = Instant::now();

        let click = |pos: Point| {
            [
                PointerEvent::Down {
                    position: pos,
                    button: MouseButton::Left,
                },
                PointerEvent::Up {
                    position: pos,
                    button: MouseButton::Left,
                },
            ]
        };

        drive(&mut controller, &mut store, &click(Point::new(10.0, 10.0)), now);
        controller.set_modifiers(Modifiers {
            ctrl: true,
            ..Modifiers::default()
        });
        drive(&mut controller, &mut store, &click(Point::new(110.0, 10.0)), now);

        assert_eq!(store.selected_ids().len(), 2);

        // Ctrl-clicking a selected element deselects it.
        drive(&mut controller, &mut store, &click(Point::new(110.0, 10.0)), now);
        assert_eq!(store.selected_ids(), ["a".to_string()]);
    }

    #[test]
    fn test_drag_select_picks_overlapping_bounds() {
        let mut store = identity_store(TestRenderer::new());
        let specs = [
            ("in", 0.0, 0.0, 50.0, 50.0),
            ("out", 200.0, 200.0, 10.0, 10.0),
            ("corner", 90.0, 90.0, 20.0, 20.0),
        ];
        for (id, x, y, w, h) in specs {
            let mut element = SceneElement::new(ElementKind::Rect);
            element.id = id.to_string();
            element.set_attribute("x", &x.to_string());
            element.set_attribute("y", &y.to_string());
            element.set_attribute("width", &w.to_string());
            element.set_attribute("height", &h.to_string());
            store.add_element(element);
        }

        let mut controller = InteractionController::new();
        let now = Instant::now();

        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(0.0, 0.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Move {
                    position: Point::new(100.0, 100.0),
                },
                PointerEvent::Up {
                    position: Point::new(100.0, 100.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );

        let selected = store.selected_ids();
        assert!(selected.contains(&"in".to_string()));
        assert!(selected.contains(&"corner".to_string()));
        assert!(!selected.contains(&"out".to_string()));
    }

    #[test]
    fn test_empty_canvas_click_clears_selection() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        store.select_element("box", false);

        let mut controller = InteractionController::new();
        let now = Instant::now();
        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Down {
                    position: Point::new(500.0, 500.0),
                    button: MouseButton::Left,
                },
                PointerEvent::Up {
                    position: Point::new(500.0, 500.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );

        assert!(store.selected_ids().is_empty());
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        let now = Instant::now();

        // Move and up with no matching down: best-effort no-ops.
        drive(
            &mut controller,
            &mut store,
            &[
                PointerEvent::Move {
                    position: Point::new(20.0, 20.0),
                },
                PointerEvent::Up {
                    position: Point::new(20.0, 20.0),
                    button: MouseButton::Left,
                },
            ],
            now,
        );
        assert!(store.selected_ids().is_empty());
    }

    #[test]
    fn test_text_tool_creates_label_and_requests_dialog() {
        let mut store = SceneStore::new(TestRenderer::new());
        store.set_active_tool(Tool::Text);

        let mut controller = InteractionController::new();
        controller.handle_pointer(
            PointerEvent::Down {
                position: Point::new(100.0, 100.0),
                button: MouseButton::Left,
            },
            Instant::now(),
            &mut store,
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_ids().len(), 1);
        let requested = controller.take_label_edit_request().unwrap();
        assert_eq!(store.selected_ids()[0], requested);
        let element = store.element(&requested).unwrap();
        assert_eq!(element.attribute("textContent").as_deref(), Some("New Label"));
    }

    #[test]
    fn test_right_click_selects_and_opens_clamped_menu() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();

        controller.handle_pointer(
            PointerEvent::Down {
                position: Point::new(1190.0, 790.0),
                button: MouseButton::Right,
            },
            Instant::now(),
            &mut store,
        );

        assert!(controller.menu.open);
        assert!(controller.menu.position.x + MENU_WIDTH <= store.viewport().width);
        assert!(controller.menu.position.y + MENU_HEIGHT <= store.viewport().height);
    }

    #[test]
    fn test_customize_label_requires_single_text_selection() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let controller = InteractionController::new();

        store.select_element("box", false);
        let items = controller.menu_items(&store);
        let customize = items
            .iter()
            .find(|item| item.action == MenuAction::CustomizeLabel)
            .unwrap();
        assert!(!customize.enabled);

        let text_id = store.add_element(SceneElement::text_label(0.0, 0.0));
        store.select_element(&text_id, false);
        let items = controller.menu_items(&store);
        let customize = items
            .iter()
            .find(|item| item.action == MenuAction::CustomizeLabel)
            .unwrap();
        assert!(customize.enabled);
    }

    #[test]
    fn test_delete_action_removes_selection_and_closes_menu() {
        let mut store = store_with_rect("box", 10.0, 10.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        controller.menu.open = true;
        store.select_element("box", false);

        controller.apply_menu_action(MenuAction::DeleteElement, &mut store);

        assert!(store.is_empty());
        assert!(!controller.menu.open);
    }

    #[test]
    fn test_add_label_at_selected_element_center() {
        let mut store = store_with_rect("box", 100.0, 100.0, 50.0, 50.0);
        let mut controller = InteractionController::new();
        store.select_element("box", false);
        controller.menu.open = true;

        controller.apply_menu_action(MenuAction::AddTextLabel, &mut store);

        let id = controller.take_label_edit_request().unwrap();
        let label = store.element(&id).unwrap();
        assert_eq!(label.attribute("x").as_deref(), Some("125"));
        assert_eq!(label.attribute("y").as_deref(), Some("125"));
        assert!(!controller.menu.open);
    }

    #[test]
    fn test_wheel_zoom_is_clamped() {
        let mut store = SceneStore::new(TestRenderer::new());
        let mut controller = InteractionController::new();
        let now = Instant::now();

        for _ in 0..100 {
            controller.handle_pointer(
                PointerEvent::Wheel {
                    position: Point::new(600.0, 400.0),
                    delta_y: -1.0,
                },
                now,
                &mut store,
            );
        }
        assert!((store.viewport().zoom() - 10.0).abs() < f64::EPSILON);
    }
}
