//! Context menu state and positioning.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Menu dimensions used for edge clamping.
pub const MENU_WIDTH: f64 = 180.0;
pub const MENU_HEIGHT: f64 = 250.0;
pub const MENU_MARGIN: f64 = 10.0;

/// The fixed, ordered context-menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    AddTextLabel,
    AddImageLabel,
    UploadImage,
    CustomizeLabel,
    DeleteElement,
}

impl MenuAction {
    /// All actions in display order.
    pub fn all() -> &'static [MenuAction] {
        &[
            MenuAction::AddTextLabel,
            MenuAction::AddImageLabel,
            MenuAction::UploadImage,
            MenuAction::CustomizeLabel,
            MenuAction::DeleteElement,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::AddTextLabel => "Add Text Label",
            MenuAction::AddImageLabel => "Add Image Label",
            MenuAction::UploadImage => "Upload Image",
            MenuAction::CustomizeLabel => "Customize Label",
            MenuAction::DeleteElement => "Delete",
        }
    }
}

/// One renderable menu entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    pub enabled: bool,
}

/// Transient context-menu UI state.
#[derive(Debug, Clone, Default)]
pub struct ContextMenu {
    pub open: bool,
    /// Clamped display position, in screen coordinates.
    pub position: Point,
    /// Raw right-click position the actions use for placement.
    pub right_click_position: Point,
}

/// Clamp a menu position so the menu stays fully inside the container:
/// shifted left/up by its own size plus a margin when it would overflow the
/// right/bottom edge, and held off the top/left edge by the margin.
pub fn adjust_menu_position(
    position: Point,
    menu_width: f64,
    menu_height: f64,
    container_width: f64,
    container_height: f64,
) -> Point {
    let mut x = position.x;
    let mut y = position.y;

    if x + menu_width > container_width {
        x = container_width - menu_width - MENU_MARGIN;
    }
    if y + menu_height > container_height {
        y = container_height - menu_height - MENU_MARGIN;
    }
    if x < 0.0 {
        x = MENU_MARGIN;
    }
    if y < 0.0 {
        y = MENU_MARGIN;
    }

    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_inside_is_unchanged() {
        let adjusted = adjust_menu_position(Point::new(50.0, 60.0), 180.0, 250.0, 1200.0, 800.0);
        assert_eq!(adjusted, Point::new(50.0, 60.0));
    }

    #[test]
    fn test_right_edge_overflow_shifts_left() {
        let adjusted = adjust_menu_position(Point::new(1150.0, 60.0), 180.0, 250.0, 1200.0, 800.0);
        assert_eq!(adjusted.x, 1200.0 - 180.0 - MENU_MARGIN);
    }

    #[test]
    fn test_bottom_edge_overflow_shifts_up() {
        let adjusted = adjust_menu_position(Point::new(50.0, 700.0), 180.0, 250.0, 1200.0, 800.0);
        assert_eq!(adjusted.y, 800.0 - 250.0 - MENU_MARGIN);
    }

    #[test]
    fn test_negative_position_gets_margin() {
        let adjusted = adjust_menu_position(Point::new(-20.0, -5.0), 180.0, 250.0, 1200.0, 800.0);
        assert_eq!(adjusted, Point::new(MENU_MARGIN, MENU_MARGIN));
    }

    #[test]
    fn test_action_order_is_fixed() {
        let labels: Vec<&str> = MenuAction::all().iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            [
                "Add Text Label",
                "Add Image Label",
                "Upload Image",
                "Customize Label",
                "Delete"
            ]
        );
    }
}
