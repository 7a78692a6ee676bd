//! VectorInk Core Library
//!
//! Platform-agnostic scene model and editing logic for the VectorInk SVG
//! editor: the scene store, interaction controller, animation scheduler and
//! persistence layer, plus the renderer abstraction they drive.

pub mod animation;
pub mod color;
pub mod context_menu;
pub mod element;
pub mod events;
pub mod file;
pub mod geometry;
pub mod interaction;
pub mod properties;
pub mod render;
pub mod scene;
pub mod storage;
pub mod transform;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use animation::{AnimationConfig, AnimationKind, AnimationScheduler};
pub use context_menu::{ContextMenu, MenuAction, MenuItem};
pub use element::{ElementKind, ElementShape, SceneElement};
pub use events::{EditorEvent, EventBus};
pub use interaction::{InteractionController, Modifiers, MouseButton, PointerEvent};
pub use render::{NodeSnapshot, RenderError, Renderer};
pub use scene::{Layer, SceneStore, Tool};
pub use storage::{SceneArchive, StorageBackend, StoredScene, Thumbnailer};
pub use transform::TransformValues;
pub use viewport::Viewport;
