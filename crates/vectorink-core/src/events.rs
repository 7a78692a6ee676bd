//! Editor notifications via explicit observer registration.
//!
//! Presentation components subscribe to the bus of the component they care
//! about; there is no ambient global dispatch.

use crate::animation::AnimationConfig;

/// Notifications the core emits for presentation components.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// The selection set changed.
    SelectionChanged { selected_ids: Vec<String> },
    /// An element was moved by a drag gesture.
    ElementDragged { element_id: String, dx: f64, dy: f64 },
    /// A document was loaded and reconciled into the scene.
    ContentLoaded { element_count: usize },
    /// A scene was persisted.
    SceneSaved { id: String, name: String },
    /// One animation cycle executed for the carried config.
    AnimationTick { config: AnimationConfig },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(usize);

type Subscriber = Box<dyn FnMut(&EditorEvent)>;

/// A simple synchronous observer registry.
#[derive(Default)]
pub struct EventBus {
    next_id: usize,
    subscribers: Vec<(usize, Subscriber)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it is called synchronously for every emit.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: FnMut(&EditorEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(observer)));
        SubscriberId(id)
    }

    /// Remove an observer. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id.0);
    }

    /// Deliver an event to every subscriber in registration order.
    pub fn emit(&mut self, event: &EditorEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
