//! Animation scheduler: timed attribute mutation per element.
//!
//! Keeps an explicit registry keyed by element id mapping to at most one
//! live interval timer, with start always superseding any prior schedule.
//! The host drives time by calling [`AnimationScheduler::tick`]; each due
//! interval executes one animation cycle, itself a two-phase apply/revert
//! pair nested inside the outer interval.

use crate::events::{EditorEvent, EventBus};
use crate::render::Renderer;
use crate::scene::SceneStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Transient scale factor appended during a scale cycle.
pub const ANIMATION_SCALE: f64 = 1.2;
/// Rotation in degrees appended during a rotate cycle.
pub const ANIMATION_ROTATION: f64 = 360.0;
/// Dimmed opacity applied during an opacity cycle.
pub const ANIMATION_OPACITY: f64 = 0.3;

pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 1000;
pub const DEFAULT_ANIMATION_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_ANIMATION_COLOR: &str = "#ff0000";

/// The four supported animation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    #[default]
    ColorChange,
    Scale,
    Rotate,
    Opacity,
}

impl AnimationKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnimationKind::ColorChange => "Color Change",
            AnimationKind::Scale => "Scale",
            AnimationKind::Rotate => "Rotate",
            AnimationKind::Opacity => "Opacity",
        }
    }
}

/// Per-element animation configuration.
///
/// `timer` is present exactly while the animation is scheduled. The
/// original color is captured lazily on the first color-change cycle and
/// memoized so later cycles restore the same baseline.
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    pub element_id: String,
    pub enabled: bool,
    pub kind: AnimationKind,
    pub duration_ms: u64,
    pub interval_ms: u64,
    pub color: String,
    pub original_color: Option<String>,
    timer: Option<Instant>,
}

impl AnimationConfig {
    pub fn new(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            enabled: true,
            kind: AnimationKind::default(),
            duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            interval_ms: DEFAULT_ANIMATION_INTERVAL_MS,
            color: DEFAULT_ANIMATION_COLOR.to_string(),
            original_color: None,
            timer: None,
        }
    }

    pub fn with_kind(mut self, kind: AnimationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_timing(mut self, duration_ms: u64, interval_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    /// Whether a timer is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}

/// Partial update applied by [`AnimationScheduler::update_config`].
#[derive(Debug, Clone, Default)]
pub struct AnimationConfigPatch {
    pub enabled: Option<bool>,
    pub kind: Option<AnimationKind>,
    pub duration_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub color: Option<String>,
}

/// A scheduled phase-two revert restoring captured attributes.
#[derive(Debug, Clone)]
struct PendingRevert {
    due: Instant,
    patch: Vec<(String, String)>,
}

/// Drives zero-or-one repeating timer per element.
pub struct AnimationScheduler {
    preview_mode: bool,
    animations: HashMap<String, AnimationConfig>,
    reverts: HashMap<String, PendingRevert>,
    events: EventBus,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            preview_mode: false,
            animations: HashMap::new(),
            reverts: HashMap::new(),
            events: EventBus::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn is_preview_mode(&self) -> bool {
        self.preview_mode
    }

    /// Enable or disable preview mode. Disabling cancels every running
    /// timer and every pending revert; no residual callbacks fire after.
    pub fn set_preview_mode(&mut self, enabled: bool) {
        self.preview_mode = enabled;
        if !enabled {
            self.stop_all();
        }
    }

    pub fn toggle_preview_mode(&mut self) {
        self.set_preview_mode(!self.preview_mode);
    }

    /// Insert or replace the config for an element.
    pub fn add_animation(&mut self, config: AnimationConfig) {
        self.animations.insert(config.element_id.clone(), config);
    }

    /// Remove an element's config; a running timer and any pending revert
    /// are cancelled with it.
    pub fn remove_animation(&mut self, element_id: &str) {
        self.animations.remove(element_id);
        self.reverts.remove(element_id);
    }

    pub fn config(&self, element_id: &str) -> Option<&AnimationConfig> {
        self.animations.get(element_id)
    }

    /// Merge a partial update into an existing config without touching the
    /// run state. Changing the timing fields does not reschedule an
    /// in-flight timer; stop and start again to apply them.
    pub fn update_config(&mut self, element_id: &str, patch: AnimationConfigPatch) {
        let Some(config) = self.animations.get_mut(element_id) else {
            return;
        };
        if let Some(enabled) = patch.enabled {
            config.enabled = enabled;
        }
        if let Some(kind) = patch.kind {
            config.kind = kind;
        }
        if let Some(duration) = patch.duration_ms {
            config.duration_ms = duration;
        }
        if let Some(interval) = patch.interval_ms {
            config.interval_ms = interval;
        }
        if let Some(color) = patch.color {
            config.color = color;
        }
    }

    /// Schedule the repeating timer for an element. No-op without an
    /// enabled config; an already-running timer is cancelled and replaced,
    /// never stacked.
    pub fn start(&mut self, element_id: &str, now: Instant) {
        let Some(config) = self.animations.get_mut(element_id) else {
            debug!("start: no animation config for {element_id}");
            return;
        };
        if !config.enabled {
            return;
        }
        config.timer = Some(now + Duration::from_millis(config.interval_ms));
    }

    /// Clear the timer, keeping the config and captured originals so a
    /// later start reproduces the same baseline. Idempotent.
    pub fn stop(&mut self, element_id: &str) {
        if let Some(config) = self.animations.get_mut(element_id) {
            config.timer = None;
        }
    }

    /// Pause is behaviorally identical to stop at this layer.
    pub fn pause(&mut self, element_id: &str) {
        self.stop(element_id);
    }

    /// Resume restarts the interval from zero.
    pub fn resume(&mut self, element_id: &str, now: Instant) {
        self.start(element_id, now);
    }

    pub fn is_running(&self, element_id: &str) -> bool {
        self.animations
            .get(element_id)
            .is_some_and(|config| config.is_running())
    }

    /// Cancel every timer and pending revert.
    fn stop_all(&mut self) {
        for config in self.animations.values_mut() {
            config.timer = None;
        }
        self.reverts.clear();
    }

    /// Advance time: fire due reverts, then execute one cycle for every due
    /// interval. A failed cycle is isolated; later ticks still run.
    pub fn tick<R: Renderer>(&mut self, now: Instant, store: &mut SceneStore<R>) {
        let due_reverts: Vec<String> = self
            .reverts
            .iter()
            .filter(|(_, revert)| revert.due <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for element_id in due_reverts {
            if let Some(revert) = self.reverts.remove(&element_id) {
                store.update_element(&element_id, &revert.patch);
            }
        }

        let due_ids: Vec<String> = self
            .animations
            .values()
            .filter(|config| config.timer.is_some_and(|at| at <= now))
            .map(|config| config.element_id.clone())
            .collect();

        for element_id in due_ids {
            let Some(config) = self.animations.get_mut(&element_id) else {
                continue;
            };
            config.timer = Some(now + Duration::from_millis(config.interval_ms));

            if !self.execute_cycle(&element_id, now, store) {
                warn!("animation cycle skipped for {element_id}");
            }
        }
    }

    /// Run one apply phase and schedule its revert. Returns false when the
    /// element no longer exists.
    fn execute_cycle<R: Renderer>(
        &mut self,
        element_id: &str,
        now: Instant,
        store: &mut SceneStore<R>,
    ) -> bool {
        let Some(config) = self.animations.get_mut(element_id) else {
            return false;
        };
        let Some(element) = store.element(element_id) else {
            return false;
        };

        let (apply, revert) = match config.kind {
            AnimationKind::ColorChange => {
                if config.original_color.is_none() {
                    let original = element
                        .attribute("fill")
                        .or_else(|| element.attribute("stroke"))
                        .unwrap_or_else(|| "#000000".to_string());
                    config.original_color = Some(original);
                }
                let original = config.original_color.clone().unwrap_or_default();
                (
                    vec![("fill".to_string(), config.color.clone())],
                    vec![("fill".to_string(), original)],
                )
            }
            AnimationKind::Scale => {
                let current = element.attribute("transform").unwrap_or_default();
                let applied = if current.is_empty() {
                    format!("scale({})", crate::transform::fmt_number(ANIMATION_SCALE))
                } else {
                    format!(
                        "{} scale({})",
                        current,
                        crate::transform::fmt_number(ANIMATION_SCALE)
                    )
                };
                (
                    vec![("transform".to_string(), applied)],
                    vec![("transform".to_string(), current)],
                )
            }
            AnimationKind::Rotate => {
                let current = element.attribute("transform").unwrap_or_default();
                let applied = if current.is_empty() {
                    format!("rotate({})", crate::transform::fmt_number(ANIMATION_ROTATION))
                } else {
                    format!(
                        "{} rotate({})",
                        current,
                        crate::transform::fmt_number(ANIMATION_ROTATION)
                    )
                };
                (
                    vec![("transform".to_string(), applied)],
                    vec![("transform".to_string(), current)],
                )
            }
            AnimationKind::Opacity => {
                let current = element
                    .attribute("opacity")
                    .unwrap_or_else(|| "1".to_string());
                (
                    vec![(
                        "opacity".to_string(),
                        crate::transform::fmt_number(ANIMATION_OPACITY),
                    )],
                    vec![("opacity".to_string(), current)],
                )
            }
        };

        let duration = Duration::from_millis(config.duration_ms);
        let snapshot = config.clone();

        store.update_element(element_id, &apply);
        // One pending revert per element; a new cycle supersedes the old.
        self.reverts.insert(
            element_id.to_string(),
            PendingRevert {
                due: now + duration,
                patch: revert,
            },
        );
        self.events
            .emit(&EditorEvent::AnimationTick { config: snapshot });
        true
    }
}
