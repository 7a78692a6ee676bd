//! Scene persistence under a storage quota.
//!
//! A single logical record list lives under one storage key, capped at a
//! total serialized size of 5 MiB and at 10 records (oldest evicted first
//! by timestamp). Backends only move one opaque payload string; all policy
//! lives in [`SceneArchive`].

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

use crate::events::{EditorEvent, EventBus};
use log::warn;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// The one storage key the record list lives under.
pub const STORAGE_KEY: &str = "svg-editor-data";

/// Total serialized-size quota for the stored collection.
pub const MAX_STORAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum number of retained scenes; oldest evicted first.
pub const MAX_STORED_SCENES: usize = 10;

/// Thumbnail dimensions for stored previews.
pub const THUMBNAIL_SIZE: u32 = 100;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async backend operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A key-value style backend holding the serialized collection payload.
///
/// Reads of a missing payload return `Ok(None)`; a write either fully
/// replaces the payload or fails leaving the prior state untouched.
pub trait StorageBackend: Send + Sync {
    fn read(&self) -> BoxFuture<'_, StorageResult<Option<String>>>;
    fn write(&self, payload: String) -> BoxFuture<'_, StorageResult<()>>;
    fn clear(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// Produces a size-bounded serialized preview of scene content.
pub trait Thumbnailer {
    /// Empty string on any parse failure, never an error.
    fn thumbnail(&self, content: &str) -> String;
}

/// One persisted scene record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScene {
    pub id: String,
    pub name: String,
    #[serde(rename = "serializedContent")]
    pub content: String,
    #[serde(rename = "timestampMs")]
    pub timestamp: u64,
    #[serde(default)]
    pub thumbnail: String,
}

/// Outcome of the save-or-update resolution flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// An existing record was refreshed in place.
    Updated(String),
    /// A new record was appended.
    Created(String),
    Failed,
}

/// Usage summary for status displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageInfo {
    pub used: usize,
    pub limit: usize,
    pub percentage: f64,
}

fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// The persistence layer. Exclusively owns the stored-scene collection; no
/// other component touches the backend directly.
pub struct SceneArchive<B: StorageBackend> {
    backend: B,
    thumbnailer: Option<Box<dyn Thumbnailer>>,
    events: EventBus,
}

impl<B: StorageBackend> SceneArchive<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            thumbnailer: None,
            events: EventBus::new(),
        }
    }

    /// Attach a thumbnail generator; without one thumbnails are empty.
    pub fn with_thumbnailer(mut self, thumbnailer: Box<dyn Thumbnailer>) -> Self {
        self.thumbnailer = Some(thumbnailer);
        self
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    fn generate_id() -> String {
        format!("scene-{}", Uuid::new_v4())
    }

    fn make_thumbnail(&self, content: &str) -> String {
        self.thumbnailer
            .as_ref()
            .map(|t| t.thumbnail(content))
            .unwrap_or_default()
    }

    /// Read the whole collection. A corrupted or missing payload reads as
    /// an empty collection.
    pub async fn read_all(&self) -> Vec<StoredScene> {
        let payload = match self.backend.read().await {
            Ok(payload) => payload,
            Err(error) => {
                warn!("storage read failed: {error}");
                return Vec::new();
            }
        };
        let Some(payload) = payload else {
            return Vec::new();
        };
        match serde_json::from_str(&payload) {
            Ok(scenes) => scenes,
            Err(error) => {
                warn!("corrupted scene collection, starting empty: {error}");
                Vec::new()
            }
        }
    }

    async fn write_all(&self, scenes: &[StoredScene]) -> StorageResult<()> {
        let payload = serde_json::to_string(scenes)
            .map_err(|error| StorageError::Serialization(error.to_string()))?;
        self.backend.write(payload).await
    }

    /// Append a new scene. Fails without a partial write when the quota
    /// would be exceeded; evicts the oldest records past the count cap.
    pub async fn save(&mut self, content: &str, name: &str) -> bool {
        self.save_with_timestamp(content, name, current_time_ms())
            .await
    }

    /// Save with an explicit timestamp. The public entry point stamps the
    /// current time; eviction ordering follows whatever is stored.
    pub async fn save_with_timestamp(&mut self, content: &str, name: &str, timestamp: u64) -> bool {
        let scene = StoredScene {
            id: Self::generate_id(),
            name: name.to_string(),
            content: content.to_string(),
            timestamp,
            thumbnail: self.make_thumbnail(content),
        };

        let mut scenes = self.read_all().await;
        scenes.push(scene.clone());

        match serde_json::to_string(&scenes) {
            Ok(payload) if payload.len() > MAX_STORAGE_SIZE => return false,
            Ok(_) => {}
            Err(error) => {
                warn!("failed to serialize collection: {error}");
                return false;
            }
        }

        if scenes.len() > MAX_STORED_SCENES {
            scenes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            scenes.truncate(MAX_STORED_SCENES);
        }

        if let Err(error) = self.write_all(&scenes).await {
            warn!("failed to persist scene: {error}");
            return false;
        }

        self.events.emit(&EditorEvent::SceneSaved {
            id: scene.id,
            name: scene.name,
        });
        true
    }

    /// Replace a record's content in place, refreshing its timestamp and
    /// thumbnail, and its name only when one is provided. Fails when the id
    /// is unknown.
    pub async fn update(&mut self, id: &str, content: &str, name: Option<&str>) -> bool {
        let thumbnail = self.make_thumbnail(content);
        let mut scenes = self.read_all().await;
        let Some(scene) = scenes.iter_mut().find(|scene| scene.id == id) else {
            return false;
        };

        scene.content = content.to_string();
        scene.timestamp = current_time_ms();
        scene.thumbnail = thumbnail;
        if let Some(name) = name {
            scene.name = name.to_string();
        }
        let (id, name) = (scene.id.clone(), scene.name.clone());

        if let Err(error) = self.write_all(&scenes).await {
            warn!("failed to persist update: {error}");
            return false;
        }

        self.events.emit(&EditorEvent::SceneSaved { id, name });
        true
    }

    /// Delete a record. False when the id is unknown.
    pub async fn delete(&mut self, id: &str) -> bool {
        let scenes = self.read_all().await;
        let remaining: Vec<StoredScene> =
            scenes.iter().filter(|scene| scene.id != id).cloned().collect();
        if remaining.len() == scenes.len() {
            return false;
        }
        self.write_all(&remaining).await.is_ok()
    }

    pub async fn load(&self, id: &str) -> Option<StoredScene> {
        self.read_all().await.into_iter().find(|scene| scene.id == id)
    }

    /// The most recent record by timestamp.
    pub async fn load_latest(&self) -> Option<StoredScene> {
        self.read_all()
            .await
            .into_iter()
            .max_by_key(|scene| scene.timestamp)
    }

    /// Exact content match, used to detect a re-save of an open scene.
    pub async fn find_by_content(&self, content: &str) -> Option<StoredScene> {
        self.read_all()
            .await
            .into_iter()
            .find(|scene| scene.content == content)
    }

    pub async fn find_by_name(&self, name: &str) -> Option<StoredScene> {
        self.read_all()
            .await
            .into_iter()
            .find(|scene| scene.name == name)
    }

    /// The save resolution flow: a known current id updates in place; an
    /// exact content match adopts that record; otherwise a new record is
    /// created under the given name.
    pub async fn persist_scene(
        &mut self,
        current_id: Option<&str>,
        content: &str,
        name: &str,
    ) -> SaveOutcome {
        if let Some(id) = current_id {
            if self.load(id).await.is_some() {
                return if self.update(id, content, None).await {
                    SaveOutcome::Updated(id.to_string())
                } else {
                    SaveOutcome::Failed
                };
            }
        }

        if let Some(existing) = self.find_by_content(content).await {
            return if self.update(&existing.id, content, None).await {
                SaveOutcome::Updated(existing.id)
            } else {
                SaveOutcome::Failed
            };
        }

        if self.save(content, name).await {
            match self.find_by_name(name).await {
                Some(created) => SaveOutcome::Created(created.id),
                None => SaveOutcome::Failed,
            }
        } else {
            SaveOutcome::Failed
        }
    }

    /// Drop the whole collection.
    pub async fn clear_all(&mut self) -> bool {
        self.backend.clear().await.is_ok()
    }

    /// Export the collection as pretty-printed JSON.
    pub async fn export_all(&self) -> String {
        let scenes = self.read_all().await;
        serde_json::to_string_pretty(&scenes).unwrap_or_else(|_| "[]".to_string())
    }

    /// Import records from JSON. Every incoming record must carry the four
    /// required fields; records merge with the existing collection and
    /// duplicates resolve to the first occurrence (existing records win).
    pub async fn import_all(&mut self, json: &str) -> bool {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(json) else {
            return false;
        };
        let Some(items) = value.as_array() else {
            return false;
        };
        for item in items {
            let valid = item.get("id").is_some_and(|v| v.is_string())
                && item.get("name").is_some_and(|v| v.is_string())
                && item.get("serializedContent").is_some_and(|v| v.is_string())
                && item.get("timestampMs").is_some_and(|v| v.is_u64());
            if !valid {
                return false;
            }
        }
        let Ok(imported) = serde_json::from_value::<Vec<StoredScene>>(value) else {
            return false;
        };

        let mut merged = self.read_all().await;
        for scene in imported {
            if !merged.iter().any(|existing| existing.id == scene.id) {
                merged.push(scene);
            }
        }
        self.write_all(&merged).await.is_ok()
    }

    /// Current usage against the quota.
    pub async fn storage_info(&self) -> StorageInfo {
        let used = match self.backend.read().await {
            Ok(Some(payload)) => payload.len(),
            _ => 0,
        };
        let percentage = (used as f64 / MAX_STORAGE_SIZE as f64 * 100.0 * 100.0).round() / 100.0;
        StorageInfo {
            used,
            limit: MAX_STORAGE_SIZE,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    /// Backend whose writes always fail, for partial-write tests.
    struct FailingBackend {
        payload: RwLock<Option<String>>,
    }

    impl FailingBackend {
        fn with_payload(payload: &str) -> Self {
            Self {
                payload: RwLock::new(Some(payload.to_string())),
            }
        }
    }

    impl StorageBackend for FailingBackend {
        fn read(&self) -> BoxFuture<'_, StorageResult<Option<String>>> {
            Box::pin(async move {
                Ok(self
                    .payload
                    .read()
                    .map_err(|e| StorageError::Backend(e.to_string()))?
                    .clone())
            })
        }

        fn write(&self, _payload: String) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async move { Err(StorageError::Backend("disk full".to_string())) })
        }

        fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async move { Err(StorageError::Backend("disk full".to_string())) })
        }
    }

    fn archive() -> SceneArchive<MemoryBackend> {
        SceneArchive::new(MemoryBackend::new())
    }

    #[test]
    fn test_save_and_load_round_trips_content() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut archive = archive();
        let content = "<svg><rect width=\"10\" height=\"10\"/></svg>";

        assert!(block_on(archive.save(content, "First")));
        let loaded = block_on(archive.find_by_name("First")).unwrap();
        assert_eq!(loaded.content, content);

        let by_id = block_on(archive.load(&loaded.id)).unwrap();
        assert_eq!(by_id.content, content);
    }

    #[test]
    fn test_update_preserves_id_and_position() {
        let mut archive = archive();
        block_on(archive.save("<svg>a</svg>", "A"));
        block_on(archive.save("<svg>b</svg>", "B"));

        let original = block_on(archive.find_by_name("A")).unwrap();
        assert!(block_on(archive.update(&original.id, "<svg>a2</svg>", None)));

        let scenes = block_on(archive.read_all());
        assert_eq!(scenes[0].id, original.id);
        assert_eq!(scenes[0].content, "<svg>a2</svg>");
        assert_eq!(scenes[0].name, "A");
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut archive = archive();
        assert!(!block_on(archive.update("nope", "<svg/>", None)));
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let mut archive = archive();
        block_on(archive.save("<svg/>", "A"));
        assert!(!block_on(archive.delete("nope")));
        assert!(block_on(archive.read_all()).len() == 1);
    }

    #[test]
    fn test_capacity_keeps_ten_most_recent() {
        let mut archive = archive();
        for i in 0..11u64 {
            let saved = block_on(archive.save_with_timestamp(
                &format!("<svg>{}</svg>", i),
                &format!("Scene {}", i),
                1000 + i,
            ));
            assert!(saved);
        }

        let scenes = block_on(archive.read_all());
        assert_eq!(scenes.len(), MAX_STORED_SCENES);
        // The oldest record (timestamp 1000) was evicted.
        assert!(scenes.iter().all(|scene| scene.timestamp > 1000));
    }

    #[test]
    fn test_quota_rejects_before_any_write() {
        let mut archive = archive();
        block_on(archive.save("<svg>small</svg>", "Small"));

        let huge = "x".repeat(MAX_STORAGE_SIZE);
        assert!(!block_on(archive.save(&huge, "Huge")));

        let scenes = block_on(archive.read_all());
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name, "Small");
    }

    #[test]
    fn test_failed_write_leaves_prior_state() {
        let existing = serde_json::to_string(&vec![StoredScene {
            id: "keep".to_string(),
            name: "Keep".to_string(),
            content: "<svg/>".to_string(),
            timestamp: 1,
            thumbnail: String::new(),
        }])
        .unwrap();

        let mut archive = SceneArchive::new(FailingBackend::with_payload(&existing));
        assert!(!block_on(archive.save("<svg>new</svg>", "New")));

        let scenes = block_on(archive.read_all());
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].id, "keep");
    }

    #[test]
    fn test_corrupted_payload_reads_empty() {
        let archive = SceneArchive::new(FailingBackend::with_payload("{not json"));
        assert!(block_on(archive.read_all()).is_empty());
    }

    #[test]
    fn test_find_by_content_exact_match() {
        let mut archive = archive();
        block_on(archive.save("<svg>alpha</svg>", "Alpha"));

        assert!(block_on(archive.find_by_content("<svg>alpha</svg>")).is_some());
        assert!(block_on(archive.find_by_content("<svg>beta</svg>")).is_none());
    }

    #[test]
    fn test_load_latest() {
        let mut archive = archive();
        block_on(archive.save_with_timestamp("<svg>old</svg>", "Old", 100));
        block_on(archive.save_with_timestamp("<svg>new</svg>", "New", 200));

        let latest = block_on(archive.load_latest()).unwrap();
        assert_eq!(latest.name, "New");
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut archive = archive();
        block_on(archive.save("<svg>a</svg>", "A"));
        let exported = block_on(archive.export_all());

        let mut other = SceneArchive::new(MemoryBackend::new());
        assert!(block_on(other.import_all(&exported)));

        let scenes = block_on(other.read_all());
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name, "A");
    }

    #[test]
    fn test_import_validates_required_fields() {
        let mut archive = archive();
        assert!(!block_on(archive.import_all("not json")));
        assert!(!block_on(archive.import_all("{}")));
        assert!(!block_on(
            archive.import_all(r#"[{"id": "x", "name": "No content"}]"#)
        ));
    }

    #[test]
    fn test_import_dedups_by_id_first_wins() {
        let mut archive = archive();
        block_on(archive.save("<svg>mine</svg>", "Mine"));
        let existing = block_on(archive.read_all())[0].clone();

        let incoming = serde_json::to_string(&vec![StoredScene {
            id: existing.id.clone(),
            name: "Imposter".to_string(),
            content: "<svg>other</svg>".to_string(),
            timestamp: 999,
            thumbnail: String::new(),
        }])
        .unwrap();

        assert!(block_on(archive.import_all(&incoming)));
        let scenes = block_on(archive.read_all());
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name, "Mine");
    }

    #[test]
    fn test_persist_scene_resolution() {
        let mut archive = archive();

        // No current id, no match: creates.
        let outcome = block_on(archive.persist_scene(None, "<svg>one</svg>", "One"));
        let SaveOutcome::Created(id) = outcome else {
            panic!("expected creation");
        };

        // Current id known: updates in place.
        let outcome = block_on(archive.persist_scene(Some(&id), "<svg>one-v2</svg>", "One"));
        assert_eq!(outcome, SaveOutcome::Updated(id.clone()));

        // No current id but exact content match: adopts the record.
        let outcome = block_on(archive.persist_scene(None, "<svg>one-v2</svg>", "Whatever"));
        assert_eq!(outcome, SaveOutcome::Updated(id));
    }

    #[test]
    fn test_storage_info_percentage() {
        let mut archive = archive();
        let info = block_on(archive.storage_info());
        assert_eq!(info.used, 0);

        block_on(archive.save("<svg>content</svg>", "A"));
        let info = block_on(archive.storage_info());
        assert!(info.used > 0);
        assert_eq!(info.limit, MAX_STORAGE_SIZE);
        assert!(info.percentage > 0.0);
    }

    #[test]
    fn test_saved_event_emitted() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut archive = archive();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        archive.events_mut().subscribe(move |event| {
            if let EditorEvent::SceneSaved { name, .. } = event {
                sink.borrow_mut().push(name.clone());
            }
        });

        block_on(archive.save("<svg/>", "Notify"));
        assert_eq!(*seen.borrow(), vec!["Notify".to_string()]);
    }
}
