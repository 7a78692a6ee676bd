//! VectorInk Render
//!
//! Document-backed implementation of the renderer abstraction defined by
//! `vectorink-core`: a mutable in-memory SVG tree with parsing, bounds
//! queries, hit testing, serialization and thumbnail generation.

pub mod document;
pub mod renderer;

pub use document::{node_bounds, DocumentError, SvgDocument, SvgNode};
pub use renderer::{generate_thumbnail, SvgRenderer, SvgThumbnailer};

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use vectorink_core::scene::SceneStore;
    use vectorink_core::storage::{MemoryBackend, SceneArchive};
    use vectorink_core::SceneElement;
    use vectorink_core::Renderer;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
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

    const SAMPLE: &str = r#"<svg width="200" height="200" viewBox="0 0 200 200">
        <rect id="frame" x="10" y="10" width="100" height="80" fill="rgb(255,0,0)"/>
        <circle cx="150" cy="150" r="20"/>
    </svg>"#;

    #[test]
    fn test_load_reconcile_edit_export() {
        let mut store = SceneStore::new(SvgRenderer::new());
        let added = store.load_svg_content(SAMPLE).unwrap();
        assert_eq!(added, 2);

        // The id-less circle got one assigned in both views.
        let circle_id = store
            .elements_ordered()
            .find(|element| element.attribute("r").is_some())
            .map(|element| element.id.clone())
            .unwrap();
        assert!(store.renderer().document().find_by_id(&circle_id).is_some());

        store.update_element(
            "frame",
            &[("fill".to_string(), "#00ff00".to_string())],
        );
        let exported = store.export_scene();
        assert!(exported.contains("fill=\"#00ff00\""));
        assert!(exported.contains(&circle_id));
    }

    #[test]
    fn test_hit_test_through_store() {
        let mut store = SceneStore::new(SvgRenderer::new());
        store.load_svg_content(SAMPLE).unwrap();

        let hit = store.renderer_mut().hit_test(Point::new(20.0, 20.0));
        assert_eq!(hit.as_deref(), Some("frame"));
    }

    #[test]
    fn test_transient_markup_stripped_from_export() {
        let mut store = SceneStore::new(SvgRenderer::new());
        store.load_svg_content(SAMPLE).unwrap();

        let mut marker = SvgNode::new("rect");
        marker.set_attr("class", "selection-rectangle");
        marker.set_attr("width", "5");
        marker.set_attr("height", "5");
        store.renderer_mut().document_mut().append(marker);

        assert!(!store.export_scene().contains("selection-rectangle"));
    }

    #[test]
    fn test_created_elements_render_into_document() {
        let mut store = SceneStore::new(SvgRenderer::new());
        let id = store.add_element(SceneElement::text_label(40.0, 50.0));

        let exported = store.export_scene();
        assert!(exported.contains(&id));
        assert!(exported.contains("New Label"));
    }

    #[test]
    fn test_exported_scene_round_trips_through_archive() {
        let mut store = SceneStore::new(SvgRenderer::new());
        store.load_svg_content(SAMPLE).unwrap();
        let exported = store.export_scene();

        let mut archive =
            SceneArchive::new(MemoryBackend::new()).with_thumbnailer(Box::new(SvgThumbnailer));
        assert!(block_on(archive.save(&exported, "Round Trip")));

        let stored = block_on(archive.find_by_name("Round Trip")).unwrap();
        // Byte-for-byte round trip of the serialized content.
        assert_eq!(stored.content, exported);
        assert!(stored.thumbnail.contains("width=\"100\""));

        // And the stored content loads back into a fresh editor.
        let mut restored = SceneStore::new(SvgRenderer::new());
        let added = restored.load_svg_content(&stored.content).unwrap();
        assert_eq!(added, 2);
    }
}
