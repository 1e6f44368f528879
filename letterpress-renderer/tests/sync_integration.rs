//! Integration tests for HTML rendering and document sync (letterpress-renderer).
//!
//! Tests stacking order in the fragment, sync idempotence over arbitrary
//! documents, and full editor-to-document round trips.

use letterpress_core::{CanvasEditor, ElementPatch, ElementStore, ElementType, InputEvent};
use letterpress_renderer::{
    render_fragment, sync, sync_store, wrap, HtmlConfig, HtmlRenderer, RenderError,
    CONTENT_END, CONTENT_START,
};
use proptest::prelude::*;

/// Build a store of shapes with the given z-indexes, tagged by x position.
fn store_with_z(z_indexes: &[i64]) -> ElementStore {
    let mut store = ElementStore::new();
    for (i, z) in z_indexes.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = (i as f32 + 1.0) * 100.0;
        let id = store.insert_default(ElementType::Shape, x, 0.0).id;
        store.update(id, &ElementPatch::z_index(*z));
    }
    store
}

#[test]
fn fragment_follows_stacking_order() {
    let store = store_with_z(&[5, 1, 3]);
    let html = render_fragment(&store);

    let z1 = html.find("z-index: 1;").expect("z 1 rendered");
    let z3 = html.find("z-index: 3;").expect("z 3 rendered");
    let z5 = html.find("z-index: 5;").expect("z 5 rendered");
    assert!(z1 < z3 && z3 < z5, "elements must be emitted as 1, 3, 5");
}

#[test]
fn negative_z_renders_first() {
    let store = store_with_z(&[0, -4]);
    let html = render_fragment(&store);
    let back = html.find("left: 200px").expect("second element");
    let front = html.find("left: 100px").expect("first element");
    assert!(back < front);
}

#[test]
fn custom_container() {
    let renderer = HtmlRenderer::new(HtmlConfig {
        min_height: 600.0,
        border: "2px dashed #000".to_string(),
        container_class: "issue-42".to_string(),
    });
    let html = renderer.render(&ElementStore::new());
    assert!(html.contains("class=\"issue-42\""));
    assert!(html.contains("min-height: 600px"));
    assert!(html.contains("border: 2px dashed #000"));
}

#[test]
fn editor_session_to_document() {
    let mut editor = CanvasEditor::default();
    let heading = editor.insert(ElementType::Text, 20.0, 20.0);
    editor.handle_event(&InputEvent::DoubleClick { x: 40.0, y: 30.0 });
    editor.handle_event(&InputEvent::TextInput {
        value: "May Digest".to_string(),
    });
    editor.handle_event(&InputEvent::Blur);
    assert!(editor.store().contains(heading));

    let document = "<p>Hello subscribers,</p>\n<!-- VISUAL_EDITOR_CONTENT_START -->\nstale\n<!-- VISUAL_EDITOR_CONTENT_END -->\n<p>See you soon</p>";
    let synced = sync_store(document, editor.store()).expect("canvas not empty");

    assert!(synced.starts_with("<p>Hello subscribers,</p>\n"));
    assert!(synced.ends_with("\n<p>See you soon</p>"));
    assert!(synced.contains("May Digest"));
    assert!(!synced.contains("stale"));
    assert_eq!(synced.matches(CONTENT_START).count(), 1);
}

#[test]
fn empty_canvas_leaves_document_alone() {
    let editor = CanvasEditor::default();
    let err = sync_store("<p>draft</p>", editor.store()).expect_err("empty canvas");
    assert!(matches!(err, RenderError::NothingToSync));
}

fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z <>/\n]{0,12}",
            Just(CONTENT_START.to_string()),
            Just(CONTENT_END.to_string()),
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

/// Fragments that may carry whole or partial region markers.
fn arb_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z <>/=\"\n]{0,10}",
            Just(CONTENT_START.to_string()),
            Just(CONTENT_END.to_string()),
            Just("<!-- VISUAL_EDITOR_CONTENT_".to_string()),
        ],
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_sync_is_idempotent(
        document in arb_document(),
        fragment in arb_fragment(),
    ) {
        let once = sync(&document, &fragment);
        let twice = sync(&once, &fragment);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.contains(&wrap(&fragment)));
    }

    #[test]
    fn prop_sync_preserves_text_before_region(
        prefix in "[a-z <>/\n]{0,30}",
        fragment in "[a-z]{0,20}",
    ) {
        let document = format!("{prefix}{}", wrap("old"));
        let synced = sync(&document, &fragment);
        prop_assert_eq!(synced, format!("{prefix}{}", wrap(&fragment)));
    }
}

#[test]
fn end_marker_constant_closes_wrap() {
    assert!(wrap("x").ends_with(CONTENT_END));
}
