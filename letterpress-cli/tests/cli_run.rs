//! End-to-end tests for the letterpress command runner.
//!
//! Tests script replay, document sync on disk, and image uploads against a
//! mock upload endpoint.

use std::fs;
use std::path::Path;

use letterpress_cli::{run, CliConfig, Command, RunOutput};
use letterpress_core::DEFAULT_MAX_UPLOAD_BYTES;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn write_script(dir: &Path, steps: &serde_json::Value) -> std::path::PathBuf {
    let script = dir.join("issue.json");
    fs::write(&script, serde_json::to_string_pretty(steps).expect("json")).expect("write script");
    script
}

fn config(command: Command, upload_url: Option<String>) -> CliConfig {
    CliConfig {
        command,
        upload_url,
        asset_base_url: None,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
}

#[tokio::test]
async fn render_prints_fragment() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(
        dir.path(),
        &json!([
            {"op": "insert", "element_type": "text", "x": 10, "y": 10},
            {"op": "select", "target": {"index": 0}},
            {"op": "edit_text", "text": "Hello readers"}
        ]),
    );

    let output = run(config(Command::Render { script }, None))
        .await
        .expect("render");

    match output {
        RunOutput::Rendered(html) => {
            assert!(html.contains("Hello readers"));
            assert!(html.starts_with("<div class=\"visual-editor-canvas\""));
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[tokio::test]
async fn sync_rewrites_document_in_place() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(
        dir.path(),
        &json!([{"op": "insert", "element_type": "shape", "x": 0, "y": 0}]),
    );
    let document = dir.path().join("issue.html");
    fs::write(
        &document,
        "<p>Intro</p>\n<!-- VISUAL_EDITOR_CONTENT_START -->\nold\n<!-- VISUAL_EDITOR_CONTENT_END -->\n<p>Outro</p>",
    )
    .expect("write document");

    let output = run(config(
        Command::Sync {
            script,
            document: document.clone(),
            output: None,
        },
        None,
    ))
    .await
    .expect("sync");

    assert!(matches!(output, RunOutput::Synced { ref path, .. } if path == &document));
    let written = fs::read_to_string(&document).expect("read back");
    assert!(written.starts_with("<p>Intro</p>\n<!-- VISUAL_EDITOR_CONTENT_START -->\n<div"));
    assert!(written.ends_with("<!-- VISUAL_EDITOR_CONTENT_END -->\n<p>Outro</p>"));
    assert!(!written.contains("\nold\n"));
}

#[tokio::test]
async fn sync_to_separate_output_creates_document() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(
        dir.path(),
        &json!([{"op": "insert", "element_type": "link", "x": 0, "y": 0}]),
    );
    let document = dir.path().join("missing.html");
    let out = dir.path().join("out.html");

    run(config(
        Command::Sync {
            script,
            document: document.clone(),
            output: Some(out.clone()),
        },
        None,
    ))
    .await
    .expect("sync");

    assert!(!document.exists());
    let written = fs::read_to_string(&out).expect("output written");
    assert!(written.starts_with("<!-- VISUAL_EDITOR_CONTENT_START -->"));
    assert!(written.contains("Click here"));
}

#[tokio::test]
async fn empty_canvas_leaves_document_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let script = write_script(dir.path(), &json!([]));
    let document = dir.path().join("issue.html");
    fs::write(&document, "<p>draft</p>").expect("write document");

    let output = run(config(
        Command::Sync {
            script,
            document: document.clone(),
            output: None,
        },
        None,
    ))
    .await
    .expect("run");

    assert_eq!(output, RunOutput::NothingToSync);
    assert_eq!(fs::read_to_string(&document).expect("read"), "<p>draft</p>");
}

#[tokio::test]
async fn invalid_script_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("broken.json");
    fs::write(&script, "{ not json").expect("write");

    let err = run(config(Command::Render { script }, None))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("invalid script"));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn upload_step_inserts_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "filename": "hero-7.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("hero.png"), PNG).expect("write image");
    let script = write_script(
        dir.path(),
        &json!([{"upload_image": {"path": "hero.png", "x": 30, "y": 40}}]),
    );

    let output = run(config(
        Command::Render { script },
        Some(format!("{}/api/upload", server.uri())),
    ))
    .await
    .expect("render");

    let RunOutput::Rendered(html) = output else {
        panic!("expected rendered output");
    };
    let expected_src = format!("{}/uploads/hero-7.png", server.uri());
    assert!(html.contains(&format!("<img src=\"{expected_src}\"")));
    assert!(html.contains("left: 30px; top: 40px;"));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn oversized_upload_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("huge.png"), PNG.repeat(8)).expect("write image");
    let script = write_script(
        dir.path(),
        &json!([{"upload_image": {"path": "huge.png"}}]),
    );

    let mut cfg = config(
        Command::Render { script },
        Some(format!("{}/api/upload", server.uri())),
    );
    cfg.max_upload_bytes = 64;

    let output = run(cfg).await.expect("failed uploads do not abort");
    let RunOutput::Rendered(html) = output else {
        panic!("expected rendered output");
    };
    assert!(!html.contains("<img"));
}
