//! Editor scripts.
//!
//! A script is a JSON array mixing editor commands (`{"op": ...}`) with image
//! uploads (`{"upload_image": {...}}`). Commands are applied in order; a failed
//! command aborts the script, a failed upload is reported and skipped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use letterpress_core::{CanvasEditor, EditorCommand, UploadFile, UploadService};
use serde::Deserialize;

/// An image to upload and place on the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadImage {
    /// Image file, relative to the script's directory.
    pub path: PathBuf,
    /// Left offset of the inserted element.
    #[serde(default)]
    pub x: f32,
    /// Top offset of the inserted element.
    #[serde(default)]
    pub y: f32,
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Upload an image and insert it.
    Upload {
        /// What to upload.
        upload_image: UploadImage,
    },
    /// Apply an editor command.
    Command(EditorCommand),
}

/// Summary of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Commands applied.
    pub commands: usize,
    /// Images uploaded and inserted.
    pub uploads: usize,
    /// Uploads that produced no element, with the reason.
    pub failed_uploads: Vec<String>,
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid script.
pub async fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))
}

/// Apply `steps` to `editor`.
///
/// Upload paths are resolved against `base_dir`. Without an `uploader`,
/// upload steps are reported as failed.
///
/// # Errors
///
/// Returns an error naming the step if an editor command fails.
pub async fn run_script(
    editor: &mut CanvasEditor,
    steps: &[ScriptStep],
    uploader: Option<&dyn UploadService>,
    base_dir: &Path,
) -> anyhow::Result<ScriptReport> {
    let mut report = ScriptReport::default();

    for (index, step) in steps.iter().enumerate() {
        match step {
            ScriptStep::Command(command) => {
                editor
                    .apply(command)
                    .with_context(|| format!("script step {index} failed"))?;
                report.commands += 1;
            }
            ScriptStep::Upload { upload_image } => {
                match upload_one(editor, upload_image, uploader, base_dir).await {
                    Ok(()) => report.uploads += 1,
                    Err(e) => {
                        tracing::warn!(
                            step = index,
                            path = %upload_image.path.display(),
                            error = %format!("{e:#}"),
                            "Image upload failed; no element inserted"
                        );
                        report
                            .failed_uploads
                            .push(format!("{}: {e:#}", upload_image.path.display()));
                    }
                }
            }
        }
    }

    tracing::info!(
        commands = report.commands,
        uploads = report.uploads,
        failed_uploads = report.failed_uploads.len(),
        elements = editor.store().len(),
        "Script applied"
    );
    Ok(report)
}

async fn upload_one(
    editor: &mut CanvasEditor,
    image: &UploadImage,
    uploader: Option<&dyn UploadService>,
    base_dir: &Path,
) -> anyhow::Result<()> {
    let uploader = uploader.context("uploads are disabled: no upload URL configured")?;
    let path = base_dir.join(&image.path);
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

    let pending = editor.begin_upload(UploadFile::new(filename, bytes), image.x, image.y)?;
    let completed = pending.send(uploader).await?;
    editor.finish_upload(completed)?;
    Ok(())
}
