//! # Letterpress CLI
//!
//! Command-line host for the Letterpress canvas editor.
//!
//! It replays an editor script against a fresh canvas, uploading any images
//! the script references. It then prints the rendered HTML or merges it into
//! a newsletter document.
//!
//! ## Usage
//!
//! ```bash
//! letterpress render --script issue.json
//! ```
//!
//! ## Syncing into a document with uploads enabled:
//!
//! ```bash
//! letterpress --upload-url https://news.example.com/api/upload \
//!     sync --script issue.json --document issue.html
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Settings for uploads and the editor
//! - `HttpUploadClient` - Multipart upload client implementing `UploadService`
//! - `run` - Loads the script, drives a `CanvasEditor`, renders or syncs

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

mod script;
mod uploader;

pub use script::{load_script, run_script, ScriptReport, ScriptStep, UploadImage};
pub use uploader::HttpUploadClient;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use letterpress_core::{CanvasEditor, EditorConfig, UploadService, DEFAULT_MAX_UPLOAD_BYTES};
use letterpress_renderer::{render_fragment, sync_store, RenderError};
use thiserror::Error;
use url::Url;

/// Command-line arguments for letterpress.
#[derive(Debug, Clone, Parser)]
#[command(name = "letterpress")]
#[command(about = "Letterpress newsletter canvas editor")]
#[command(version)]
pub struct CliArgs {
    /// What to do with the canvas.
    #[command(subcommand)]
    pub command: Command,

    /// Image upload endpoint (e.g., <https://news.example.com/api/upload>)
    #[arg(long, env = "LETTERPRESS_UPLOAD_URL", global = true)]
    pub upload_url: Option<String>,

    /// Base URL for relative upload locations (defaults to the upload endpoint's origin)
    #[arg(long, env = "LETTERPRESS_ASSET_BASE_URL", global = true)]
    pub asset_base_url: Option<String>,

    /// Largest image accepted for upload, in bytes
    #[arg(long, env = "LETTERPRESS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES, global = true)]
    pub max_upload_bytes: usize,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply a script and print the canvas HTML.
    Render {
        /// Editor script (JSON array of steps)
        #[arg(long)]
        script: PathBuf,
    },
    /// Apply a script and merge the canvas HTML into a document.
    Sync {
        /// Editor script (JSON array of steps)
        #[arg(long)]
        script: PathBuf,
        /// Document to sync into; created if missing
        #[arg(long)]
        document: PathBuf,
        /// Where to write the result (defaults to the document itself)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configured URL could not be parsed.
    #[error("invalid {setting}: {reason}")]
    InvalidUrl {
        /// Which setting held the URL.
        setting: &'static str,
        /// Parser message.
        reason: String,
    },
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// What to do.
    pub command: Command,
    /// Image upload endpoint.
    pub upload_url: Option<String>,
    /// Base for relative upload locations.
    pub asset_base_url: Option<String>,
    /// Upload size limit in bytes.
    pub max_upload_bytes: usize,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            command: args.command,
            upload_url: args.upload_url,
            asset_base_url: args.asset_base_url,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

impl CliConfig {
    /// Editor settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidUrl`] if a configured URL is malformed.
    pub fn editor_config(&self) -> Result<EditorConfig, CliError> {
        let asset_base_url = match (&self.asset_base_url, &self.upload_url) {
            (Some(base), _) => Some(parse_url("asset base URL", base)?),
            (None, Some(upload)) => {
                let mut origin = parse_url("upload URL", upload)?;
                origin.set_path("/");
                origin.set_query(None);
                origin.set_fragment(None);
                Some(origin)
            }
            (None, None) => None,
        };
        Ok(EditorConfig {
            max_upload_bytes: self.max_upload_bytes,
            asset_base_url,
        })
    }
}

fn parse_url(setting: &'static str, raw: &str) -> Result<Url, CliError> {
    Url::parse(raw).map_err(|e| CliError::InvalidUrl {
        setting,
        reason: format!("{raw}: {e}"),
    })
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    /// The rendered canvas HTML.
    Rendered(String),
    /// The document was written.
    Synced {
        /// File written.
        path: PathBuf,
        /// Size of the written document.
        bytes: usize,
    },
    /// The canvas was empty; nothing was written.
    NothingToSync,
}

/// Execute the configured command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the script fails, or a file
/// cannot be read or written.
pub async fn run(config: CliConfig) -> anyhow::Result<RunOutput> {
    let editor_config = config.editor_config()?;
    let uploader = config
        .upload_url
        .as_deref()
        .map(HttpUploadClient::new)
        .transpose()
        .context("failed to create upload client")?;
    if let Some(client) = &uploader {
        tracing::info!(endpoint = %client.endpoint(), "Uploads enabled");
    }

    let mut editor = CanvasEditor::new(editor_config);
    let uploader = uploader.as_ref().map(|c| c as &dyn UploadService);

    let output = match &config.command {
        Command::Render { script } => {
            apply_script(&mut editor, script, uploader).await?;
            RunOutput::Rendered(render_fragment(editor.store()))
        }
        Command::Sync {
            script,
            document,
            output,
        } => {
            apply_script(&mut editor, script, uploader).await?;
            let target = output.as_deref().unwrap_or(document.as_path());
            sync_document(&editor, document, target).await?
        }
    };

    editor.teardown();
    Ok(output)
}

async fn apply_script(
    editor: &mut CanvasEditor,
    script: &Path,
    uploader: Option<&dyn UploadService>,
) -> anyhow::Result<ScriptReport> {
    let steps = load_script(script).await?;
    let base_dir = script.parent().unwrap_or_else(|| Path::new("."));
    run_script(editor, &steps, uploader, base_dir).await
}

async fn sync_document(
    editor: &CanvasEditor,
    document: &Path,
    output: &Path,
) -> anyhow::Result<RunOutput> {
    let current = match tokio::fs::read_to_string(document).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %document.display(), "Document missing; starting empty");
            String::new()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", document.display()));
        }
    };

    let synced = match sync_store(&current, editor.store()) {
        Ok(synced) => synced,
        Err(RenderError::NothingToSync) => {
            tracing::warn!(path = %document.display(), "Nothing to sync: canvas is empty");
            return Ok(RunOutput::NothingToSync);
        }
    };

    tokio::fs::write(output, &synced)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), bytes = synced.len(), "Document written");
    Ok(RunOutput::Synced {
        path: output.to_path_buf(),
        bytes: synced.len(),
    })
}
