//! Image upload seam.
//!
//! The editor never talks HTTP itself. It validates the payload, hands it to an
//! [`UploadService`] inside a cancellation scope tied to the editor session,
//! and inserts an image element only if the response comes back to the same,
//! still-alive session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::editor::SessionId;

/// Default client-side upload limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Directory, relative to the asset base, that bare upload filenames live in.
pub const UPLOADS_PATH: &str = "uploads/";

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Errors reported to the operator when an image upload does not produce an
/// element.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File exceeds the client-side limit; no request was sent.
    #[error("{filename} is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        /// Name of the rejected file.
        filename: String,
        /// Payload size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Payload is not a recognised image; no request was sent.
    #[error("{0} is not a supported image")]
    NotAnImage(String),

    /// The upload service answered but reported failure.
    #[error("upload rejected: {0}")]
    Rejected(String),

    /// The request did not complete.
    #[error("upload failed: {0}")]
    Transport(String),

    /// The service reported success without any usable location.
    #[error("upload response did not contain a URL")]
    MissingUrl,

    /// A location was returned but could not be turned into an absolute URL.
    #[error("invalid upload URL: {0}")]
    InvalidUrl(String),

    /// The editor session ended before the response arrived.
    #[error("upload cancelled: editor session closed")]
    Cancelled,

    /// The response belongs to a different editor session.
    #[error("upload result belongs to another editor session")]
    StaleSession,
}

/// A binary waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name.
    pub filename: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap a payload.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Check the payload before any request is made.
    ///
    /// Returns the MIME type detected from the file signature.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::TooLarge`] if the payload exceeds `limit`, or
    /// [`UploadError::NotAnImage`] if no image signature is recognised.
    pub fn validate(&self, limit: usize) -> UploadResult<&'static str> {
        if self.bytes.len() > limit {
            return Err(UploadError::TooLarge {
                filename: self.filename.clone(),
                size: self.bytes.len(),
                limit,
            });
        }
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type())
            .map_err(|_| UploadError::NotAnImage(self.filename.clone()))
    }

    /// MIME type sniffed from the file signature, if it is a known image.
    #[must_use]
    pub fn mime_type(&self) -> Option<&'static str> {
        image::guess_format(&self.bytes)
            .ok()
            .map(|format| format.to_mime_type())
    }
}

/// Response body of the upload collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the upload was stored.
    #[serde(default)]
    pub success: bool,
    /// Absolute URL of the stored file.
    #[serde(default)]
    pub full_url: Option<String>,
    /// Absolute or site-relative URL of the stored file.
    #[serde(default)]
    pub url: Option<String>,
    /// Stored file name.
    #[serde(default)]
    pub filename: Option<String>,
    /// Failure description.
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

impl UploadResponse {
    /// Resolve the response into one absolute URL.
    ///
    /// `full_url` wins; otherwise `url` is used as-is when absolute or joined
    /// onto `base` when relative; otherwise `filename` is placed under
    /// [`UPLOADS_PATH`] on `base`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::MissingUrl`] if none of the fields is present,
    /// or [`UploadError::InvalidUrl`] if the location cannot be made absolute.
    pub fn resolve_url(&self, base: Option<&Url>) -> UploadResult<Url> {
        if let Some(full) = non_empty(self.full_url.as_deref()) {
            return Url::parse(full).map_err(|e| UploadError::InvalidUrl(format!("{full}: {e}")));
        }
        if let Some(url) = non_empty(self.url.as_deref()) {
            return join(base, url);
        }
        if let Some(filename) = non_empty(self.filename.as_deref()) {
            return join(base, &format!("{UPLOADS_PATH}{filename}"));
        }
        Err(UploadError::MissingUrl)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn join(base: Option<&Url>, location: &str) -> UploadResult<Url> {
    match Url::parse(location) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                UploadError::InvalidUrl(format!("{location}: relative URL and no asset base"))
            })?;
            base.join(location)
                .map_err(|e| UploadError::InvalidUrl(format!("{location}: {e}")))
        }
        Err(e) => Err(UploadError::InvalidUrl(format!("{location}: {e}"))),
    }
}

/// External collaborator that stores a binary and reports where it lives.
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Send `file` and return the service's response.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Transport`] (or another variant) if the request
    /// fails.
    async fn upload(&self, file: UploadFile) -> UploadResult<UploadResponse>;
}

/// A validated upload bound to the editor session that started it.
#[derive(Debug)]
pub struct PendingUpload {
    pub(crate) session: SessionId,
    pub(crate) token: CancellationToken,
    pub(crate) file: UploadFile,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl PendingUpload {
    /// Session that started this upload.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Send the file through `service`.
    ///
    /// Resolves to [`UploadError::Cancelled`] as soon as the owning editor is
    /// torn down, whether or not the service has answered.
    ///
    /// # Errors
    ///
    /// Returns the service's error, [`UploadError::Rejected`] when the
    /// response reports failure, or [`UploadError::Cancelled`].
    pub async fn send<S>(self, service: &S) -> UploadResult<CompletedUpload>
    where
        S: UploadService + ?Sized,
    {
        let Self {
            session,
            token,
            file,
            x,
            y,
        } = self;
        let filename = file.filename.clone();

        let response = token
            .run_until_cancelled(service.upload(file))
            .await
            .ok_or(UploadError::Cancelled)??;

        if token.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        if !response.success {
            let reason = response
                .message
                .clone()
                .unwrap_or_else(|| "service reported failure".to_string());
            tracing::warn!(%filename, %reason, "Upload rejected");
            return Err(UploadError::Rejected(reason));
        }

        tracing::info!(%filename, %session, "Upload completed");
        Ok(CompletedUpload {
            session,
            response,
            x,
            y,
        })
    }
}

/// A successful upload response waiting to be turned into an element.
#[derive(Debug, Clone)]
pub struct CompletedUpload {
    pub(crate) session: SessionId,
    pub(crate) response: UploadResponse,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl CompletedUpload {
    /// Session that started the upload.
    #[must_use]
    pub const fn session(&self) -> SessionId {
        self.session
    }

    /// Raw service response.
    #[must_use]
    pub fn response(&self) -> &UploadResponse {
        &self.response
    }
}
