//! HTTP upload client.
//!
//! Posts image files as `multipart/form-data` to the newsletter backend's
//! upload endpoint and decodes its JSON answer. Retries are left to the
//! operator.

use std::sync::Arc;

use async_trait::async_trait;
use letterpress_core::{UploadError, UploadFile, UploadResponse, UploadResult, UploadService};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

/// Name of the multipart field carrying the image.
const FILE_FIELD: &str = "image";

/// Upload client for the newsletter backend.
#[derive(Clone)]
pub struct HttpUploadClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
}

impl HttpUploadClient {
    /// Create a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidUrl`] if the URL is malformed, or
    /// [`UploadError::Transport`] if the HTTP client fails to build.
    pub fn new(endpoint: &str) -> UploadResult<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| UploadError::InvalidUrl(format!("{endpoint}: {e}")))?;

        let http = Client::builder()
            .user_agent(concat!("letterpress/", env!("CARGO_PKG_VERSION")))
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, endpoint }),
        })
    }

    /// The upload endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

impl std::fmt::Debug for HttpUploadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUploadClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UploadService for HttpUploadClient {
    async fn upload(&self, file: UploadFile) -> UploadResult<UploadResponse> {
        let mime = file.mime_type().unwrap_or("application/octet-stream");
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.filename.clone())
            .mime_str(mime)
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(
            endpoint = %self.inner.endpoint,
            filename = %file.filename,
            size,
            mime,
            "Posting upload"
        );
        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(mut parsed) => {
                if !status.is_success() {
                    parsed.success = false;
                    if parsed.message.is_none() {
                        parsed.message = Some(format!("HTTP {status}"));
                    }
                }
                Ok(parsed)
            }
            Err(e) if status.is_success() => Err(UploadError::Transport(format!(
                "unreadable upload response: {e}"
            ))),
            Err(_) => Err(UploadError::Rejected(format!("HTTP {status}"))),
        }
    }
}
