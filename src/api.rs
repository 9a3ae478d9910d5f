// API client module: a small blocking HTTP client for the upload backend.
// Two calls make an upload: ask the API for a signed destination, then PUT
// the raw file body to that destination while reporting progress.
//
// Everything here is synchronous. The controller runs it on a worker
// thread so the UI event loop never blocks on the network.

use crate::config::Config;
use crate::file::FileHandle;
use anyhow::{Context, Result};
use reqwest::blocking::{Body, Client};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Callback receiving the completed fraction (0.0..=1.0) of a transfer.
pub type ProgressFn = Box<dyn FnMut(f64) + Send>;

/// Body of `POST /uploads`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadRequest {
    pub name: String,
    pub content_type: String,
}

impl From<&FileHandle> for CreateUploadRequest {
    fn from(file: &FileHandle) -> Self {
        CreateUploadRequest {
            name: file.name.clone(),
            content_type: file.content_type.clone(),
        }
    }
}

/// Response of `POST /uploads`: where to send the bytes and where the
/// file can be fetched afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrls {
    pub signed_url: String,
    pub download_url: String,
}

/// The two network steps of an upload. `ApiClient` is the real
/// implementation; tests substitute their own.
pub trait UploadTransport: Send + Sync {
    fn create_upload_url(&self, req: &CreateUploadRequest) -> Result<UploadUrls>;

    /// Stream `file` to `signed_url`. Must fail once `cancel` fires.
    fn put_file(
        &self,
        signed_url: &str,
        file: &FileHandle,
        cancel: &CancellationToken,
        on_progress: ProgressFn,
    ) -> Result<()>;
}

/// Blocking client for the upload API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the API URL and connect timeout in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_url,
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        // No overall timeout: a large body can legitimately take minutes.
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl UploadTransport for ApiClient {
    /// POST /uploads and parse the signed/download URL pair.
    fn create_upload_url(&self, req: &CreateUploadRequest) -> Result<UploadUrls> {
        let url = format!("{}/uploads", &self.base_url);
        debug!(name = %req.name, content_type = %req.content_type, "requesting upload url");
        let res = self
            .client
            .post(&url)
            .json(req)
            .send()
            .context("Failed to send upload url request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("Upload url request failed: {} - {}", status, txt);
        }
        let urls: UploadUrls = res.json().context("Parsing upload url response json")?;
        Ok(urls)
    }

    /// PUT the raw file body to the signed URL.
    fn put_file(
        &self,
        signed_url: &str,
        file: &FileHandle,
        cancel: &CancellationToken,
        on_progress: ProgressFn,
    ) -> Result<()> {
        let source = File::open(&file.path)
            .with_context(|| format!("Failed to open {}", file.path.display()))?;
        let reader = ProgressReader::new(source, file.size, cancel.clone(), on_progress);

        debug!(name = %file.name, size = file.size, "uploading file body");
        let res = self
            .client
            .put(signed_url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(Body::sized(reader, file.size))
            .send()
            .context("Failed to send file body")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("Upload failed: {} - {}", status, txt);
        }
        Ok(())
    }
}

/// Reader wrapper that reports progress on every read and aborts the
/// body stream once the cancellation token fires.
struct ProgressReader<R> {
    inner: R,
    sent: u64,
    total: u64,
    cancel: CancellationToken,
    on_progress: ProgressFn,
}

impl<R: Read> ProgressReader<R> {
    fn new(inner: R, total: u64, cancel: CancellationToken, on_progress: ProgressFn) -> Self {
        ProgressReader {
            inner,
            sent: 0,
            total,
            cancel,
            on_progress,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.is_cancelled() {
            return Err(io::Error::new(io::ErrorKind::Other, "upload cancelled"));
        }
        let n = self.inner.read(buf)?;
        self.sent += n as u64;
        if n > 0 && self.total > 0 {
            (self.on_progress)(self.sent as f64 / self.total as f64);
        }
        Ok(n)
    }
}
