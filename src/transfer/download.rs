//! Attachment download with streaming and progress tracking

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use log::{info, warn};

use super::progress::ProgressTracker;
use super::types::CancelToken;
use crate::api::ApiClient;
use crate::error::{Error, Result};

/// A downloaded attachment payload, named via the response's
/// `Content-Disposition` header (fallback `file_<id>`).
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Save the payload into `dir` under its resolved name.
    pub async fn persist_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Download one feedback's attachment.
///
/// A second call for an id whose download is still active is rejected
/// with [`Error::InFlight`] before any request is sent. Whatever the
/// outcome — success, server error, network error, cancellation — the
/// progress entry for the id is gone when this returns.
pub async fn download_attachment(
    api: &ApiClient,
    tracker: &ProgressTracker,
    id: i64,
    cancel: &CancelToken,
) -> Result<DownloadedFile> {
    let key = id.to_string();
    if !tracker.begin(&key) {
        return Err(Error::InFlight(format!("download for feedback {}", id)));
    }

    let result = stream_attachment(api, tracker, &key, id, cancel).await;
    tracker.finish(&key);

    match result.as_ref() {
        Ok(file) => info!(
            "download {}: {} bytes as {}",
            id,
            file.bytes.len(),
            file.file_name
        ),
        Err(e) => warn!("download {} failed: {}", id, e),
    }
    result
}

async fn stream_attachment(
    api: &ApiClient,
    tracker: &ProgressTracker,
    key: &str,
    id: i64,
    cancel: &CancelToken,
) -> Result<DownloadedFile> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let response = api.get_attachment(id).await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(Error::Transfer(format!(
            "download failed: {} - {}",
            status, text
        )));
    }

    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // 0 means the total length is unknown; progress then stays at its
    // initial 0 (indeterminate) instead of reporting made-up percents.
    let total_bytes = response.content_length().unwrap_or(0);

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let chunk = chunk.map_err(|e| Error::Transfer(format!("failed to read chunk: {}", e)))?;
        bytes.extend_from_slice(&chunk);
        if total_bytes > 0 {
            tracker.update(key, percent(bytes.len() as u64, total_bytes));
        }
    }

    if bytes.is_empty() {
        return Err(Error::Transfer("empty response body".to_string()));
    }

    let file_name = disposition_filename::extract_filename(
        disposition.as_deref(),
        &format!("file_{}", id),
    );

    Ok(DownloadedFile { file_name, bytes })
}

/// Floor of `received / total * 100`, capped at 100. `total` must be > 0.
fn percent(received: u64, total: u64) -> u32 {
    (received.min(total).saturating_mul(100) / total) as u32
}
