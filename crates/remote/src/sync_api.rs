//! Write-side remote APIs: progress upsert and download-status mirror.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RemoteError;

// ---------------------------------------------------------------------------
// Progress upsert
// ---------------------------------------------------------------------------

/// A queued progress record in wire form. The remote upsert is keyed by
/// `id`, so retries are idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpload {
    pub id: String,
    pub tour_id: String,
    pub payload: serde_json::Value,
}

/// Remote sink for user-progress records.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Upsert one record. Safe to call repeatedly with the same id.
    async fn upsert_progress(&self, record: &ProgressUpload) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// Download-status mirror
// ---------------------------------------------------------------------------

/// Outward-facing download status report, persisted remotely for
/// cross-device visibility. Best-effort: callers log failures and move
/// on.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadStatusUpdate {
    pub user_id: String,
    pub tour_id: String,
    pub status: String,
    /// 0–100.
    pub progress: u8,
}

/// Remote sink for download-status mirror records.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn upsert_download_status(&self, update: &DownloadStatusUpdate)
        -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// HTTP implementations
// ---------------------------------------------------------------------------

/// HTTP implementation of [`ProgressSink`].
pub struct HttpProgressSink {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProgressSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ProgressSink for HttpProgressSink {
    async fn upsert_progress(&self, record: &ProgressUpload) -> Result<(), RemoteError> {
        let url = format!("{}/progress/{}", self.base_url, record.id);
        let response = self.http.put(&url).json(record).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}

/// HTTP implementation of [`StatusSink`].
pub struct HttpStatusSink {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStatusSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl StatusSink for HttpStatusSink {
    async fn upsert_download_status(
        &self,
        update: &DownloadStatusUpdate,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/downloads/{}/{}",
            self.base_url, update.user_id, update.tour_id
        );
        let response = self.http.put(&url).json(update).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}
