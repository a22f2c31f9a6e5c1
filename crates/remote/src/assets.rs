//! Binary asset fetcher.
//!
//! Assets (audio tracks, images) are plain HTTP GETs against whatever
//! URL the tour graph references; no wire format beyond the payload
//! bytes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RemoteError;

/// Fetches a binary asset payload from its source URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

/// HTTP implementation of [`AssetFetcher`].
pub struct HttpAssetFetcher {
    http: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher with `timeout` applied per request.
    pub fn new(timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
