//! Tour catalog client.
//!
//! The catalog serves the full denormalized tour graph: tour fields,
//! ordered stops, each stop's per-language audio tracks and image URLs.

use std::time::Duration;

use async_trait::async_trait;
use tourcast_core::tour::TourGraph;

use crate::error::RemoteError;

/// Read access to the remote tour catalog.
#[async_trait]
pub trait TourCatalog: Send + Sync {
    /// Fetch the full graph for one tour.
    async fn fetch_tour(&self, tour_id: &str) -> Result<TourGraph, RemoteError>;
}

/// HTTP implementation of [`TourCatalog`] against the platform API.
pub struct HttpTourCatalog {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTourCatalog {
    /// Create a client targeting `base_url` (e.g. `https://api.example.com`),
    /// with `timeout` applied per request.
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
impl TourCatalog for HttpTourCatalog {
    async fn fetch_tour(&self, tour_id: &str) -> Result<TourGraph, RemoteError> {
        let url = format!("{}/tours/{tour_id}", self.base_url);
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(tour_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let graph: TourGraph = response.json().await?;
        tracing::debug!(
            tour_id = %graph.id,
            stops = graph.stops.len(),
            "Fetched tour graph from catalog",
        );
        Ok(graph)
    }
}
