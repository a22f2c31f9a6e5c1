//! Offline tour entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tourcast_core::tour::TourGraph;
use tourcast_core::types::Timestamp;

use crate::models::status::DownloadStatus;

/// A row from the `tours` collection: one locally materialized tour.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfflineTour {
    pub id: String,
    /// Full denormalized tour graph, serialized as JSON.
    pub graph_json: String,
    pub download_status: DownloadStatus,
    pub downloaded_at: Option<Timestamp>,
    pub last_accessed: Timestamp,
}

impl OfflineTour {
    /// Deserialize the stored tour graph.
    pub fn graph(&self) -> Result<TourGraph, serde_json::Error> {
        serde_json::from_str(&self.graph_json)
    }
}

/// DTO for writing a tour row at download start.
#[derive(Debug, Clone)]
pub struct CreateOfflineTour {
    pub id: String,
    pub graph_json: String,
    pub download_status: DownloadStatus,
}

impl CreateOfflineTour {
    /// Build the row DTO from a fetched graph, serializing it once.
    pub fn from_graph(
        graph: &TourGraph,
        download_status: DownloadStatus,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: graph.id.clone(),
            graph_json: serde_json::to_string(graph)?,
            download_status,
        })
    }
}
