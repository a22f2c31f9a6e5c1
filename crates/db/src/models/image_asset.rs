//! Image asset entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tourcast_core::types::Timestamp;

/// A row from the `image_assets` collection. The id is a caller-assigned
/// composite (`tour_<id>_preview`, `stop_<id>_gallery_<n>`, ...); the
/// source URL is kept for provenance.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageAsset {
    pub id: String,
    pub tour_id: String,
    pub source_url: String,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub downloaded_at: Timestamp,
}

/// DTO for writing an image asset after its payload is fetched.
#[derive(Debug, Clone)]
pub struct CreateImageAsset {
    pub id: String,
    pub tour_id: String,
    pub source_url: String,
    pub data: Vec<u8>,
}
