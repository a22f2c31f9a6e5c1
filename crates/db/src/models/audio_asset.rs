//! Audio asset entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tourcast_core::types::Timestamp;

/// A row from the `audio_assets` collection: one downloaded narration
/// track, owned exclusively by its tour.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AudioAsset {
    /// Matches the remote track id.
    pub id: String,
    pub tour_id: String,
    pub stop_id: String,
    pub language: String,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub duration_secs: i64,
    pub downloaded_at: Timestamp,
}

/// DTO for writing an audio asset after its payload is fetched.
#[derive(Debug, Clone)]
pub struct CreateAudioAsset {
    pub id: String,
    pub tour_id: String,
    pub stop_id: String,
    pub language: String,
    pub data: Vec<u8>,
    pub duration_secs: i64,
}
