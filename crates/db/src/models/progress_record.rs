//! Queued user-progress entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tourcast_core::types::Timestamp;

use crate::models::status::SyncStatus;

/// A row from the `progress_records` collection: one user-progress write
/// queued locally until the remote upsert succeeds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressRecord {
    pub id: String,
    pub tour_id: String,
    pub sync_status: SyncStatus,
    /// Free-form progress payload (stop completion, playback position, ...)
    /// serialized as JSON.
    pub payload: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProgressRecord {
    /// Deserialize the stored payload.
    pub fn payload_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

/// DTO for queuing a new progress record.
#[derive(Debug, Clone)]
pub struct CreateProgressRecord {
    pub tour_id: String,
    pub payload: serde_json::Value,
}
