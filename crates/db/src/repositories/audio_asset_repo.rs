//! Repository for the `audio_assets` collection.

use chrono::Utc;

use crate::models::audio_asset::{AudioAsset, CreateAudioAsset};
use crate::DbPool;

const COLUMNS: &str = "id, tour_id, stop_id, language, data, duration_secs, downloaded_at";

/// CRUD and by-tour lookup for downloaded audio tracks.
pub struct AudioAssetRepo;

impl AudioAssetRepo {
    /// Insert or replace an audio asset. A retried download overwrites
    /// the previous payload under the same track id.
    pub async fn upsert(pool: &DbPool, input: &CreateAudioAsset) -> Result<AudioAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO audio_assets (id, tour_id, stop_id, language, data, duration_secs, downloaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                tour_id = excluded.tour_id,
                stop_id = excluded.stop_id,
                language = excluded.language,
                data = excluded.data,
                duration_secs = excluded.duration_secs,
                downloaded_at = excluded.downloaded_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AudioAsset>(&query)
            .bind(&input.id)
            .bind(&input.tour_id)
            .bind(&input.stop_id)
            .bind(&input.language)
            .bind(&input.data)
            .bind(input.duration_secs)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find an audio asset by track id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<AudioAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audio_assets WHERE id = ?");
        sqlx::query_as::<_, AudioAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every audio asset owned by a tour.
    pub async fn list_by_tour(pool: &DbPool, tour_id: &str) -> Result<Vec<AudioAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audio_assets WHERE tour_id = ? ORDER BY id");
        sqlx::query_as::<_, AudioAsset>(&query)
            .bind(tour_id)
            .fetch_all(pool)
            .await
    }

    /// Count the audio assets owned by a tour.
    pub async fn count_by_tour(pool: &DbPool, tour_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audio_assets WHERE tour_id = ?")
            .bind(tour_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Sum of payload bytes stored for a tour.
    pub async fn total_bytes_by_tour(pool: &DbPool, tour_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(LENGTH(data)), 0) FROM audio_assets WHERE tour_id = ?",
        )
        .bind(tour_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
