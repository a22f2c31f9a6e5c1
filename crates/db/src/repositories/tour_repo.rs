//! Repository for the `tours` collection.

use chrono::Utc;
use tourcast_core::types::Timestamp;

use crate::models::status::DownloadStatus;
use crate::models::tour::{CreateOfflineTour, OfflineTour};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, graph_json, download_status, downloaded_at, last_accessed";

/// Provides CRUD, status transitions, and cascading deletion for offline
/// tours.
pub struct TourRepo;

impl TourRepo {
    /// Insert or replace a tour row. Re-downloading an existing tour
    /// resets its graph, status, and `downloaded_at`.
    pub async fn upsert(pool: &DbPool, input: &CreateOfflineTour) -> Result<OfflineTour, sqlx::Error> {
        let query = format!(
            "INSERT INTO tours (id, graph_json, download_status, downloaded_at, last_accessed)
             VALUES (?, ?, ?, NULL, ?)
             ON CONFLICT(id) DO UPDATE SET
                graph_json = excluded.graph_json,
                download_status = excluded.download_status,
                downloaded_at = NULL,
                last_accessed = excluded.last_accessed
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OfflineTour>(&query)
            .bind(&input.id)
            .bind(&input.graph_json)
            .bind(input.download_status)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a tour by id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<OfflineTour>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tours WHERE id = ?");
        sqlx::query_as::<_, OfflineTour>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tours, most recently accessed first.
    pub async fn list_all(pool: &DbPool) -> Result<Vec<OfflineTour>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tours ORDER BY last_accessed DESC");
        sqlx::query_as::<_, OfflineTour>(&query).fetch_all(pool).await
    }

    /// List tours whose `last_accessed` is at or before `cutoff`, oldest
    /// first. Feeds retention eviction.
    pub async fn list_last_accessed_before(
        pool: &DbPool,
        cutoff: Timestamp,
    ) -> Result<Vec<OfflineTour>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tours WHERE last_accessed <= ? ORDER BY last_accessed ASC");
        sqlx::query_as::<_, OfflineTour>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Bump `last_accessed` to now. Called on every read path.
    pub async fn touch(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tours SET last_accessed = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the download status of a tour.
    pub async fn update_status(
        pool: &DbPool,
        id: &str,
        status: DownloadStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tours SET download_status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a tour as fully downloaded.
    pub async fn mark_completed(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE tours SET download_status = ?, downloaded_at = ?, last_accessed = ? WHERE id = ?",
        )
        .bind(DownloadStatus::Completed)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a tour as failed. The row stays behind so callers can
    /// delete-then-retry.
    pub async fn mark_failed(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tours SET download_status = ? WHERE id = ?")
            .bind(DownloadStatus::Failed)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a tour and everything it owns in one transaction: audio
    /// assets, image assets, and progress records already synced. Pending
    /// progress records are kept so a later sync pass can still flush
    /// them. Returns whether the tour row existed.
    pub async fn delete_cascade(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM audio_assets WHERE tour_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM image_assets WHERE tour_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM progress_records WHERE tour_id = ? AND sync_status = ?")
            .bind(id)
            .bind(crate::models::status::SyncStatus::Synced)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        if result.rows_affected() > 0 {
            tracing::debug!(tour_id = id, "Cascade-deleted tour and owned assets");
        }
        Ok(result.rows_affected() > 0)
    }
}
