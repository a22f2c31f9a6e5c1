//! Repository for the `progress_records` collection.

use chrono::Utc;
use uuid::Uuid;

use crate::models::progress_record::{CreateProgressRecord, ProgressRecord};
use crate::models::status::SyncStatus;
use crate::DbPool;

const COLUMNS: &str = "id, tour_id, sync_status, payload, created_at, updated_at";

/// Queue management for user-progress writes pending sync.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Queue a new progress record as `pending`. The record id is a
    /// fresh UUID; the remote upsert is keyed by it, so replays are
    /// idempotent.
    pub async fn create(
        pool: &DbPool,
        input: &CreateProgressRecord,
    ) -> Result<ProgressRecord, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO progress_records (id, tour_id, sync_status, payload, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.tour_id)
            .bind(SyncStatus::Pending)
            .bind(input.payload.to_string())
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a progress record by id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<ProgressRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress_records WHERE id = ?");
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List records still waiting to be flushed, oldest first.
    pub async fn list_pending(pool: &DbPool) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_records WHERE sync_status = ? ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(SyncStatus::Pending)
            .fetch_all(pool)
            .await
    }

    /// List every record owned by a tour.
    pub async fn list_by_tour(
        pool: &DbPool,
        tour_id: &str,
    ) -> Result<Vec<ProgressRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM progress_records WHERE tour_id = ? ORDER BY created_at ASC");
        sqlx::query_as::<_, ProgressRecord>(&query)
            .bind(tour_id)
            .fetch_all(pool)
            .await
    }

    /// Flip a record to `synced` after a successful remote upsert.
    pub async fn mark_synced(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE progress_records SET sync_status = ?, updated_at = ? WHERE id = ?")
                .bind(SyncStatus::Synced)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count records still pending.
    pub async fn count_pending(pool: &DbPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM progress_records WHERE sync_status = ?")
                .bind(SyncStatus::Pending)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
