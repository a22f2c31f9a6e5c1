//! Repository for the `image_assets` collection.

use chrono::Utc;

use crate::models::image_asset::{CreateImageAsset, ImageAsset};
use crate::DbPool;

const COLUMNS: &str = "id, tour_id, source_url, data, downloaded_at";

/// CRUD and by-tour lookup for downloaded images.
pub struct ImageAssetRepo;

impl ImageAssetRepo {
    /// Insert or replace an image asset under its composite id.
    pub async fn upsert(pool: &DbPool, input: &CreateImageAsset) -> Result<ImageAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO image_assets (id, tour_id, source_url, data, downloaded_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                tour_id = excluded.tour_id,
                source_url = excluded.source_url,
                data = excluded.data,
                downloaded_at = excluded.downloaded_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageAsset>(&query)
            .bind(&input.id)
            .bind(&input.tour_id)
            .bind(&input.source_url)
            .bind(&input.data)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find an image asset by composite id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<ImageAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM image_assets WHERE id = ?");
        sqlx::query_as::<_, ImageAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every image asset owned by a tour.
    pub async fn list_by_tour(pool: &DbPool, tour_id: &str) -> Result<Vec<ImageAsset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM image_assets WHERE tour_id = ? ORDER BY id");
        sqlx::query_as::<_, ImageAsset>(&query)
            .bind(tour_id)
            .fetch_all(pool)
            .await
    }

    /// Count the image assets owned by a tour.
    pub async fn count_by_tour(pool: &DbPool, tour_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM image_assets WHERE tour_id = ?")
            .bind(tour_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Sum of payload bytes stored for a tour.
    pub async fn total_bytes_by_tour(pool: &DbPool, tour_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(LENGTH(data)), 0) FROM image_assets WHERE tour_id = ?",
        )
        .bind(tour_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
