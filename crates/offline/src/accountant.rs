//! Capacity reporting and retention-based eviction.
//!
//! Evicting a tour cascades through the local store in one transaction
//! and then mirrors the deletion to the remote download record,
//! best-effort. The periodic [`retention_loop`] drives
//! [`StorageAccountant::cleanup_old_data`] on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tourcast_db::models::status::DownloadStatus;
use tourcast_db::repositories::TourRepo;
use tourcast_db::DbPool;
use tourcast_remote::{DownloadStatusUpdate, StatusSink};

use crate::quota::{stats_from, StorageQuota, StorageStats};

/// Tracks capacity and prunes stale downloads.
pub struct StorageAccountant {
    pool: DbPool,
    quota: Arc<dyn StorageQuota>,
    status: Arc<dyn StatusSink>,
    user_id: String,
}

impl StorageAccountant {
    pub fn new(
        pool: DbPool,
        quota: Arc<dyn StorageQuota>,
        status: Arc<dyn StatusSink>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            quota,
            status,
            user_id: user_id.into(),
        }
    }

    /// Report used/available capacity. Hosts without a quota signal
    /// yield all-zero stats rather than an error.
    pub fn storage_stats(&self) -> StorageStats {
        stats_from(self.quota.estimate())
    }

    /// Remove one tour and everything it owns, then mirror the deletion
    /// remotely (best-effort). Returns whether the tour existed. Also
    /// the path behind an explicit user "remove download" action.
    pub async fn evict_tour(&self, tour_id: &str) -> Result<bool, sqlx::Error> {
        let existed = TourRepo::delete_cascade(&self.pool, tour_id).await?;
        if existed {
            tracing::info!(tour_id, "Evicted offline tour");
            let update = DownloadStatusUpdate {
                user_id: self.user_id.clone(),
                tour_id: tour_id.to_string(),
                status: DownloadStatus::Deleted.to_string(),
                progress: 0,
            };
            if let Err(e) = self.status.upsert_download_status(&update).await {
                tracing::warn!(tour_id, error = %e, "Deletion status write failed (best-effort)");
            }
        }
        Ok(existed)
    }

    /// Evict every tour not accessed within the last `max_age_days`.
    /// Zero evicts everything regardless of recency ("clear all").
    /// Returns the number of tours removed.
    pub async fn cleanup_old_data(&self, max_age_days: u32) -> Result<u64, sqlx::Error> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(max_age_days));
        let stale = TourRepo::list_last_accessed_before(&self.pool, cutoff).await?;

        let mut evicted = 0u64;
        for tour in stale {
            if self.evict_tour(&tour.id).await? {
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::info!(evicted, max_age_days, "Retention cleanup: evicted stale tours");
        } else {
            tracing::debug!(max_age_days, "Retention cleanup: nothing to evict");
        }
        Ok(evicted)
    }
}

/// Run retention cleanup on a fixed interval until `cancel` fires.
pub async fn retention_loop(
    accountant: Arc<StorageAccountant>,
    max_age_days: u32,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        max_age_days,
        interval_secs = interval.as_secs(),
        "Retention cleanup job started",
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Retention cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = accountant.cleanup_old_data(max_age_days).await {
                    tracing::error!(error = %e, "Retention cleanup failed");
                }
            }
        }
    }
}
