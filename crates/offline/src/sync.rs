//! Progress reconciliation with the remote backend.
//!
//! Writes always land locally first as `pending` records; a sync pass
//! drains them once connectivity is available. Each record is
//! independent: a failed upsert is logged and the record stays queued
//! for a later pass, never aborting its siblings.

use std::sync::Arc;

use tourcast_db::models::progress_record::{CreateProgressRecord, ProgressRecord};
use tourcast_db::repositories::ProgressRepo;
use tourcast_db::DbPool;
use tourcast_remote::{ProgressSink, ProgressUpload};

use crate::connectivity::ConnectivityHandle;

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

/// Queues progress locally and flushes it remotely.
pub struct ProgressSync {
    pool: DbPool,
    sink: Arc<dyn ProgressSink>,
    connectivity: ConnectivityHandle,
}

impl ProgressSync {
    pub fn new(pool: DbPool, sink: Arc<dyn ProgressSink>, connectivity: ConnectivityHandle) -> Self {
        Self {
            pool,
            sink,
            connectivity,
        }
    }

    /// Record a user-progress write locally as `pending`. No remote call
    /// happens here, online or not; the next sync pass flushes it.
    pub async fn queue_progress(
        &self,
        tour_id: &str,
        payload: serde_json::Value,
    ) -> Result<ProgressRecord, sqlx::Error> {
        let record = ProgressRepo::create(
            &self.pool,
            &CreateProgressRecord {
                tour_id: tour_id.to_string(),
                payload,
            },
        )
        .await?;
        tracing::debug!(tour_id, record_id = %record.id, "Progress queued for sync");
        Ok(record)
    }

    /// Flush all pending records to the remote backend.
    ///
    /// Immediately returns an empty report while offline. Per-record
    /// remote failures are contained; only local store errors propagate.
    pub async fn sync_offline_data(&self) -> Result<SyncReport, sqlx::Error> {
        if !self.connectivity.is_online() {
            tracing::debug!("Skipping sync: offline");
            return Ok(SyncReport::default());
        }

        let pending = ProgressRepo::list_pending(&self.pool).await?;
        let mut report = SyncReport {
            attempted: pending.len(),
            ..SyncReport::default()
        };

        for record in pending {
            let payload = match record.payload_json() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(record_id = %record.id, error = %e, "Unreadable progress payload; record stays queued");
                    report.failed += 1;
                    continue;
                }
            };

            let upload = ProgressUpload {
                id: record.id.clone(),
                tour_id: record.tour_id.clone(),
                payload,
            };

            match self.sink.upsert_progress(&upload).await {
                Ok(()) => {
                    ProgressRepo::mark_synced(&self.pool, &record.id).await?;
                    report.synced += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        record_id = %record.id,
                        tour_id = %record.tour_id,
                        error = %e,
                        "Progress sync failed; record stays queued",
                    );
                    report.failed += 1;
                }
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                attempted = report.attempted,
                synced = report.synced,
                failed = report.failed,
                "Sync pass finished",
            );
        }
        Ok(report)
    }
}
