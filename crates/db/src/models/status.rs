//! Status enums persisted as TEXT columns.
//!
//! The store is a single embedded file, so statuses are stored by name
//! rather than through lookup tables.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use strum_macros::{Display, EnumString};

/// Lifecycle of a locally downloaded tour.
///
/// Transitions only move forward along pending → downloading →
/// {completed, failed}; `deleted` is reachable from any state via
/// eviction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DownloadStatus {
    #[default]
    Pending,
    Downloading,
    Completed,
    Failed,
    Deleted,
}

/// Whether a queued progress record has been flushed to the remote
/// backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn download_status_round_trips_through_text() {
        for status in [
            DownloadStatus::Pending,
            DownloadStatus::Downloading,
            DownloadStatus::Completed,
            DownloadStatus::Failed,
            DownloadStatus::Deleted,
        ] {
            let text = status.to_string();
            assert_eq!(DownloadStatus::from_str(&text).unwrap(), status);
        }
    }

    #[test]
    fn sync_status_serializes_lowercase() {
        assert_eq!(SyncStatus::Pending.to_string(), "pending");
        assert_eq!(SyncStatus::Synced.to_string(), "synced");
    }

    #[test]
    fn unknown_status_text_rejected() {
        assert!(DownloadStatus::from_str("paused").is_err());
        assert!(SyncStatus::from_str("done").is_err());
    }
}
