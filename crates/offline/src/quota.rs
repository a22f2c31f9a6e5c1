//! Storage capacity introspection.
//!
//! [`StorageQuota`] abstracts the host's quota signal so the accountant
//! can degrade gracefully where none exists. [`FsQuota`] reads statvfs
//! for the filesystem holding the store.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use serde::Serialize;

/// Aggregate capacity numbers reported to callers. All zero when the
/// host has no quota signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub used_bytes: u64,
    pub available_bytes: u64,
    /// 0–100, share of the quota in use.
    pub percentage: u8,
}

/// A raw usage/quota pair in bytes.
#[derive(Debug, Clone, Copy)]
pub struct QuotaEstimate {
    pub usage: u64,
    pub quota: u64,
}

/// Host storage-quota capability. Optional: `None` means the host
/// cannot report capacity, which callers must treat as zeros, not as an
/// error.
pub trait StorageQuota: Send + Sync {
    fn estimate(&self) -> Option<QuotaEstimate>;
}

/// statvfs-backed quota for the filesystem containing `path`.
pub struct FsQuota {
    path: PathBuf,
}

impl FsQuota {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageQuota for FsQuota {
    fn estimate(&self) -> Option<QuotaEstimate> {
        let path = CString::new(self.path.as_os_str().as_bytes()).ok()?;
        let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::statvfs(path.as_ptr(), &mut stats) };
        if rc != 0 {
            return None;
        }

        let frsize = stats.f_frsize as u64;
        let quota = (stats.f_blocks as u64).saturating_mul(frsize);
        let available = (stats.f_bavail as u64).saturating_mul(frsize);
        Some(QuotaEstimate {
            usage: quota.saturating_sub(available),
            quota,
        })
    }
}

/// A quota source for hosts with no capacity introspection.
pub struct NoQuota;

impl StorageQuota for NoQuota {
    fn estimate(&self) -> Option<QuotaEstimate> {
        None
    }
}

/// Fold a raw estimate into reportable stats. A missing or zero quota
/// degrades to all-zero defaults.
pub fn stats_from(estimate: Option<QuotaEstimate>) -> StorageStats {
    match estimate {
        Some(e) if e.quota > 0 => {
            let used = e.usage.min(e.quota);
            StorageStats {
                used_bytes: used,
                available_bytes: e.quota - used,
                percentage: (used * 100 / e.quota) as u8,
            }
        }
        _ => StorageStats::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_degrade_to_zero_without_quota() {
        assert_eq!(stats_from(None), StorageStats::default());
        assert_eq!(
            stats_from(Some(QuotaEstimate { usage: 5, quota: 0 })),
            StorageStats::default()
        );
    }

    #[test]
    fn stats_report_share_in_use() {
        let stats = stats_from(Some(QuotaEstimate {
            usage: 250,
            quota: 1000,
        }));
        assert_eq!(stats.used_bytes, 250);
        assert_eq!(stats.available_bytes, 750);
        assert_eq!(stats.percentage, 25);
    }

    #[test]
    fn usage_above_quota_is_clamped() {
        let stats = stats_from(Some(QuotaEstimate {
            usage: 1200,
            quota: 1000,
        }));
        assert_eq!(stats.used_bytes, 1000);
        assert_eq!(stats.available_bytes, 0);
        assert_eq!(stats.percentage, 100);
    }

    #[test]
    fn fs_quota_reports_for_an_existing_path() {
        let quota = FsQuota::new("/");
        let estimate = quota.estimate().expect("statvfs on / should succeed");
        assert!(estimate.quota > 0);
    }

    #[test]
    fn fs_quota_is_none_for_missing_path() {
        let quota = FsQuota::new("/no/such/path/anywhere");
        assert!(quota.estimate().is_none());
    }

    #[test]
    fn no_quota_reports_none() {
        assert!(NoQuota.estimate().is_none());
    }
}
