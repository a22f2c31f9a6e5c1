//! Offline tour subsystem: download, sync, connectivity, and retention.
//!
//! Four cooperating components, each constructed with its collaborators
//! injected so embedders and tests can swap any of them:
//!
//! - [`TourDownloader`] materializes one tour at a time into the local
//!   store, downloading every referenced asset concurrently and
//!   reporting cumulative progress.
//! - [`ProgressSync`] queues user-progress writes locally and drains
//!   them to the remote backend, one record at a time.
//! - [`ConnectivityMonitor`] watches online/offline transitions and
//!   kicks off a sync pass whenever connectivity is restored.
//! - [`StorageAccountant`] reports capacity and evicts tours that have
//!   not been touched within the retention window.

pub mod accountant;
pub mod connectivity;
pub mod downloader;
pub mod error;
pub mod quota;
pub mod sync;

pub use accountant::{retention_loop, StorageAccountant};
pub use connectivity::{
    ConnState, ConnectivityHandle, ConnectivityMonitor, ConnectivitySource, WatchSource,
};
pub use downloader::{DownloadProgress, TourDownloader};
pub use error::DownloadError;
pub use quota::{FsQuota, NoQuota, QuotaEstimate, StorageQuota, StorageStats};
pub use sync::{ProgressSync, SyncReport};
