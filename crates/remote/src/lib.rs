//! Remote collaborators of the offline subsystem.
//!
//! Each collaborator is a trait so the offline crate can be driven by
//! test doubles; the `Http*` types are the production implementations
//! against the platform backend and asset CDN.

pub mod assets;
pub mod catalog;
pub mod error;
pub mod sync_api;

pub use assets::{AssetFetcher, HttpAssetFetcher};
pub use catalog::{HttpTourCatalog, TourCatalog};
pub use error::RemoteError;
pub use sync_api::{
    DownloadStatusUpdate, HttpProgressSink, HttpStatusSink, ProgressSink, ProgressUpload,
    StatusSink,
};
