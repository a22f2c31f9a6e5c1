use tourcast_core::error::CoreError;
use tourcast_remote::RemoteError;

/// Errors raised while materializing a tour offline.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Input validation failed before any work started.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Another download session for the same tour is still in flight.
    #[error("Download already in progress for tour {0}")]
    AlreadyInProgress(String),

    /// The catalog fetch failed or the tour does not exist remotely.
    #[error("Failed to fetch tour {tour_id}: {source}")]
    TourFetch {
        tour_id: String,
        #[source]
        source: RemoteError,
    },

    /// An individual asset fetch failed; the whole download aborts.
    #[error("Failed to download asset {asset_id}: {source}")]
    Asset {
        asset_id: String,
        #[source]
        source: RemoteError,
    },

    /// The local store rejected a read or write.
    #[error("Local store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The fetched tour graph could not be serialized for storage.
    #[error("Failed to encode tour graph: {0}")]
    Encode(#[from] serde_json::Error),
}
