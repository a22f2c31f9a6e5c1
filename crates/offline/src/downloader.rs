//! Tour download orchestration.
//!
//! [`TourDownloader::download_tour`] drives one tour's complete offline
//! materialization: fetch the graph, persist it, download every
//! referenced asset concurrently, and report cumulative progress. At
//! most one session per tour id may be in flight; a second request for
//! the same id fails fast with [`DownloadError::AlreadyInProgress`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use tourcast_core::download::{self, estimate_tour_bytes, progress_percent};
use tourcast_core::tour::{AudioRef, ImageRef};
use tourcast_db::models::audio_asset::CreateAudioAsset;
use tourcast_db::models::image_asset::CreateImageAsset;
use tourcast_db::models::status::DownloadStatus;
use tourcast_db::models::tour::{CreateOfflineTour, OfflineTour};
use tourcast_db::repositories::{AudioAssetRepo, ImageAssetRepo, TourRepo};
use tourcast_db::DbPool;
use tourcast_remote::{AssetFetcher, DownloadStatusUpdate, StatusSink, TourCatalog};

use crate::error::DownloadError;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// A snapshot handed to the progress callback. Fired at least once at
/// start and once at completion, and after every asset that lands.
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub tour_id: String,
    /// 0–100, non-decreasing within one session.
    pub percent: u8,
    pub downloaded_bytes: u64,
    pub estimated_bytes: u64,
}

// ---------------------------------------------------------------------------
// Downloader
// ---------------------------------------------------------------------------

/// Materializes tours into the local store.
pub struct TourDownloader {
    pool: DbPool,
    catalog: Arc<dyn TourCatalog>,
    assets: Arc<dyn AssetFetcher>,
    status: Arc<dyn StatusSink>,
    user_id: String,
    /// Tour ids with a session currently in flight.
    in_flight: Mutex<HashSet<String>>,
}

impl TourDownloader {
    pub fn new(
        pool: DbPool,
        catalog: Arc<dyn TourCatalog>,
        assets: Arc<dyn AssetFetcher>,
        status: Arc<dyn StatusSink>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            catalog,
            assets,
            status,
            user_id: user_id.into(),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Download a full tour for offline playback.
    ///
    /// On success every asset referenced by the fetched graph is present
    /// in the local store and the tour row is `completed`. On failure the
    /// tour row is `failed` and partially downloaded assets may remain;
    /// callers retry by downloading again (asset writes are upserts) or
    /// by evicting first.
    pub async fn download_tour(
        &self,
        tour_id: &str,
        on_progress: impl Fn(DownloadProgress) + Send + Sync,
    ) -> Result<OfflineTour, DownloadError> {
        download::validate_tour_id(tour_id)?;
        let _guard = self.claim_slot(tour_id)?;

        self.report_status(tour_id, DownloadStatus::Downloading, 0).await;

        match self.run_session(tour_id, &on_progress).await {
            Ok(tour) => {
                self.report_status(tour_id, DownloadStatus::Completed, 100).await;
                tracing::info!(tour_id, "Tour download completed");
                Ok(tour)
            }
            Err(err) => {
                if let Err(e) = TourRepo::mark_failed(&self.pool, tour_id).await {
                    tracing::error!(tour_id, error = %e, "Failed to mark tour as failed");
                }
                self.report_status(tour_id, DownloadStatus::Failed, 0).await;
                tracing::warn!(tour_id, error = %err, "Tour download failed");
                Err(err)
            }
        }
    }

    /// Read a locally stored tour, bumping its `last_accessed`.
    pub async fn get_offline_tour(
        &self,
        tour_id: &str,
    ) -> Result<Option<OfflineTour>, sqlx::Error> {
        let tour = TourRepo::find_by_id(&self.pool, tour_id).await?;
        if tour.is_some() {
            TourRepo::touch(&self.pool, tour_id).await?;
        }
        Ok(tour)
    }

    /// All locally stored tours, most recently accessed first.
    pub async fn list_offline_tours(&self) -> Result<Vec<OfflineTour>, sqlx::Error> {
        TourRepo::list_all(&self.pool).await
    }

    /// Read a downloaded audio track for playback, bumping the owning
    /// tour's `last_accessed`.
    pub async fn get_audio_asset(
        &self,
        track_id: &str,
    ) -> Result<Option<tourcast_db::models::audio_asset::AudioAsset>, sqlx::Error> {
        let asset = AudioAssetRepo::find_by_id(&self.pool, track_id).await?;
        if let Some(asset) = &asset {
            TourRepo::touch(&self.pool, &asset.tour_id).await?;
        }
        Ok(asset)
    }

    /// Read a downloaded image, bumping the owning tour's
    /// `last_accessed`.
    pub async fn get_image_asset(
        &self,
        asset_id: &str,
    ) -> Result<Option<tourcast_db::models::image_asset::ImageAsset>, sqlx::Error> {
        let asset = ImageAssetRepo::find_by_id(&self.pool, asset_id).await?;
        if let Some(asset) = &asset {
            TourRepo::touch(&self.pool, &asset.tour_id).await?;
        }
        Ok(asset)
    }

    /// Tour ids currently downloading.
    pub fn in_flight(&self) -> Vec<String> {
        match self.in_flight.lock() {
            Ok(set) => set.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Session internals
    // -----------------------------------------------------------------------

    async fn run_session(
        &self,
        tour_id: &str,
        on_progress: &(impl Fn(DownloadProgress) + Send + Sync),
    ) -> Result<OfflineTour, DownloadError> {
        let graph = self
            .catalog
            .fetch_tour(tour_id)
            .await
            .map_err(|source| DownloadError::TourFetch {
                tour_id: tour_id.to_string(),
                source,
            })?;

        let estimate = estimate_tour_bytes(&graph);
        let audio_refs = graph.audio_refs();
        let image_refs = graph.image_refs();

        let create = CreateOfflineTour::from_graph(&graph, DownloadStatus::Downloading)?;
        TourRepo::upsert(&self.pool, &create).await?;

        tracing::info!(
            tour_id,
            estimate_bytes = estimate,
            audio_assets = audio_refs.len(),
            image_assets = image_refs.len(),
            "Tour download started",
        );
        on_progress(DownloadProgress {
            tour_id: tour_id.to_string(),
            percent: 0,
            downloaded_bytes: 0,
            estimated_bytes: estimate,
        });

        // All asset fetches run concurrently; the first failure aborts
        // the session (remaining futures are dropped unpolled).
        let downloaded = AtomicU64::new(0);
        let mut jobs: Vec<BoxFuture<'_, Result<(), DownloadError>>> = Vec::new();
        for audio in audio_refs {
            jobs.push(
                self.fetch_audio(tour_id, audio, &downloaded, estimate, on_progress)
                    .boxed(),
            );
        }
        for image in image_refs {
            jobs.push(
                self.fetch_image(tour_id, image, &downloaded, estimate, on_progress)
                    .boxed(),
            );
        }
        futures::future::try_join_all(jobs).await?;

        TourRepo::mark_completed(&self.pool, tour_id).await?;
        on_progress(DownloadProgress {
            tour_id: tour_id.to_string(),
            percent: 100,
            downloaded_bytes: downloaded.load(Ordering::SeqCst),
            estimated_bytes: estimate,
        });

        TourRepo::find_by_id(&self.pool, tour_id)
            .await?
            .ok_or_else(|| {
                DownloadError::Core(tourcast_core::error::CoreError::NotFound {
                    entity: "OfflineTour",
                    id: tour_id.to_string(),
                })
            })
    }

    async fn fetch_audio(
        &self,
        tour_id: &str,
        audio: AudioRef,
        downloaded: &AtomicU64,
        estimate: u64,
        on_progress: &(impl Fn(DownloadProgress) + Send + Sync),
    ) -> Result<(), DownloadError> {
        download::validate_asset_url(&audio.url)?;
        let data = self
            .assets
            .fetch(&audio.url)
            .await
            .map_err(|source| DownloadError::Asset {
                asset_id: audio.asset_id.clone(),
                source,
            })?;
        let size = data.len() as u64;

        AudioAssetRepo::upsert(
            &self.pool,
            &CreateAudioAsset {
                id: audio.asset_id,
                tour_id: tour_id.to_string(),
                stop_id: audio.stop_id,
                language: audio.language,
                data,
                duration_secs: i64::from(audio.duration_secs),
            },
        )
        .await?;

        self.bump_progress(tour_id, size, downloaded, estimate, on_progress);
        Ok(())
    }

    async fn fetch_image(
        &self,
        tour_id: &str,
        image: ImageRef,
        downloaded: &AtomicU64,
        estimate: u64,
        on_progress: &(impl Fn(DownloadProgress) + Send + Sync),
    ) -> Result<(), DownloadError> {
        download::validate_asset_url(&image.url)?;
        let data = self
            .assets
            .fetch(&image.url)
            .await
            .map_err(|source| DownloadError::Asset {
                asset_id: image.asset_id.clone(),
                source,
            })?;
        let size = data.len() as u64;

        ImageAssetRepo::upsert(
            &self.pool,
            &CreateImageAsset {
                id: image.asset_id,
                tour_id: tour_id.to_string(),
                source_url: image.url,
                data,
            },
        )
        .await?;

        self.bump_progress(tour_id, size, downloaded, estimate, on_progress);
        Ok(())
    }

    /// Add `size` to the cumulative counter and report the new
    /// percentage. The callback fires in the same poll as the counter
    /// update, so reported percentages never regress.
    fn bump_progress(
        &self,
        tour_id: &str,
        size: u64,
        downloaded: &AtomicU64,
        estimate: u64,
        on_progress: &(impl Fn(DownloadProgress) + Send + Sync),
    ) {
        let done = downloaded.fetch_add(size, Ordering::SeqCst) + size;
        on_progress(DownloadProgress {
            tour_id: tour_id.to_string(),
            percent: progress_percent(done, estimate),
            downloaded_bytes: done,
            estimated_bytes: estimate,
        });
    }

    /// Atomically check-and-insert the in-flight marker. The returned
    /// guard removes it on drop, on every exit path.
    fn claim_slot(&self, tour_id: &str) -> Result<InFlightGuard<'_>, DownloadError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(tour_id.to_string()) {
            return Err(DownloadError::AlreadyInProgress(tour_id.to_string()));
        }
        Ok(InFlightGuard {
            registry: &self.in_flight,
            tour_id: tour_id.to_string(),
        })
    }

    async fn report_status(&self, tour_id: &str, status: DownloadStatus, progress: u8) {
        let update = DownloadStatusUpdate {
            user_id: self.user_id.clone(),
            tour_id: tour_id.to_string(),
            status: status.to_string(),
            progress,
        };
        if let Err(e) = self.status.upsert_download_status(&update).await {
            tracing::warn!(tour_id, error = %e, "Download status write failed (best-effort)");
        }
    }
}

/// Removes the in-flight marker when a session ends, however it ends.
struct InFlightGuard<'a> {
    registry: &'a Mutex<HashSet<String>>,
    tour_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.tour_id);
    }
}
