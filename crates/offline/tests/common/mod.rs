//! Shared fixtures: a reference tour graph and in-memory collaborator
//! doubles for the remote traits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tourcast_core::tour::{AudioTrack, TourGraph, TourStop};
use tourcast_remote::{
    AssetFetcher, DownloadStatusUpdate, ProgressSink, ProgressUpload, RemoteError, StatusSink,
    TourCatalog,
};

/// The reference tour: 2 stops, one 60-second English track each, a
/// tour preview and a preview per stop: 2 audio assets and 3 image
/// assets in total.
pub fn sample_graph(tour_id: &str) -> TourGraph {
    TourGraph {
        id: tour_id.to_string(),
        title: "Old Town Walk".into(),
        description: Some("Two stops through the old town".into()),
        preview_image_url: Some(format!("https://cdn.example.com/{tour_id}.jpg")),
        stops: (1..=2)
            .map(|n| TourStop {
                id: format!("s{n}"),
                title: format!("Stop {n}"),
                preview_image_url: Some(format!("https://cdn.example.com/s{n}.jpg")),
                gallery_image_urls: vec![],
                audio_tracks: vec![AudioTrack {
                    id: format!("a{n}"),
                    language: "en".into(),
                    url: format!("https://cdn.example.com/a{n}.mp3"),
                    duration_secs: 60,
                }],
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Catalog double
// ---------------------------------------------------------------------------

/// Serves a single fixed graph; every other id is NotFound.
pub struct StaticCatalog {
    pub graph: TourGraph,
}

#[async_trait]
impl TourCatalog for StaticCatalog {
    async fn fetch_tour(&self, tour_id: &str) -> Result<TourGraph, RemoteError> {
        if tour_id == self.graph.id {
            Ok(self.graph.clone())
        } else {
            Err(RemoteError::NotFound(tour_id.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Asset fetcher doubles
// ---------------------------------------------------------------------------

/// Returns a fixed-size payload per asset; URLs containing the failure
/// marker error instead.
pub struct StubFetcher {
    pub payload_bytes: usize,
    pub fail_matching: Mutex<Option<String>>,
}

impl StubFetcher {
    pub fn new(payload_bytes: usize) -> Self {
        Self {
            payload_bytes,
            fail_matching: Mutex::new(None),
        }
    }

    pub fn failing_on(payload_bytes: usize, marker: &str) -> Self {
        Self {
            payload_bytes,
            fail_matching: Mutex::new(Some(marker.to_string())),
        }
    }

    pub fn clear_failure(&self) {
        *self.fail_matching.lock().unwrap() = None;
    }
}

#[async_trait]
impl AssetFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        if let Some(marker) = self.fail_matching.lock().unwrap().as_deref() {
            if url.contains(marker) {
                return Err(RemoteError::Request(format!("stubbed failure for {url}")));
            }
        }
        Ok(vec![0u8; self.payload_bytes])
    }
}

/// Blocks every fetch until permits are released, so tests can hold a
/// download in flight.
pub struct GatedFetcher {
    pub gate: Arc<Semaphore>,
    pub payload_bytes: usize,
}

impl GatedFetcher {
    pub fn new(payload_bytes: usize) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Self {
                gate: Arc::clone(&gate),
                payload_bytes,
            },
            gate,
        )
    }
}

#[async_trait]
impl AssetFetcher for GatedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, RemoteError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        permit.forget();
        Ok(vec![0u8; self.payload_bytes])
    }
}

// ---------------------------------------------------------------------------
// Sink doubles
// ---------------------------------------------------------------------------

/// Records every status update it receives; always succeeds.
#[derive(Default)]
pub struct RecordingStatusSink {
    pub updates: Mutex<Vec<DownloadStatusUpdate>>,
}

#[async_trait]
impl StatusSink for RecordingStatusSink {
    async fn upsert_download_status(
        &self,
        update: &DownloadStatusUpdate,
    ) -> Result<(), RemoteError> {
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }
}

/// Records progress uploads; can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingProgressSink {
    pub uploads: Mutex<Vec<ProgressUpload>>,
    pub fail: AtomicBool,
}

impl RecordingProgressSink {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressSink for RecordingProgressSink {
    async fn upsert_progress(&self, record: &ProgressUpload) -> Result<(), RemoteError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RemoteError::Request("stubbed sync failure".into()));
        }
        self.uploads.lock().unwrap().push(record.clone());
        Ok(())
    }
}
