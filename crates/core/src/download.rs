//! Download estimation, progress arithmetic, asset id composition, and
//! input validation for the offline downloader.
//!
//! Sizes are estimates used only to derive a progress percentage: audio is
//! assumed to stream at roughly 16 KiB per second of nominal duration, and
//! images are costed at a flat 500 KiB each.

use crate::error::CoreError;
use crate::tour::TourGraph;

// ---------------------------------------------------------------------------
// Estimation constants
// ---------------------------------------------------------------------------

/// Estimated audio payload bytes per second of nominal track duration.
pub const AUDIO_BYTES_PER_SEC: u64 = 16 * 1024;

/// Flat per-image payload estimate.
pub const IMAGE_BYTES_ESTIMATE: u64 = 500 * 1024;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a tour identifier is non-empty.
pub fn validate_tour_id(tour_id: &str) -> Result<(), CoreError> {
    if tour_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tour id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate that an asset URL is non-empty and starts with `http`.
pub fn validate_asset_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Asset URL must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "Asset URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Asset id composition
// ---------------------------------------------------------------------------

/// Composite id for a tour's preview image.
pub fn tour_preview_asset_id(tour_id: &str) -> String {
    format!("tour_{tour_id}_preview")
}

/// Composite id for a stop's preview image.
pub fn stop_preview_asset_id(stop_id: &str) -> String {
    format!("stop_{stop_id}_preview")
}

/// Composite id for the `index`-th gallery image of a stop.
pub fn stop_gallery_asset_id(stop_id: &str, index: usize) -> String {
    format!("stop_{stop_id}_gallery_{index}")
}

// ---------------------------------------------------------------------------
// Size estimation
// ---------------------------------------------------------------------------

/// Estimate the total byte size of a full tour download.
///
/// Serialized graph size, plus audio at [`AUDIO_BYTES_PER_SEC`] per nominal
/// second, plus [`IMAGE_BYTES_ESTIMATE`] per referenced image.
pub fn estimate_tour_bytes(graph: &TourGraph) -> u64 {
    let graph_bytes = serde_json::to_vec(graph).map_or(0, |v| v.len() as u64);
    let audio_bytes = graph.total_audio_secs() * AUDIO_BYTES_PER_SEC;
    let image_bytes = graph.image_refs().len() as u64 * IMAGE_BYTES_ESTIMATE;
    graph_bytes + audio_bytes + image_bytes
}

// ---------------------------------------------------------------------------
// Progress calculation
// ---------------------------------------------------------------------------

/// Derive a progress percentage from downloaded bytes and a total estimate.
///
/// Clamped to 100: the estimate is approximate and real payloads may
/// exceed it. A zero estimate reports 100 immediately.
pub fn progress_percent(downloaded: u64, estimate: u64) -> u8 {
    if estimate == 0 {
        return 100;
    }
    let pct = (downloaded as f64 / estimate as f64 * 100.0).round();
    pct.min(100.0) as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::{AudioTrack, TourStop};

    // -- validate_tour_id ----------------------------------------------------

    #[test]
    fn valid_tour_id_accepted() {
        assert!(validate_tour_id("tour-42").is_ok());
    }

    #[test]
    fn empty_tour_id_rejected() {
        assert!(validate_tour_id("").is_err());
        assert!(validate_tour_id("   ").is_err());
    }

    // -- validate_asset_url --------------------------------------------------

    #[test]
    fn valid_urls_accepted() {
        assert!(validate_asset_url("https://cdn.example.com/a.mp3").is_ok());
        assert!(validate_asset_url("http://cdn.example.com/a.jpg").is_ok());
    }

    #[test]
    fn empty_url_rejected() {
        assert!(validate_asset_url("").is_err());
        assert!(validate_asset_url("  ").is_err());
    }

    #[test]
    fn non_http_url_rejected() {
        assert!(validate_asset_url("ftp://cdn.example.com/a.mp3").is_err());
        assert!(validate_asset_url("just-a-path").is_err());
    }

    // -- asset id composition ------------------------------------------------

    #[test]
    fn composite_asset_ids() {
        assert_eq!(tour_preview_asset_id("t1"), "tour_t1_preview");
        assert_eq!(stop_preview_asset_id("s9"), "stop_s9_preview");
        assert_eq!(stop_gallery_asset_id("s9", 3), "stop_s9_gallery_3");
    }

    // -- estimate_tour_bytes -------------------------------------------------

    fn two_stop_graph() -> TourGraph {
        // The reference scenario: 2 stops, one 60s English track each,
        // a tour preview and a preview per stop.
        TourGraph {
            id: "t1".into(),
            title: "Old Town Walk".into(),
            description: None,
            preview_image_url: Some("https://cdn.example.com/t1.jpg".into()),
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

    #[test]
    fn estimate_matches_reference_scenario() {
        let graph = two_stop_graph();
        let json_bytes = serde_json::to_vec(&graph).unwrap().len() as u64;
        let expected = json_bytes + (60 + 60) * AUDIO_BYTES_PER_SEC + 3 * IMAGE_BYTES_ESTIMATE;
        assert_eq!(estimate_tour_bytes(&graph), expected);
    }

    #[test]
    fn estimate_of_empty_tour_is_json_only() {
        let graph = TourGraph {
            id: "t0".into(),
            title: "Empty".into(),
            description: None,
            preview_image_url: None,
            stops: vec![],
        };
        let json_bytes = serde_json::to_vec(&graph).unwrap().len() as u64;
        assert_eq!(estimate_tour_bytes(&graph), json_bytes);
    }

    // -- progress_percent ----------------------------------------------------

    #[test]
    fn progress_half_way() {
        assert_eq!(progress_percent(50, 100), 50);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
    }

    #[test]
    fn progress_capped_at_100() {
        assert_eq!(progress_percent(250, 100), 100);
    }

    #[test]
    fn progress_zero_estimate_reports_complete() {
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn progress_is_monotone_in_downloaded_bytes() {
        let estimate = 1_000_000;
        let mut last = 0;
        for done in (0..=estimate).step_by(50_000) {
            let pct = progress_percent(done, estimate);
            assert!(pct >= last, "progress regressed at {done}");
            last = pct;
        }
        assert_eq!(last, 100);
    }
}
