//! Denormalized tour graph as returned by the remote catalog.
//!
//! The graph is stored whole in the local tours collection and walked by
//! the downloader to enumerate every audio and image asset it references.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Graph model
// ---------------------------------------------------------------------------

/// A full tour with its ordered stops, as fetched from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourGraph {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Tour-level preview image, if any.
    pub preview_image_url: Option<String>,
    /// Stops in visiting order.
    pub stops: Vec<TourStop>,
}

/// One stop on a tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourStop {
    pub id: String,
    pub title: String,
    pub preview_image_url: Option<String>,
    /// Gallery image URLs, in display order.
    #[serde(default)]
    pub gallery_image_urls: Vec<String>,
    /// One narration track per available language.
    #[serde(default)]
    pub audio_tracks: Vec<AudioTrack>,
}

/// A narration track for a single stop in a single language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: String,
    /// BCP-47 language tag, e.g. `"en"` or `"de-AT"`.
    pub language: String,
    pub url: String,
    /// Nominal duration in seconds.
    pub duration_secs: u32,
}

// ---------------------------------------------------------------------------
// Asset references
// ---------------------------------------------------------------------------

/// A downloadable audio asset referenced by the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRef {
    /// Matches the remote track id.
    pub asset_id: String,
    pub stop_id: String,
    pub language: String,
    pub url: String,
    pub duration_secs: u32,
}

/// A downloadable image asset referenced by the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Caller-assigned composite id, see [`crate::download`].
    pub asset_id: String,
    pub url: String,
}

impl TourGraph {
    /// Every audio track referenced anywhere in the graph.
    pub fn audio_refs(&self) -> Vec<AudioRef> {
        self.stops
            .iter()
            .flat_map(|stop| {
                stop.audio_tracks.iter().map(|track| AudioRef {
                    asset_id: track.id.clone(),
                    stop_id: stop.id.clone(),
                    language: track.language.clone(),
                    url: track.url.clone(),
                    duration_secs: track.duration_secs,
                })
            })
            .collect()
    }

    /// Every image referenced anywhere in the graph: the tour preview,
    /// each stop's preview, and each stop's gallery images.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let mut refs = Vec::new();

        if let Some(url) = &self.preview_image_url {
            refs.push(ImageRef {
                asset_id: crate::download::tour_preview_asset_id(&self.id),
                url: url.clone(),
            });
        }

        for stop in &self.stops {
            if let Some(url) = &stop.preview_image_url {
                refs.push(ImageRef {
                    asset_id: crate::download::stop_preview_asset_id(&stop.id),
                    url: url.clone(),
                });
            }
            for (index, url) in stop.gallery_image_urls.iter().enumerate() {
                refs.push(ImageRef {
                    asset_id: crate::download::stop_gallery_asset_id(&stop.id, index),
                    url: url.clone(),
                });
            }
        }

        refs
    }

    /// Sum of nominal audio durations across all stops and languages.
    pub fn total_audio_secs(&self) -> u64 {
        self.stops
            .iter()
            .flat_map(|s| s.audio_tracks.iter())
            .map(|t| u64::from(t.duration_secs))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> TourGraph {
        TourGraph {
            id: "t1".into(),
            title: "Old Town Walk".into(),
            description: None,
            preview_image_url: Some("https://cdn.example.com/t1.jpg".into()),
            stops: vec![
                TourStop {
                    id: "s1".into(),
                    title: "Clock Tower".into(),
                    preview_image_url: Some("https://cdn.example.com/s1.jpg".into()),
                    gallery_image_urls: vec![
                        "https://cdn.example.com/s1-g0.jpg".into(),
                        "https://cdn.example.com/s1-g1.jpg".into(),
                    ],
                    audio_tracks: vec![
                        AudioTrack {
                            id: "a1".into(),
                            language: "en".into(),
                            url: "https://cdn.example.com/a1.mp3".into(),
                            duration_secs: 90,
                        },
                        AudioTrack {
                            id: "a2".into(),
                            language: "de".into(),
                            url: "https://cdn.example.com/a2.mp3".into(),
                            duration_secs: 95,
                        },
                    ],
                },
                TourStop {
                    id: "s2".into(),
                    title: "Harbour".into(),
                    preview_image_url: None,
                    gallery_image_urls: vec![],
                    audio_tracks: vec![AudioTrack {
                        id: "a3".into(),
                        language: "en".into(),
                        url: "https://cdn.example.com/a3.mp3".into(),
                        duration_secs: 60,
                    }],
                },
            ],
        }
    }

    #[test]
    fn audio_refs_cover_all_stops_and_languages() {
        let refs = sample_graph().audio_refs();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].asset_id, "a1");
        assert_eq!(refs[0].stop_id, "s1");
        assert_eq!(refs[1].language, "de");
        assert_eq!(refs[2].stop_id, "s2");
    }

    #[test]
    fn image_refs_include_tour_preview_stop_previews_and_gallery() {
        let refs = sample_graph().image_refs();
        let ids: Vec<&str> = refs.iter().map(|r| r.asset_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "tour_t1_preview",
                "stop_s1_preview",
                "stop_s1_gallery_0",
                "stop_s1_gallery_1",
            ]
        );
    }

    #[test]
    fn image_refs_skip_missing_previews() {
        let mut graph = sample_graph();
        graph.preview_image_url = None;
        let refs = graph.image_refs();
        assert!(refs.iter().all(|r| r.asset_id != "tour_t1_preview"));
    }

    #[test]
    fn total_audio_secs_sums_every_track() {
        assert_eq!(sample_graph().total_audio_secs(), 90 + 95 + 60);
    }

    #[test]
    fn graph_round_trips_through_json() {
        let graph = sample_graph();
        let json = serde_json::to_string(&graph).unwrap();
        let back: TourGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "t1");
        assert_eq!(back.stops.len(), 2);
        assert_eq!(back.stops[0].audio_tracks.len(), 2);
    }
}
