//! Core types for suno-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::MetadataValue;

/// One generated audio item returned by the remote service
///
/// Every field the pipeline consumes is declared here with an explicit
/// default, so a clip missing a field deserializes to an empty value
/// instead of failing the whole response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Track {
    /// Service-assigned track identifier
    #[serde(default)]
    pub id: String,

    /// Song title as recorded by the service
    #[serde(default)]
    pub title: String,

    /// URL of the rendered audio asset
    #[serde(default)]
    pub audio_url: String,

    /// URL of the rendered video asset
    #[serde(default)]
    pub video_url: String,

    /// URL of the large cover image
    #[serde(default)]
    pub image_large_url: String,

    /// Identifier of the owning user account
    #[serde(default)]
    pub user_id: String,

    /// Creation timestamp, when the service reports one
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Generation status reported by the feed
    #[serde(default)]
    pub status: TrackStatus,

    /// Arbitrary nested metadata attached by the service
    #[serde(default)]
    pub metadata: MetadataValue,
}

impl Track {
    /// Lyrics string nested inside the metadata, empty when absent
    pub fn lyrics(&self) -> &str {
        self.metadata.lyrics().unwrap_or("")
    }
}

/// Generation status of a track in the service feed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    /// Request accepted, not yet processing
    #[default]
    Submitted,
    /// Waiting in the service's queue
    Queued,
    /// Audio is being rendered and is already playable
    Streaming,
    /// Rendering finished
    Complete,
    /// Generation failed on the service side
    Error,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl TrackStatus {
    /// Whether the audio asset is ready to download
    pub fn is_ready(&self) -> bool {
        matches!(self, TrackStatus::Streaming | TrackStatus::Complete)
    }
}

/// Flat sidecar record written next to every archived audio file
///
/// Field order is the serialization order and is stable by declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Service-assigned track identifier
    pub id: String,
    /// URL of the rendered video asset
    pub video_url: String,
    /// URL of the rendered audio asset
    pub audio_url: String,
    /// URL of the large cover image
    pub image_large_url: String,
    /// The full metadata tree, recursively serialized
    pub metadata: MetadataValue,
    /// Identifier of the owning user account
    pub user_id: String,
    /// Creation timestamp, null when the service omitted it
    pub created_at: Option<DateTime<Utc>>,
    /// Song title
    pub title: String,
    /// Extracted lyrics, empty when the metadata carries none
    pub lyrics: String,
}

impl TrackInfo {
    /// Extract the sidecar record from a track
    pub fn from_track(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            video_url: track.video_url.clone(),
            audio_url: track.audio_url.clone(),
            image_large_url: track.image_large_url.clone(),
            metadata: track.metadata.clone(),
            user_id: track.user_id.clone(),
            created_at: track.created_at,
            title: track.title.clone(),
            lyrics: track.lyrics().to_string(),
        }
    }
}

/// Files written for one successfully archived track
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedTrack {
    /// Final path of the audio file
    pub audio_path: PathBuf,
    /// Final path of the metadata sidecar
    pub info_path: PathBuf,
    /// Final path of the lyrics sidecar, when lyrics were present
    pub lyrics_path: Option<PathBuf>,
}

/// One per-item failure that was skipped during a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Skip {
    /// Category the item belonged to
    pub category: String,
    /// The prompt that was being processed
    pub prompt: String,
    /// The tag in flight, in the per-tag flow
    pub tag: Option<String>,
    /// Why the item was skipped
    pub reason: String,
}

/// Aggregated outcome of a batch run
///
/// A run that reaches its summary always "completed" in the original sense;
/// per-item failures are tallied here instead of only being printed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of categories processed
    pub categories: usize,
    /// Number of tracks fully archived (audio + sidecars on disk)
    pub tracks_archived: u64,
    /// Per-item failures that were skipped
    pub skips: Vec<Skip>,
}

impl RunSummary {
    /// Whether every item in the batch succeeded
    pub fn is_clean(&self) -> bool {
        self.skips.is_empty()
    }
}
