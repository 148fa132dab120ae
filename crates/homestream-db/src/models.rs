//! Rust models matching the catalog schema.

use chrono::{DateTime, Utc};
use homestream_common::{ContentId, ContentKind, EpisodeId};
use serde::{Deserialize, Serialize};

/// A movie or series in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Public path of the stored thumbnail, e.g. `/media/thumbnails/<uuid>.jpg`.
    pub thumbnail: Option<String>,
    /// Public path of the stored video, e.g. `/media/videos/<uuid>.mp4`.
    pub video_path: Option<String>,
    /// Runtime in seconds.
    pub duration: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a content record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContent {
    pub title: String,
    pub description: Option<String>,
    pub kind: ContentKind,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub thumbnail: Option<String>,
    pub video_path: Option<String>,
    pub duration: Option<i64>,
}

impl NewContent {
    /// Minimal record with only a title and kind.
    pub fn new(title: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: title.into(),
            description: None,
            kind,
            genre: None,
            year: None,
            thumbnail: None,
            video_path: None,
            duration: None,
        }
    }
}

/// An episode of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: EpisodeId,
    pub content_id: ContentId,
    pub season: i32,
    pub episode: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_path: Option<String>,
    pub duration: Option<i64>,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when adding an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEpisode {
    pub season: i32,
    pub episode: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_path: Option<String>,
    pub duration: Option<i64>,
    pub thumbnail: Option<String>,
}

impl Default for NewEpisode {
    fn default() -> Self {
        Self {
            season: 1,
            episode: 1,
            title: None,
            description: None,
            video_path: None,
            duration: None,
            thumbnail: None,
        }
    }
}

/// Content record with its episodes inlined (empty for movies).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentDetail {
    #[serde(flatten)]
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<Episode>>,
}

/// Saved resume position for a movie or one episode of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProgress {
    pub content_id: ContentId,
    pub episode_id: Option<EpisodeId>,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
    pub updated_at: DateTime<Utc>,
}
