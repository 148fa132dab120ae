//! Core type definitions shared by the catalog and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A single feature with one video file.
    Movie,
    /// A series whose video files live on its episodes.
    Series,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    /// Accepts the singular and plural spellings used by the browser UI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            _ => Err(format!("Invalid content type: {}", s)),
        }
    }
}

/// Kind of uploaded asset, which decides the storage directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Playable video file.
    Video,
    /// Poster/thumbnail image.
    Thumbnail,
}

impl AssetKind {
    /// Directory name under the media root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Thumbnail => "thumbnails",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Thumbnail => write!(f, "thumbnail"),
        }
    }
}
